//! Operator tables: syntax-tree operator tags to C operator text.
//!
//! Tags with no C spelling in this translation (`//`, `**`, shifts, `@`,
//! identity and membership tests) map to `None` and surface as
//! [`TranslationError::UnknownOperator`](crate::TranslationError).

use cinder_syntax::{BinaryOp, BoolOp, CmpOp, UnaryOp};

pub fn binary(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::Add => Some("+"),
        BinaryOp::Sub => Some("-"),
        BinaryOp::Mult => Some("*"),
        BinaryOp::Div => Some("/"),
        BinaryOp::Mod => Some("%"),
        BinaryOp::BitOr => Some("|"),
        BinaryOp::BitXor => Some("^"),
        BinaryOp::BitAnd => Some("&"),
        BinaryOp::FloorDiv
        | BinaryOp::Pow
        | BinaryOp::LShift
        | BinaryOp::RShift
        | BinaryOp::MatMult => None,
    }
}

pub fn compare(op: CmpOp) -> Option<&'static str> {
    match op {
        CmpOp::Gt => Some(">"),
        CmpOp::GtE => Some(">="),
        CmpOp::Lt => Some("<"),
        CmpOp::LtE => Some("<="),
        CmpOp::Eq => Some("=="),
        CmpOp::NotEq => Some("!="),
        CmpOp::Is | CmpOp::IsNot | CmpOp::In | CmpOp::NotIn => None,
    }
}

pub fn boolean(op: BoolOp) -> &'static str {
    match op {
        BoolOp::Or => "||",
        BoolOp::And => "&&",
    }
}

pub fn unary(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::UAdd => "+",
        UnaryOp::USub => "-",
        UnaryOp::Not => "!",
        UnaryOp::Invert => "~",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(binary(BinaryOp::Add), Some("+"));
        assert_eq!(binary(BinaryOp::Mod), Some("%"));
        assert_eq!(binary(BinaryOp::BitXor), Some("^"));
    }

    #[test]
    fn test_unmapped_operators() {
        assert_eq!(binary(BinaryOp::FloorDiv), None);
        assert_eq!(binary(BinaryOp::Pow), None);
        assert_eq!(binary(BinaryOp::LShift), None);
        assert_eq!(compare(CmpOp::Is), None);
        assert_eq!(compare(CmpOp::NotIn), None);
    }

    #[test]
    fn test_boolean_and_unary() {
        assert_eq!(boolean(BoolOp::And), "&&");
        assert_eq!(boolean(BoolOp::Or), "||");
        assert_eq!(unary(UnaryOp::Not), "!");
        assert_eq!(unary(UnaryOp::Invert), "~");
    }
}
