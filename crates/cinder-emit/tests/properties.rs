//! Structural guarantees of the emitter, checked on hand-built trees.

use cinder_emit::{Context, EmitOptions, TranslationError, translate_to_string};
use cinder_syntax::{BinaryOp, CmpOp, Literal, Module, ModuleBuilder, NodeId, Position};

/// `x: int = <literal>` for each literal, read back from the emitted text.
#[test]
fn test_literals_survive_emission() {
    let cases = [
        (Literal::Bool(true), "1"),
        (Literal::Bool(false), "0"),
        (Literal::Int(42), "42"),
        (Literal::Int(-3), "-3"),
        (Literal::Int(u64::MAX.into()), "18446744073709551615"),
        (Literal::Float(0.5), "0.5"),
        (Literal::Str("hi".into()), "\"hi\""),
    ];

    for (literal, expected) in cases {
        let mut b = ModuleBuilder::new();
        let target = b.name("x");
        let ty = b.name("int");
        let value = b.constant(literal.clone());
        let decl = b.ann_assign(target, ty, Some(value));
        let module = b.finish(vec![decl]);

        let out = translate_to_string(&module).unwrap();
        let token = out
            .strip_prefix("int x = ")
            .and_then(|rest| rest.strip_suffix(";\n"))
            .unwrap_or_else(|| panic!("unexpected output {out:?}"));
        assert_eq!(token, expected);

        match literal {
            Literal::Bool(b) => assert_eq!(token.parse::<i64>().unwrap(), i64::from(b)),
            Literal::Int(n) => assert_eq!(token.parse::<i128>().unwrap(), n),
            Literal::Float(f) => assert_eq!(token.parse::<f64>().unwrap(), f),
            Literal::Str(s) => assert_eq!(token.trim_matches('"'), s),
            Literal::None => unreachable!(),
        }
    }
}

/// A body nested `depth` levels deep in if statements inside a function.
fn nested_function(depth: usize) -> Module {
    let mut b = ModuleBuilder::new();
    let target = b.name("x");
    let one = b.int(1);
    let mut body = vec![b.assign(vec![target], one)];
    for _ in 0..depth {
        let test = b.name("c");
        body = vec![b.if_stmt(test, body, vec![])];
    }
    let f = b.function("f", vec![], None, body);
    b.finish(vec![f])
}

#[test]
fn test_indentation_is_restored() {
    for depth in 0..6 {
        let module = nested_function(depth);
        let options = EmitOptions::default();
        let mut cx = Context::new(&module, &options, String::new());
        cx.emit(module.root()).unwrap();
        assert_eq!(cx.level(), 0);

        let out = cx.into_inner();
        let deepest = " ".repeat(4 * (depth + 1));
        assert!(out.contains(&format!("\n{deepest}x = 1;\n")), "{out}");
    }
}

#[test]
fn test_indentation_is_restored_after_failure() {
    let mut b = ModuleBuilder::new();
    let target = b.name("x");
    let bad = b.none();
    let stmt = b.assign(vec![target], bad);
    let test = b.name("c");
    let inner = b.if_stmt(test, vec![stmt], vec![]);
    let f = b.function("f", vec![], None, vec![inner]);
    let module = b.finish(vec![f]);

    let options = EmitOptions::default();
    let mut cx = Context::new(&module, &options, String::new());
    let err = cx.emit(module.root()).unwrap_err();
    assert!(matches!(err, TranslationError::NullLiteral { .. }));
    assert_eq!(cx.level(), 0);
}

/// `while c: <body> else: y = 0` where body breaks at `break_depth` ifs deep.
fn loop_with_else(break_depth: usize) -> Module {
    let mut b = ModuleBuilder::new();
    let mut body = vec![b.break_stmt()];
    for _ in 0..break_depth {
        let test = b.name("d");
        body = vec![b.if_stmt(test, body, vec![])];
    }
    let step = {
        let t = b.name("i");
        let one = b.int(1);
        b.aug_assign(t, BinaryOp::Add, one)
    };
    body.push(step);
    let fallback = {
        let t = b.name("y");
        let zero = b.int(0);
        b.assign(vec![t], zero)
    };
    let test = b.name("c");
    let w = b.while_loop(test, body, vec![fallback]);
    b.finish(vec![w])
}

#[test]
fn test_loop_else_sentinel() {
    for depth in 0..4 {
        let out = translate_to_string(&loop_with_else(depth)).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "unsigned byte success = 1;");
        assert_eq!(lines[1], "while (c) {");

        let breaks: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.trim() == "break;")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(breaks.len(), 1);
        for i in breaks {
            assert_eq!(lines[i - 1].trim(), "success = 0;");
        }

        assert!(out.contains("\nif (success == 1) {\n    y = 0;\n}\n"), "{out}");
    }
}

#[test]
fn test_break_targets_nearest_loop() {
    // Outer loop has an else clause, inner one does not.
    let mut b = ModuleBuilder::new();
    let inner_break = b.break_stmt();
    let inner_test = b.name("b");
    let inner = b.while_loop(inner_test, vec![inner_break], vec![]);
    let outer_break = b.break_stmt();
    let pass = b.pass();
    let outer_test = b.name("a");
    let outer = b.while_loop(outer_test, vec![inner, outer_break], vec![pass]);
    let module = b.finish(vec![outer]);

    assert_eq!(
        translate_to_string(&module).unwrap(),
        "unsigned byte success = 1;\n\
         while (a) {\n    \
         while (b) {\n        \
         break;\n    \
         }\n\n    \
         success = 0;\n    \
         break;\n\
         }\n\n\
         if (success == 1) {\n\
         }\n\n"
    );
}

fn elif_chain(branches: usize, with_else: bool) -> Module {
    let mut b = ModuleBuilder::new();
    let mut orelse = Vec::new();
    if with_else {
        let t = b.name("x");
        let v = b.int(0);
        orelse.push(b.assign(vec![t], v));
    }
    for n in (0..branches).rev() {
        let left = b.name("k");
        let right = b.int(n as i128);
        let test = b.compare(left, vec![CmpOp::Eq], vec![right]);
        let t = b.name("x");
        let v = b.int(n as i128 + 1);
        let body = vec![b.assign(vec![t], v)];
        orelse = vec![b.if_stmt(test, body, orelse)];
    }
    let root: Vec<NodeId> = orelse;
    b.finish(root)
}

#[test]
fn test_elif_chain_is_flat() {
    for n in 1..7 {
        for with_else in [false, true] {
            let out = translate_to_string(&elif_chain(n, with_else)).unwrap();

            let leading_ifs = out.lines().filter(|l| l.starts_with("if (")).count();
            assert_eq!(leading_ifs, 1, "{out}");
            assert_eq!(out.matches("} else if (").count(), n - 1, "{out}");
            assert_eq!(out.matches("} else {").count(), usize::from(with_else), "{out}");
            // Every branch body sits exactly one level in.
            assert!(out.lines().all(|l| !l.starts_with("        ")), "{out}");
        }
    }
}

#[test]
fn test_elif_chain_text() {
    assert_eq!(
        translate_to_string(&elif_chain(3, true)).unwrap(),
        "if (k == 0) {\n    x = 1;\n} else if (k == 1) {\n    x = 2;\n} else if (k == 2) {\n    x = 3;\n} else {\n    x = 0;\n}\n\n"
    );
}

#[test]
fn test_tree_is_reusable() {
    let module = elif_chain(2, false);
    let first = translate_to_string(&module).unwrap();
    let second = translate_to_string(&module).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_error_position_falls_back_to_enclosing_node() {
    let mut b = ModuleBuilder::new();
    b.at(Some(Position::new(7, 2)));
    let target = b.name("x");
    b.at(None);
    let ty = b.name("int");
    let value = b.none();
    b.at(Some(Position::new(7, 0)));
    let decl = b.ann_assign(target, ty, Some(value));
    let module = b.finish(vec![decl]);

    let err = translate_to_string(&module).unwrap_err();
    assert!(matches!(err, TranslationError::NullLiteral { .. }));
    // The target was the last positioned node visited.
    assert_eq!(err.position(), Some(Position::new(7, 2)));
}
