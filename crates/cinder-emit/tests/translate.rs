use cinder_emit::{CWriter, EmitOptions, TranslationError, translate, translate_to_string};
use cinder_syntax::{Position, read_python};

fn c(source: &str) -> String {
    let module = read_python(source).expect("parse");
    translate_to_string(&module).expect("translate")
}

fn c_err(source: &str) -> TranslationError {
    let module = read_python(source).expect("parse");
    translate_to_string(&module).expect_err("translation should fail")
}

#[test]
fn test_typed_declaration() {
    assert_eq!(c("x: int = 5\n"), "int x = 5;\n");
    assert_eq!(c("y: float\n"), "float y;\n");
    assert_eq!(c("s: str = \"hi\"\n"), "str s = \"hi\";\n");
    assert_eq!(c("flag: int = True\n"), "int flag = 1;\n");
}

#[test]
fn test_constant_declaration() {
    assert_eq!(c("PI: const = 3.14\n"), "#define PI 3.14\n");
}

#[test]
fn test_unsigned_64_bit_literals() {
    assert_eq!(
        c("MASK: const = 0xFFFFFFFFFFFFFFFF\n"),
        "#define MASK 18446744073709551615\n"
    );
    assert_eq!(
        c("x: int = 9223372036854775808\n"),
        "int x = 9223372036854775808;\n"
    );
}

#[test]
fn test_constant_requires_value() {
    let err = c_err("N: const\n");
    assert!(matches!(err, TranslationError::MissingInitializer { ref name, .. } if name == "N"));
}

#[test]
fn test_function_macro() {
    assert_eq!(
        c("SQUARE: const = lambda x: x * x\n"),
        "#define SQUARE(x) x * x\n"
    );
    assert_eq!(
        c("ADD: const = lambda a, b: a + b\n"),
        "#define ADD(a,b) a + b\n"
    );
}

#[test]
fn test_lambda_outside_constant_is_rejected() {
    let err = c_err("f = lambda x: x\n");
    assert!(matches!(err, TranslationError::UnknownNode { .. }));
}

#[test]
fn test_assignments() {
    assert_eq!(c("a = b = 0\n"), "a = b = 0;\n");
    assert_eq!(c("x += 1\n"), "x += 1;\n");
    assert_eq!(c("mask &= 0xFF\n"), "mask &= 255;\n");
}

#[test]
fn test_unmapped_augmented_operator() {
    let err = c_err("x //= 2\n");
    match err {
        TranslationError::UnknownOperator { op, pos } => {
            assert_eq!(op, "FloorDiv");
            assert_eq!(pos, Some(Position::new(1, 0)));
        }
        other => panic!("expected UnknownOperator, got {other:?}"),
    }
}

#[test]
fn test_zero_argument_function() {
    assert_eq!(c("def f(): pass\n"), "void f(void) {\n}\n");
}

#[test]
fn test_function_signature_and_body() {
    let source = "def area(w: int, h: int) -> int:\n    return w * h\n";
    assert_eq!(
        c(source),
        "int area(int w, int h) {\n    return w * h;\n}\n"
    );
}

#[test]
fn test_bare_return() {
    assert_eq!(
        c("def stop():\n    return\n"),
        "void stop(void) {\n    return;\n}\n"
    );
}

#[test]
fn test_untyped_placeholder_is_configurable() {
    let module = read_python("def g(a, b: char): pass\n").unwrap();
    let writer = CWriter::new(EmitOptions {
        untyped: "int".into(),
        ..EmitOptions::default()
    });
    assert_eq!(
        writer.emit_to_string(&module).unwrap(),
        "int g(int a, char b) {\n}\n"
    );
}

#[test]
fn test_docstring_becomes_block_comment() {
    let source = "\
def double(a: int) -> int:
    \"\"\"Double it.

    Returns twice a.
    \"\"\"
    return a * 2
";
    assert_eq!(
        c(source),
        "\n/*\nDouble it.\n\nReturns twice a.\n*/\nint double(int a) {\n    return a * 2;\n}\n"
    );
}

#[test]
fn test_module_level_comments() {
    assert_eq!(c("\"\"\"hello\"\"\"\n"), "// hello\n");
    assert_eq!(
        c("\"\"\"first\n    second\n\"\"\"\n"),
        "\n/*\nfirst\nsecond\n*/\n"
    );
}

#[test]
fn test_string_statement_inside_function_is_an_expression() {
    let source = "def f():\n    x = 1\n    \"note\"\n";
    assert_eq!(
        c(source),
        "void f(void) {\n    x = 1;\n    \"note\";\n}\n"
    );
}

#[test]
fn test_calls() {
    assert_eq!(c("print(a, 1)\n"), "print(a, 1);\n");
    assert_eq!(c("tick()\n"), "tick();\n");
}

#[test]
fn test_call_argument_forms_are_rejected() {
    for source in ["f(a=1)\n", "f(*args)\n", "f(**kw)\n"] {
        let err = c_err(source);
        assert!(
            matches!(err, TranslationError::UnknownNode { .. }),
            "{source}: {err:?}"
        );
    }
}

#[test]
fn test_default_parameter_is_rejected() {
    let err = c_err("def f(a=1):\n    pass\n");
    match err {
        TranslationError::UnknownNode { name, .. } => assert_eq!(name, "default parameter"),
        other => panic!("expected UnknownNode, got {other:?}"),
    }
}

#[test]
fn test_parenthesization() {
    assert_eq!(c("r = (a + b) * c\n"), "r = (a + b) * c;\n");
    assert_eq!(c("r = a + b * c\n"), "r = a + (b * c);\n");
    assert_eq!(c("r = -(a + b)\n"), "r = -(a + b);\n");
    assert_eq!(c("r = a + b\n"), "r = a + b;\n");
    assert_eq!(c("r = not (a and b)\n"), "r = !(a && b);\n");
    assert_eq!(c("r = a and (b or c)\n"), "r = a && (b || c);\n");
    assert_eq!(c("r = not a == b\n"), "r = !(a == b);\n");
    assert_eq!(c("r = a < b and b < c\n"), "r = a < b && b < c;\n");
    assert_eq!(c("r = (a < b) + 1\n"), "r = (a < b) + 1;\n");
    assert_eq!(c("r = n * (i == j)\n"), "r = n * (i == j);\n");
}

#[test]
fn test_boolean_chain() {
    assert_eq!(c("r = a and b and c\n"), "r = a && b && c;\n");
}

#[test]
fn test_conditional_expression() {
    assert_eq!(c("r = x if c else y\n"), "r = (c) ? x : y;\n");
    assert_eq!(c("f(x if c else y)\n"), "f(((c) ? x : y));\n");
    assert_eq!(
        c("r = a or (x if c else y)\n"),
        "r = a || ((c) ? x : y);\n"
    );
}

#[test]
fn test_chained_comparison_is_transcribed() {
    assert_eq!(c("r = a < b < c\n"), "r = a < b < c;\n");
}

#[test]
fn test_identity_comparison_is_rejected() {
    let err = c_err("r = a is b\n");
    assert!(matches!(err, TranslationError::UnknownOperator { ref op, .. } if op == "Is"));
}

#[test]
fn test_unary() {
    assert_eq!(c("r = -x\n"), "r = -x;\n");
    assert_eq!(c("r = ~x\n"), "r = ~x;\n");
    assert_eq!(c("r = not x\n"), "r = !x;\n");
}

#[test]
fn test_subscript_and_address() {
    assert_eq!(c("v = items[i + 1]\n"), "v = items[i + 1];\n");
    assert_eq!(c("p = x.link\n"), "p = &x;\n");
}

#[test]
fn test_slice_is_rejected() {
    let err = c_err("v = items[1:2]\n");
    assert!(matches!(err, TranslationError::UnknownNode { ref name, .. } if name == "Slice"));
}

#[test]
fn test_plain_attribute_is_rejected() {
    let err = c_err("v = point.x\n");
    assert!(matches!(err, TranslationError::UnknownNode { .. }));
}

#[test]
fn test_null_literal() {
    let err = c_err("x: int = None\n");
    assert!(matches!(err, TranslationError::NullLiteral { pos: Some(_) }));
}

#[test]
fn test_invalid_annotation() {
    let err = c_err("x: a + b = 1\n");
    assert!(matches!(err, TranslationError::InvalidAnnotation { .. }));
}

#[test]
fn test_imports() {
    assert_eq!(
        c("import os.path, sys\n"),
        "#include <os/path.h>\n#include <sys.h>\n\n"
    );
    assert_eq!(c("from a.b import c, d\n"), "#include <a/b.h>\n\n");
}

#[test]
fn test_delete() {
    assert_eq!(c("del x, y\n"), "delete x;\ndelete y;\n");
    assert_eq!(
        c("def f():\n    del x\n"),
        "void f(void) {\n    delete x;\n}\n"
    );
}

#[test]
fn test_continue_and_plain_break() {
    assert_eq!(
        c("while a:\n    continue\n"),
        "while (a) {\n    continue;\n}\n\n"
    );
    assert_eq!(
        c("while a:\n    break\n"),
        "while (a) {\n    break;\n}\n\n"
    );
}

#[test]
fn test_unknown_node_stops_output() {
    let module = read_python("x = 1\ny = {i for i in z}\nw = 2\n").unwrap();
    let mut out = String::new();
    let err = translate(&module, &mut out).unwrap_err();

    match &err {
        TranslationError::UnknownNode { name, pos } => {
            assert_eq!(name, "set_comprehension");
            assert_eq!(pos.map(|p| p.line), Some(2));
        }
        other => panic!("expected UnknownNode, got {other:?}"),
    }
    assert!(out.starts_with("x = 1;\n"));
    assert!(!out.contains("w = 2"));
    assert!(err.to_string().starts_with("unknown node: set_comprehension at line 2"));
}

#[test]
fn test_for_loop_is_unsupported() {
    let err = c_err("for i in xs:\n    pass\n");
    assert!(matches!(err, TranslationError::UnknownNode { ref name, .. } if name == "for_statement"));
}

#[test]
fn test_indent_unit_option() {
    let module = read_python("def f():\n    x = 1\n").unwrap();
    let writer = CWriter::new(EmitOptions {
        indent: "\t".into(),
        ..EmitOptions::default()
    });
    assert_eq!(
        writer.emit_to_string(&module).unwrap(),
        "void f(void) {\n\tx = 1;\n}\n"
    );
}

#[test]
fn test_program_snapshot() {
    let source = r#"import stdio

LIMIT: const = 10

def search(n: int) -> int:
    """Find the first multiple of three below n."""
    i: int = 1
    while i < n:
        if i % 3 == 0:
            break
        elif i > LIMIT:
            return -1
        i += 1
    else:
        return 0
    return i
"#;
    insta::assert_snapshot!(c(source), @r#"
#include <stdio.h>

#define LIMIT 10

/*
Find the first multiple of three below n.
*/
int search(int n) {
    int i = 1;
    unsigned byte success = 1;
    while (i < n) {
        if (i % 3 == 0) {
            success = 0;
            break;
        } else if (i > LIMIT) {
            return -1;
        }

        i += 1;
    }

    if (success == 1) {
        return 0;
    }

    return i;
}
"#);
}
