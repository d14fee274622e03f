use cinder_syntax::{Module, NodeKind, ReadError, reader_for_extension, reader_for_language, readers};

const PROGRAM: &str = "\
import stdio

SIZE: const = 8

def fill(buf: int, n: int) -> int:
    \"\"\"Fill a buffer.\"\"\"
    i: int = 0
    while i < n and i < SIZE:
        buf[i] = 0
        i += 1
    else:
        return 1
    return 0
";

#[test]
fn test_builtin_readers() {
    let languages: Vec<&str> = readers().iter().map(|r| r.language()).collect();
    assert!(languages.contains(&"python"));
    assert!(languages.contains(&"json"));
    assert_eq!(reader_for_extension("py").unwrap().language(), "python");
    assert!(reader_for_language("ruby").is_none());
}

#[test]
fn test_python_tree_survives_json() {
    let python = reader_for_language("python").unwrap();
    let module = python.read(PROGRAM).unwrap();
    assert_eq!(module.body().len(), 3);

    let json = module.to_json().unwrap();
    let back = reader_for_language("json").unwrap().read(&json).unwrap();
    assert_eq!(back, module);
}

#[test]
fn test_wide_integer_survives_json() {
    let module = reader_for_language("python")
        .unwrap()
        .read("MASK: const = 0xFFFFFFFFFFFFFFFF\nx: int = -1\n")
        .unwrap();
    let json = module.to_json().unwrap();
    assert!(json.contains("\"18446744073709551615\""));
    assert_eq!(Module::from_json(&json).unwrap(), module);
}

#[test]
fn test_every_child_is_in_range() {
    let module = reader_for_language("python").unwrap().read(PROGRAM).unwrap();
    for index in 0..module.len() {
        let id = cinder_syntax::NodeId(index as u32);
        for child in module.kind(id).children() {
            assert!(child.index() < module.len());
        }
    }
    assert!(matches!(module.kind(module.root()), NodeKind::Module { .. }));
}

#[test]
fn test_tampered_json_is_rejected() {
    let err = Module::from_json("{\"nodes\": [], \"root\": 0}").unwrap_err();
    assert!(matches!(err, ReadError::Malformed(_)));

    let err = Module::from_json("not json").unwrap_err();
    assert!(matches!(err, ReadError::Json(_)));
}
