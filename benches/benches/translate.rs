//! Parse and emit throughput on generated programs of increasing size.

use cinder_emit::translate_to_string;
use cinder_syntax::read_python;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// `n` small functions, each with a loop-else and an elif chain.
fn program(n: usize) -> String {
    let mut src = String::from("import stdio\n\nLIMIT: const = 100\n\n");
    for i in 0..n {
        src.push_str(&format!(
            "def f{i}(a: int, b: int) -> int:\n    \
             \"\"\"Function {i}.\"\"\"\n    \
             total: int = 0\n    \
             while a < b:\n        \
             if a % 2 == 0:\n            \
             total += a\n        \
             elif a > LIMIT:\n            \
             break\n        \
             else:\n            \
             total -= 1\n        \
             a += 1\n    \
             else:\n        \
             return -1\n    \
             return total\n\n"
        ));
    }
    src
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    for n in [10, 100, 1000] {
        let module = read_python(&program(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &module, |b, module| {
            b.iter(|| translate_to_string(black_box(module)).unwrap());
        });
    }
    group.finish();
}

fn bench_read_and_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_and_emit");
    for n in [10, 100] {
        let src = program(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &src, |b, src| {
            b.iter(|| {
                let module = read_python(black_box(src)).unwrap();
                translate_to_string(&module).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_emit, bench_read_and_emit);
criterion_main!(benches);
