use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kurbo::PathSeg;

use planar_cag::{
    binary_op,
    generators::{checkerboard, slanted_checkerboard, slanties},
    BinaryOp, FillRule, Graph, ShapeId,
};

fn graph(n: usize) -> Graph<PathSeg> {
    let (even, odd) = checkerboard(n);
    let mut g = Graph::new();
    g.add_path(ShapeId(0), &even, true);
    g.add_path(ShapeId(1), &odd, true);
    g
}

fn just_the_normalization(c: &mut Criterion) {
    let g = graph(10);
    c.bench_function("normalize", |b| {
        b.iter(|| {
            let mut g = g.clone();
            g.normalize();
            black_box(g)
        })
    });
}

fn faces(c: &mut Criterion) {
    let g = graph(10);
    c.bench_function("simplified faces", |b| {
        b.iter(|| {
            let mut g = g.clone();
            g.compute_simplified_faces();
            black_box(g)
        })
    });
}

fn xor(c: &mut Criterion) {
    for (name, (even, odd)) in [
        ("xor checkerboard", checkerboard(10)),
        ("xor slanted checkerboard", slanted_checkerboard(10)),
        ("xor slanties", slanties(10)),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| black_box(binary_op(&even, &odd, FillRule::EvenOdd, BinaryOp::Xor)))
        });
    }
}

criterion_group!(benches, just_the_normalization, faces, xor);
criterion_main!(benches);
