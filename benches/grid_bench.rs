use criterion::{black_box, criterion_group, criterion_main, Criterion};
use navkit::{CancelToken, GridNavigator, NavGraph, QueryOptions, Vector};

fn outer(w: f32, h: f32) -> Vec<Vector> {
    vec![
        Vector::new(0.0, 0.0),
        Vector::new(w, 0.0),
        Vector::new(w, h),
        Vector::new(0.0, h),
    ]
}

fn bench_grid(c: &mut Criterion) {
    let mut nav = GridNavigator::new(outer(640.0, 640.0), vec![], 4.0);
    nav.generate(&CancelToken::new()).expect("build grid navigator");

    let start = Vector::new(1.0, 1.0);
    let dest = Vector::new(639.0, 639.0);

    let mut group = c.benchmark_group("navkit/grid");

    group.bench_function("aggregation_graph", |b| {
        b.iter(|| {
            let graph = nav.aggregation_graph(start, dest, &QueryOptions::default());
            black_box(graph.len());
        })
    });

    group.bench_function("path", |b| {
        b.iter(|| {
            let graph = nav.aggregation_graph(start, dest, &QueryOptions::default());
            let path = navkit::astar::find_path(&graph, start, dest, |a, b| nav.cost(a, b));
            black_box(path.len());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
