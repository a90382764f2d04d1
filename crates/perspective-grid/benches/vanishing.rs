use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point2;
use perspective_core::Homography;
use perspective_grid::{GridDrawParams, PerspectiveGridGraph, Side, SubGridCell};

fn build_row(cells: usize) -> PerspectiveGridGraph {
    let mut graph = PerspectiveGridGraph::new();
    let tl = graph.add_node(Point2::new(0.0, 0.0));
    let tr = graph.add_node(Point2::new(60.0, 4.0));
    let bl = graph.add_node(Point2::new(0.0, 100.0));
    let br = graph.add_node(Point2::new(60.0, 96.0));
    let mut id = graph
        .add_sub_grid(SubGridCell::new(tl, tr, bl, br))
        .expect("first cell");
    for k in 1..cells {
        let x = 60.0 * (k as f64 + 1.0);
        let inset = 4.0 * (k as f64 + 1.0);
        id = graph
            .extend(
                id,
                Side::Right,
                [Point2::new(x, inset), Point2::new(x, 100.0 - inset)],
            )
            .expect("extend");
        graph.set_subdivisions(id, 4).expect("cell exists");
    }
    graph
}

fn bench_grid(c: &mut Criterion) {
    let graph = build_row(10);
    let ids: Vec<_> = graph.cells().map(|(id, _)| id).collect();

    c.bench_function("vanishing_points_10_cells", |b| {
        b.iter(|| {
            for &id in &ids {
                black_box(graph.vanishing_points(black_box(id)));
            }
        })
    });

    let to_widget = Homography::scale_translate(1.5, 20.0, 20.0);
    let params = GridDrawParams::default();
    c.bench_function("draw_10_cells", |b| {
        b.iter(|| black_box(graph.draw(black_box(&to_widget), &params)))
    });
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
