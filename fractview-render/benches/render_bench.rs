use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fractview_core::{evaluate, Complex, Viewport};
use fractview_render::{
    render, render_parallel, ColorizerKind, PixelBuffer, RenderCancel, RenderRequest,
    DEFAULT_ROWS_PER_BAND,
};

fn default_request() -> RenderRequest {
    let viewport = Viewport::default_view(600).unwrap();
    RenderRequest::new(viewport, RenderRequest::DEFAULT_MAX_ITERATIONS, ColorizerKind::Rainbow)
        .unwrap()
}

fn bench_full_frame_render(c: &mut Criterion) {
    let req = default_request();
    let mut buf = PixelBuffer::for_request(&req);

    c.bench_function("full_frame_600_sync", |b| {
        b.iter(|| render(&mut buf, &req).unwrap());
    });
}

fn bench_full_frame_parallel(c: &mut Criterion) {
    let req = default_request();
    let mut buf = PixelBuffer::for_request(&req);
    let cancel = RenderCancel::new();

    c.bench_function("full_frame_600_parallel", |b| {
        b.iter(|| {
            render_parallel(&mut buf, &req, DEFAULT_ROWS_PER_BAND, &cancel, cancel.generation())
                .unwrap()
        });
    });
}

fn bench_iteration_throughput(c: &mut Criterion) {
    let viewport = Viewport::new(256, Complex::new(-0.5, 0.0), 0.005).unwrap();
    let req = RenderRequest::new(viewport, 1000, ColorizerKind::IterationBased).unwrap();
    let mut buf = PixelBuffer::for_request(&req);
    let cancel = RenderCancel::new();

    c.bench_function("render_256_1000iter", |b| {
        b.iter(|| {
            render_parallel(&mut buf, &req, DEFAULT_ROWS_PER_BAND, &cancel, cancel.generation())
                .unwrap()
        });
    });
}

fn bench_colorize(c: &mut Criterion) {
    let viewport = Viewport::default_view(256).unwrap();
    let results: Vec<_> = (0..256u32)
        .flat_map(|y| (0..256u32).map(move |x| (x, y)))
        .map(|(x, y)| evaluate(viewport.screen_to_complex(x as f64, y as f64), 200))
        .collect();

    let mut group = c.benchmark_group("colorize_256");
    for kind in ColorizerKind::ALL {
        group.bench_function(format!("{kind:?}"), |b| {
            b.iter(|| {
                let mut acc = 0u32;
                for r in &results {
                    acc = acc.wrapping_add(kind.colorize(black_box(r))[0] as u32);
                }
                acc
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_full_frame_render,
    bench_full_frame_parallel,
    bench_iteration_throughput,
    bench_colorize
);
criterion_main!(benches);
