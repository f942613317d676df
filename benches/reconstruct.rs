use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pdfdelta::chunk::Chunk;
use pdfdelta::event::TextRun;
use pdfdelta::geometry::{LineSegment, Point};
use pdfdelta::word::reconstruct;

const GLYPH_WIDTH: f32 = 10.0;
const LINE_HEIGHT: f32 = 14.0;
const LINES_PER_PAGE: usize = 50;

/// One glyph run per line, ~40 characters each, across several pages.
fn synthetic_chunks(lines: usize) -> Vec<Chunk> {
    (0..lines)
        .map(|line| {
            let page = line / LINES_PER_PAGE + 1;
            let y = 792.0 - LINE_HEIGHT * ((line % LINES_PER_PAGE) as f32 + 1.0);
            let text = format!("line {line} with some words to split apart");
            let n = text.chars().count();
            let glyph = |i: usize, dy: f32| {
                LineSegment::new(
                    Point::new(72.0 + GLYPH_WIDTH * i as f32, y + dy),
                    Point::new(72.0 + GLYPH_WIDTH * (i + 1) as f32, y + dy),
                )
            };
            Chunk::from_text_run(TextRun {
                baseline_start: Point::new(72.0, y),
                baseline_end: Point::new(72.0 + GLYPH_WIDTH * n as f32, y),
                ascents: (0..n).map(|i| glyph(i, 8.0)).collect(),
                descents: (0..n).map(|i| glyph(i, -2.0)).collect(),
                space_width: GLYPH_WIDTH,
                page,
                text,
            })
            .expect("valid synthetic run")
        })
        .collect()
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");

    for lines in [100, 1000] {
        let chunks = synthetic_chunks(lines);
        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter(|| reconstruct(black_box(chunks.clone()), black_box(1.0)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconstruct);
criterion_main!(benches);
