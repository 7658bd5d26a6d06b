use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use terminal_chart::core::{
    Bar, BarSeries, Gesture, Timeframe, ViewportState, ViewportTuning, apply_gesture,
    visible_time_marks,
};

const BASE_MS: i64 = 1_706_745_600_000;

fn hourly_series(len: usize) -> BarSeries {
    let bars = (0..len)
        .map(|i| {
            let time = BASE_MS - (i as i64) * 3_600_000;
            let base = 100.0 + (i % 11) as f64 * 0.4;
            let close = if i % 2 == 0 { base + 1.2 } else { base - 1.2 };
            Bar::new(time, base, base.max(close) + 0.6, base.min(close) - 0.6, close)
                .expect("valid generated bar")
        })
        .collect();
    BarSeries::new(bars).expect("ordered series")
}

fn bench_candle_projection_500_of_10k(c: &mut Criterion) {
    let state = ViewportState::new(hourly_series(10_000), ViewportTuning::default())
        .expect("state")
        .with_viewport_size(1920.0, 1080.0)
        .with_view_params(500, 3_000.0);

    c.bench_function("candle_projection_500_of_10k", |b| {
        b.iter(|| {
            let _ = black_box(&state)
                .project_visible_candles()
                .expect("projection should succeed");
        })
    });
}

fn bench_price_extrema_wide_window(c: &mut Criterion) {
    let state = ViewportState::new(hourly_series(10_000), ViewportTuning::default())
        .expect("state")
        .with_viewport_size(1920.0, 1080.0)
        .with_view_params(10_000, 0.0);

    c.bench_function("price_extrema_10k_window", |b| {
        b.iter(|| {
            let _ = black_box(&state).price_extrema().expect("extrema");
        })
    });
}

fn bench_gesture_reduction(c: &mut Criterion) {
    let state = ViewportState::new(hourly_series(5_000), ViewportTuning::default())
        .expect("state")
        .with_viewport_size(1920.0, 1080.0);

    c.bench_function("gesture_reduction", |b| {
        b.iter(|| {
            let _ = apply_gesture(
                black_box(&state),
                Gesture {
                    zoom_factor: 1.05,
                    pan_delta_x: 12.5,
                },
            );
        })
    });
}

fn bench_time_marks_hourly_window(c: &mut Criterion) {
    let state = ViewportState::new(hourly_series(5_000), ViewportTuning::default())
        .expect("state")
        .with_viewport_size(1920.0, 1080.0)
        .with_view_params(1_000, 0.0);

    c.bench_function("time_marks_1k_window", |b| {
        b.iter(|| {
            let _ = visible_time_marks(black_box(&state), Timeframe::H1);
        })
    });
}

criterion_group!(
    benches,
    bench_candle_projection_500_of_10k,
    bench_price_extrema_wide_window,
    bench_gesture_reduction,
    bench_time_marks_hourly_window
);
criterion_main!(benches);
