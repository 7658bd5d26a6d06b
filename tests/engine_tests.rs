use approx::assert_relative_eq;
use terminal_chart::core::{Bar, BarSeries, Gesture, Timeframe, ViewportTuning};
use terminal_chart::{ScreenState, TerminalConfig, TerminalEngine, ViewSnapshot};

const BASE_MS: i64 = 1_706_745_600_000;

fn hourly_series(len: usize) -> BarSeries {
    let bars = (0..len)
        .map(|i| {
            let time = BASE_MS - (i as i64) * 3_600_000;
            let base = 100.0 + (i % 9) as f64;
            let close = if i % 2 == 0 { base + 2.0 } else { base - 2.0 };
            Bar::new(time, base, base.max(close) + 1.0, base.min(close) - 1.0, close)
                .expect("valid generated bar")
        })
        .collect();
    BarSeries::new(bars).expect("ordered series")
}

fn engine_with_content() -> TerminalEngine {
    let mut engine = TerminalEngine::new(TerminalConfig::default()).expect("engine");
    engine.on_surface_resized(1000.0, 500.0);
    engine.set_bars(hourly_series(100)).expect("set bars");
    engine
}

#[test]
fn engine_starts_initial_on_the_default_timeframe() {
    let engine = TerminalEngine::new(TerminalConfig::default()).expect("engine");
    assert_eq!(engine.timeframe(), Timeframe::H1);
    assert_eq!(*engine.screen(), ScreenState::Initial);
    assert!(engine.viewport().is_none());
}

#[test]
fn invalid_tuning_is_rejected_at_construction() {
    let config = TerminalConfig::default().with_tuning(ViewportTuning {
        min_visible_bars: 0,
        ..ViewportTuning::default()
    });
    assert!(TerminalEngine::new(config).is_err());
}

#[test]
fn timeframe_switch_requests_a_reload() {
    let mut engine = engine_with_content();

    assert!(engine.set_timeframe(Timeframe::M5));
    assert_eq!(
        *engine.screen(),
        ScreenState::Loading {
            timeframe: Timeframe::M5
        }
    );

    engine.set_bars(hourly_series(60)).expect("set bars");
    assert!(engine.screen().is_content());

    // Re-selecting the active timeframe keeps the content on screen.
    assert!(!engine.set_timeframe(Timeframe::M5));
    assert!(engine.screen().is_content());
}

#[test]
fn new_series_resets_pan_and_zoom() {
    let mut engine = engine_with_content();
    engine.apply_gesture(Gesture {
        zoom_factor: 2.0,
        pan_delta_x: 600.0,
    });
    let state = engine.viewport().expect("content");
    assert_eq!(state.visible_bar_count(), 50);
    assert_relative_eq!(state.scroll_offset(), 600.0);

    engine.set_bars(hourly_series(100)).expect("set bars");
    let state = engine.viewport().expect("content");
    assert_eq!(state.visible_bar_count(), 100);
    assert_relative_eq!(state.scroll_offset(), 0.0);
    // The measured surface size survives the series swap.
    assert_relative_eq!(state.viewport_width(), 1000.0);
    assert_relative_eq!(state.viewport_height(), 500.0);
}

#[test]
fn empty_series_becomes_a_failed_screen() {
    let mut engine = engine_with_content();
    engine.set_bars(BarSeries::empty()).expect("set bars");
    assert!(matches!(engine.screen(), ScreenState::Failed { .. }));
    assert!(engine.price_marks().is_err());
}

#[test]
fn fetch_failure_is_surfaced_without_retry() {
    let mut engine = TerminalEngine::new(TerminalConfig::default()).expect("engine");
    engine.mark_loading();
    engine.set_load_error("transport: connection reset");

    match engine.screen() {
        ScreenState::Failed { message } => assert_eq!(message, "transport: connection reset"),
        other => panic!("expected failed screen, got {other:?}"),
    }
}

#[test]
fn gestures_before_content_are_dropped() {
    let mut engine = TerminalEngine::new(TerminalConfig::default()).expect("engine");
    assert!(!engine.apply_gesture(Gesture::zoom(2.0)));
    assert!(engine.project_visible_candles().is_err());
}

#[test]
fn resize_reclamps_the_scroll_offset() {
    let mut engine = engine_with_content();
    engine.apply_gesture(Gesture {
        zoom_factor: 2.0,
        pan_delta_x: 100_000.0,
    });
    assert_relative_eq!(engine.viewport().expect("content").scroll_offset(), 1000.0);

    // A wider surface leaves less scrollable span: 100 * 40 - 2000 = 2000,
    // but bar width doubles with the surface, so the old offset stays valid.
    engine.on_surface_resized(2000.0, 500.0);
    let state = engine.viewport().expect("content");
    assert_relative_eq!(state.viewport_width(), 2000.0);
    assert_relative_eq!(state.scroll_offset(), 1000.0);

    // Shrinking the series' pixel span below the offset clamps it back.
    engine.set_bars(hourly_series(100)).expect("set bars");
    engine.on_surface_resized(1000.0, 500.0);
    assert_relative_eq!(engine.viewport().expect("content").scroll_offset(), 0.0);
}

#[test]
fn render_reads_agree_with_the_core() {
    let engine = engine_with_content();

    let candles = engine.project_visible_candles().expect("candles");
    assert_eq!(candles.len(), 100);

    let marks = engine.price_marks().expect("marks");
    assert_eq!(marks.len(), 3);

    let time_marks = engine.visible_time_marks().expect("time marks");
    // Hourly bars spanning 100 hours cross at least four day boundaries.
    assert!(time_marks.len() >= 4);
}

#[test]
fn view_snapshot_round_trips_through_json() {
    let mut engine = engine_with_content();
    engine.apply_gesture(Gesture {
        zoom_factor: 2.0,
        pan_delta_x: 340.0,
    });

    let snapshot = engine.view_snapshot().expect("snapshot");
    let json = serde_json::to_string(&snapshot).expect("serialize");
    let decoded: ViewSnapshot = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, snapshot);
    assert_eq!(decoded.visible_bar_count, 50);
    assert_relative_eq!(decoded.scroll_offset, 340.0);
}

#[test]
fn restored_snapshot_applies_on_the_next_series() {
    let snapshot = ViewSnapshot {
        timeframe: Timeframe::H1,
        visible_bar_count: 30,
        scroll_offset: 40.0,
    };

    let mut engine = TerminalEngine::new(TerminalConfig::default()).expect("engine");
    engine.on_surface_resized(1000.0, 500.0);
    engine.restore_view_snapshot(snapshot);
    engine.set_bars(hourly_series(100)).expect("set bars");

    let state = engine.viewport().expect("content");
    assert_eq!(state.visible_bar_count(), 30);
    assert_relative_eq!(state.scroll_offset(), 40.0);
}

#[test]
fn restored_snapshot_for_another_timeframe_forces_a_reload() {
    let mut engine = engine_with_content();
    engine.restore_view_snapshot(ViewSnapshot {
        timeframe: Timeframe::M15,
        visible_bar_count: 25,
        scroll_offset: 0.0,
    });

    assert_eq!(engine.timeframe(), Timeframe::M15);
    assert_eq!(
        *engine.screen(),
        ScreenState::Loading {
            timeframe: Timeframe::M15
        }
    );

    engine.set_bars(hourly_series(50)).expect("set bars");
    assert_eq!(engine.viewport().expect("content").visible_bar_count(), 25);
}

#[test]
fn restored_snapshot_clamps_against_the_arriving_series() {
    let snapshot = ViewSnapshot {
        timeframe: Timeframe::H1,
        visible_bar_count: 500,
        scroll_offset: 1.0e9,
    };

    let mut engine = TerminalEngine::new(TerminalConfig::default()).expect("engine");
    engine.on_surface_resized(1000.0, 500.0);
    engine.restore_view_snapshot(snapshot);
    engine.set_bars(hourly_series(40)).expect("set bars");

    let state = engine.viewport().expect("content");
    assert_eq!(state.visible_bar_count(), 40);
    assert!(state.scroll_offset() <= state.max_scroll_offset());
}

#[test]
fn config_round_trips_through_json() {
    let config = TerminalConfig::default()
        .with_initial_timeframe(Timeframe::M30)
        .with_tuning(ViewportTuning {
            min_visible_bars: 10,
            default_visible_bars: 60,
            price_span_epsilon: 1e-6,
        });

    let json = config.to_json_pretty().expect("serialize");
    let decoded = TerminalConfig::from_json_str(&json).expect("deserialize");
    assert_eq!(decoded, config);
    assert!(TerminalConfig::from_json_str("{not json").is_err());
}
