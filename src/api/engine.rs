use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::viewport::{SAFE_VIEWPORT_DIM, sanitize_dimension};
use crate::core::{
    BarSeries, CandleGeometry, Gesture, PriceMark, TimeMark, Timeframe, ViewportState,
    price_marks, visible_time_marks,
};
use crate::error::{TerminalError, TerminalResult};

use super::{ScreenState, TerminalConfig};

/// Persistable view parameters.
///
/// Covers what survives process death: the active timeframe and the pan/zoom
/// position. Bars are excluded on purpose; they are re-fetched, and the
/// snapshot is re-clamped against whatever series arrives next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub timeframe: Timeframe,
    pub visible_bar_count: usize,
    pub scroll_offset: f64,
}

/// Stateful facade over the viewport core.
///
/// Owns the screen state and the active timeframe, and wires the external
/// signals together: the bar feed delivers series, the rendering surface
/// reports its size, the gesture recognizer streams pan/zoom frames, and the
/// timeframe selector triggers resets. All reads hand out derived geometry
/// from the current snapshot; all writes replace the snapshot by value.
#[derive(Debug)]
pub struct TerminalEngine {
    config: TerminalConfig,
    timeframe: Timeframe,
    surface_width: f64,
    surface_height: f64,
    screen: ScreenState,
    pending_view: Option<ViewSnapshot>,
}

impl TerminalEngine {
    pub fn new(config: TerminalConfig) -> TerminalResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            timeframe: config.initial_timeframe,
            surface_width: SAFE_VIEWPORT_DIM,
            surface_height: SAFE_VIEWPORT_DIM,
            screen: ScreenState::Initial,
            pending_view: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> TerminalConfig {
        self.config
    }

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    #[must_use]
    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    #[must_use]
    pub fn viewport(&self) -> Option<&ViewportState> {
        self.screen.viewport()
    }

    /// Switches the active timeframe and resets to the loading state.
    ///
    /// Returns `true` when the host must fetch a fresh series. Re-selecting
    /// the timeframe already on screen keeps the current content.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> bool {
        if timeframe == self.timeframe && self.screen.is_content() {
            return false;
        }

        debug!(
            from = self.timeframe.label(),
            to = timeframe.label(),
            "switch timeframe"
        );
        self.timeframe = timeframe;
        self.screen = ScreenState::Loading { timeframe };
        true
    }

    /// Marks the fetch for the active timeframe as in flight.
    pub fn mark_loading(&mut self) {
        self.screen = ScreenState::Loading {
            timeframe: self.timeframe,
        };
    }

    /// Replaces the bar series and rebuilds the viewport from scratch.
    ///
    /// The measured surface size carries over; pan/zoom resets unless a
    /// restored snapshot for this timeframe is pending. An empty series is
    /// treated as a failed fetch.
    pub fn set_bars(&mut self, bars: BarSeries) -> TerminalResult<()> {
        debug!(
            count = bars.len(),
            timeframe = self.timeframe.label(),
            "replace bar series"
        );

        if bars.is_empty() {
            warn!("received empty bar series");
            self.screen = ScreenState::Failed {
                message: "no bars available".to_owned(),
            };
            return Ok(());
        }

        let mut state = ViewportState::new(bars, self.config.tuning)?
            .with_viewport_size(self.surface_width, self.surface_height);

        if let Some(snapshot) = self.pending_view.take() {
            if snapshot.timeframe == self.timeframe {
                state = state.with_view_params(snapshot.visible_bar_count, snapshot.scroll_offset);
            }
        }

        self.screen = ScreenState::Content(state);
        Ok(())
    }

    /// Records a failed fetch; the core holds no retry logic of its own.
    pub fn set_load_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "bar fetch failed");
        self.screen = ScreenState::Failed { message };
    }

    /// Applies the rendering surface's measured size.
    ///
    /// Degenerate dimensions fall back to the safe placeholder so geometry
    /// stays finite before the first real layout.
    pub fn on_surface_resized(&mut self, width: f64, height: f64) {
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            warn!(width, height, "degenerate surface size, using placeholder");
        }
        self.surface_width = sanitize_dimension(width);
        self.surface_height = sanitize_dimension(height);

        if let ScreenState::Content(state) = &self.screen {
            let resized = state
                .clone()
                .with_viewport_size(self.surface_width, self.surface_height);
            self.screen = ScreenState::Content(resized);
        }
    }

    /// Reduces one gesture frame into a new viewport snapshot.
    ///
    /// Returns `true` when a snapshot was replaced; gestures arriving before
    /// content exists are dropped.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> bool {
        let ScreenState::Content(state) = &self.screen else {
            trace!("gesture dropped: no content on screen");
            return false;
        };

        trace!(
            zoom = gesture.zoom_factor,
            pan = gesture.pan_delta_x,
            "gesture frame"
        );
        let next = crate::core::apply_gesture(state, gesture);
        self.screen = ScreenState::Content(next);
        true
    }

    pub fn project_visible_candles(&self) -> TerminalResult<Vec<CandleGeometry>> {
        self.content()?.project_visible_candles()
    }

    pub fn visible_time_marks(&self) -> TerminalResult<Vec<TimeMark>> {
        Ok(visible_time_marks(self.content()?, self.timeframe))
    }

    pub fn price_marks(&self) -> TerminalResult<SmallVec<[PriceMark; 3]>> {
        price_marks(self.content()?)
    }

    /// Captures the persistable view parameters, when content is on screen.
    #[must_use]
    pub fn view_snapshot(&self) -> Option<ViewSnapshot> {
        let state = self.screen.viewport()?;
        Some(ViewSnapshot {
            timeframe: self.timeframe,
            visible_bar_count: state.visible_bar_count(),
            scroll_offset: state.scroll_offset(),
        })
    }

    /// Restores persisted view parameters.
    ///
    /// With matching content on screen the parameters apply immediately
    /// (clamped). Otherwise they are held until the next `set_bars` for the
    /// snapshot's timeframe; a different timeframe forces a reload.
    pub fn restore_view_snapshot(&mut self, snapshot: ViewSnapshot) {
        debug!(
            timeframe = snapshot.timeframe.label(),
            count = snapshot.visible_bar_count,
            "restore view snapshot"
        );

        if snapshot.timeframe == self.timeframe {
            if let ScreenState::Content(state) = &self.screen {
                let restored = state
                    .clone()
                    .with_view_params(snapshot.visible_bar_count, snapshot.scroll_offset);
                self.screen = ScreenState::Content(restored);
                return;
            }
        } else {
            self.timeframe = snapshot.timeframe;
            self.screen = ScreenState::Loading {
                timeframe: snapshot.timeframe,
            };
        }
        self.pending_view = Some(snapshot);
    }

    fn content(&self) -> TerminalResult<&ViewportState> {
        self.screen.viewport().ok_or(TerminalError::EmptySeries)
    }
}
