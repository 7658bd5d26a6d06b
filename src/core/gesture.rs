use serde::{Deserialize, Serialize};

use crate::core::viewport::ViewportState;

/// One frame of continuous pan/zoom input.
///
/// `zoom_factor` is multiplicative: `1.0` leaves the zoom untouched, `> 1.0`
/// zooms in (fewer visible bars), `< 1.0` zooms out. `pan_delta_x` is a
/// pixel-space horizontal delta, positive when dragging right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub zoom_factor: f64,
    pub pan_delta_x: f64,
}

impl Default for Gesture {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            pan_delta_x: 0.0,
        }
    }
}

impl Gesture {
    #[must_use]
    pub fn zoom(zoom_factor: f64) -> Self {
        Self {
            zoom_factor,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn pan(pan_delta_x: f64) -> Self {
        Self {
            pan_delta_x,
            ..Self::default()
        }
    }

    /// Degrades unusable components to the identity instead of rejecting them.
    fn sanitized(self) -> Self {
        let zoom_factor = if self.zoom_factor.is_finite() && self.zoom_factor > 0.0 {
            self.zoom_factor
        } else {
            1.0
        };
        let pan_delta_x = if self.pan_delta_x.is_finite() {
            self.pan_delta_x
        } else {
            0.0
        };
        Self {
            zoom_factor,
            pan_delta_x,
        }
    }
}

/// Reduces one gesture frame into the next viewport snapshot.
///
/// Zoom first: the visible count becomes `round(count / zoom_factor)` clamped
/// into `[min_visible_bars, len]`. Pan second: the offset delta is applied and
/// clamped against the post-zoom bar width, so both adjustments agree within
/// the frame. Inputs are clamped, never rejected, and the input state is left
/// untouched.
#[must_use]
pub fn apply_gesture(state: &ViewportState, gesture: Gesture) -> ViewportState {
    let gesture = gesture.sanitized();

    let target_count = (state.visible_bar_count() as f64 / gesture.zoom_factor).round();
    let target_count = if target_count >= 1.0 {
        target_count as usize
    } else {
        1
    };

    let target_offset = state.scroll_offset() + gesture.pan_delta_x;
    state.clone().with_view_params(target_count, target_offset)
}
