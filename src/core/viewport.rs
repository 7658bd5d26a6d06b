use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::bar::{Bar, BarSeries};
use crate::error::{TerminalError, TerminalResult};

/// Zooming out never shows fewer bars than this.
pub const MIN_VISIBLE_BARS: usize = 20;

/// Visible bar count a fresh viewport starts with.
pub const DEFAULT_VISIBLE_BARS: usize = 100;

/// Placeholder surface dimension used until the first layout report arrives.
///
/// Non-zero so derived geometry stays finite before the rendering surface has
/// measured itself.
pub(crate) const SAFE_VIEWPORT_DIM: f64 = 1.0;

/// Fraction of the bar slot covered by the candle body.
const BODY_WIDTH_RATIO: f64 = 0.5;

/// Tuning controls for viewport derivation and gesture clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTuning {
    pub min_visible_bars: usize,
    pub default_visible_bars: usize,
    /// Floor substituted for the visible price span when it degenerates to
    /// zero (a flat window renders as a flat line instead of dividing by zero).
    pub price_span_epsilon: f64,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            min_visible_bars: MIN_VISIBLE_BARS,
            default_visible_bars: DEFAULT_VISIBLE_BARS,
            price_span_epsilon: 1e-9,
        }
    }
}

impl ViewportTuning {
    pub(crate) fn validate(self) -> TerminalResult<Self> {
        if self.min_visible_bars == 0 {
            return Err(TerminalError::InvalidData(
                "minimum visible bar count must be >= 1".to_owned(),
            ));
        }

        if self.default_visible_bars < self.min_visible_bars {
            return Err(TerminalError::InvalidData(
                "default visible bar count must be >= the minimum".to_owned(),
            ));
        }

        if !self.price_span_epsilon.is_finite() || self.price_span_epsilon <= 0.0 {
            return Err(TerminalError::InvalidData(
                "price span epsilon must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Half-open index interval of bars currently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end == self.start
    }
}

/// Price envelope of the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceExtrema {
    pub max: f64,
    pub min: f64,
}

/// Projected candle geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

/// Immutable snapshot of the terminal viewport.
///
/// Holds the bar series plus the view parameters and derives everything the
/// renderer needs: visible window, price envelope, vertical scale and candle
/// geometry. Every "setter" returns a new value; the screen controller owns
/// the single live snapshot and replaces it wholesale each frame.
///
/// With an empty series the derived geometry is undefined: range accessors
/// return an empty window and price derivation fails with
/// [`TerminalError::EmptySeries`]. Callers must not render in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    bars: BarSeries,
    tuning: ViewportTuning,
    visible_bar_count: usize,
    scroll_offset: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl ViewportState {
    /// Creates a viewport over a freshly fetched series.
    ///
    /// Starts unscrolled at the default visible count (clamped against the
    /// series length) and the safe placeholder surface size.
    pub fn new(bars: BarSeries, tuning: ViewportTuning) -> TerminalResult<Self> {
        let tuning = tuning.validate()?;
        let mut state = Self {
            bars,
            tuning,
            visible_bar_count: 1,
            scroll_offset: 0.0,
            viewport_width: SAFE_VIEWPORT_DIM,
            viewport_height: SAFE_VIEWPORT_DIM,
        };
        state.visible_bar_count = state.clamp_visible_count(tuning.default_visible_bars);
        Ok(state)
    }

    #[must_use]
    pub fn bars(&self) -> &BarSeries {
        &self.bars
    }

    #[must_use]
    pub fn tuning(&self) -> ViewportTuning {
        self.tuning
    }

    #[must_use]
    pub fn visible_bar_count(&self) -> usize {
        self.visible_bar_count
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Returns a copy resized to the surface's measured dimensions.
    ///
    /// Non-finite or non-positive dimensions fall back to the safe placeholder
    /// instead of being rejected; the scroll offset is re-clamped against the
    /// resized geometry.
    #[must_use]
    pub fn with_viewport_size(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = sanitize_dimension(width);
        self.viewport_height = sanitize_dimension(height);
        let visible_bar_count = self.visible_bar_count;
        let scroll_offset = self.scroll_offset;
        self.with_view_params(visible_bar_count, scroll_offset)
    }

    /// Returns a copy with both view parameters replaced.
    ///
    /// The visible count is clamped into `[min_visible_bars, len]` first, then
    /// the scroll offset is clamped against the geometry that count produces,
    /// so the two adjustments are always consistent within one frame.
    #[must_use]
    pub fn with_view_params(mut self, visible_bar_count: usize, scroll_offset: f64) -> Self {
        self.visible_bar_count = self.clamp_visible_count(visible_bar_count);
        let max_offset = self.max_scroll_offset();
        self.scroll_offset = if scroll_offset.is_finite() {
            scroll_offset.clamp(0.0, max_offset)
        } else {
            0.0
        };
        self
    }

    /// Returns a copy scrolled to `scroll_offset` (clamped).
    #[must_use]
    pub fn with_scroll_offset(self, scroll_offset: f64) -> Self {
        let visible_bar_count = self.visible_bar_count;
        self.with_view_params(visible_bar_count, scroll_offset)
    }

    /// Horizontal pixel width of one bar slot.
    #[must_use]
    pub fn bar_pixel_width(&self) -> f64 {
        self.viewport_width / self.visible_bar_count as f64
    }

    /// Largest scroll offset that still keeps the window on the series.
    ///
    /// Zero when the full series fits the viewport at the current zoom.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        (self.bars.len() as f64 * self.bar_pixel_width() - self.viewport_width).max(0.0)
    }

    /// Derives the visible `[start, end)` window.
    ///
    /// Non-empty whenever the series is non-empty: a start index that would
    /// leave a short tail is pulled back so the window always holds
    /// `min(visible_bar_count, len)` bars.
    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        let len = self.bars.len();
        if len == 0 {
            return VisibleRange { start: 0, end: 0 };
        }

        let window = self.visible_bar_count.min(len);
        let raw_start = (self.scroll_offset / self.bar_pixel_width()).round();
        let raw_start = if raw_start.is_finite() && raw_start > 0.0 {
            raw_start as usize
        } else {
            0
        };
        let start = raw_start.min(len - window);
        VisibleRange {
            start,
            end: start + window,
        }
    }

    #[must_use]
    pub fn visible_bars(&self) -> &[Bar] {
        let range = self.visible_range();
        &self.bars.as_slice()[range.start..range.end]
    }

    /// Price envelope (max of highs, min of lows) over the visible window.
    pub fn price_extrema(&self) -> TerminalResult<PriceExtrema> {
        let visible = self.visible_bars();
        let max = visible
            .iter()
            .map(|bar| OrderedFloat(bar.high))
            .max()
            .ok_or(TerminalError::EmptySeries)?
            .into_inner();
        let min = visible
            .iter()
            .map(|bar| OrderedFloat(bar.low))
            .min()
            .ok_or(TerminalError::EmptySeries)?
            .into_inner();
        Ok(PriceExtrema { max, min })
    }

    /// Visible price span with the degenerate flat window floored to epsilon.
    pub fn price_span(&self) -> TerminalResult<f64> {
        let extrema = self.price_extrema()?;
        Ok((extrema.max - extrema.min).max(self.tuning.price_span_epsilon))
    }

    /// Vertical scale in pixels per price unit. Always finite and > 0.
    pub fn pixels_per_price_point(&self) -> TerminalResult<f64> {
        Ok(self.viewport_height / self.price_span()?)
    }

    /// Maps a price to pixel Y on the inverted vertical axis.
    pub fn price_to_pixel(&self, price: f64) -> TerminalResult<f64> {
        let extrema = self.price_extrema()?;
        let scale = self.pixels_per_price_point()?;
        Ok(self.viewport_height - (price - extrema.min) * scale)
    }

    /// Projects the visible window into per-candle render geometry.
    ///
    /// The newest bar sits at the right edge; bar `index` (newest-first) is
    /// centered at `viewport_width - index * bar_pixel_width + scroll_offset`.
    pub fn project_visible_candles(&self) -> TerminalResult<Vec<CandleGeometry>> {
        let extrema = self.price_extrema()?;
        let scale = self.pixels_per_price_point()?;
        let range = self.visible_range();

        #[cfg(feature = "parallel-projection")]
        {
            Ok((range.start..range.end)
                .into_par_iter()
                .map(|index| self.project_candle(index, self.bars.as_slice()[index], extrema, scale))
                .collect())
        }

        #[cfg(not(feature = "parallel-projection"))]
        {
            Ok((range.start..range.end)
                .map(|index| self.project_candle(index, self.bars.as_slice()[index], extrema, scale))
                .collect())
        }
    }

    /// Pixel X of the bar slot center for a newest-first index.
    #[must_use]
    pub fn bar_center_x(&self, index: usize) -> f64 {
        self.viewport_width - index as f64 * self.bar_pixel_width() + self.scroll_offset
    }

    fn project_candle(
        &self,
        index: usize,
        bar: Bar,
        extrema: PriceExtrema,
        scale: f64,
    ) -> CandleGeometry {
        let price_y = |price: f64| self.viewport_height - (price - extrema.min) * scale;

        let center_x = self.bar_center_x(index);
        let half_body = self.bar_pixel_width() * BODY_WIDTH_RATIO / 2.0;
        let open_y = price_y(bar.open);
        let close_y = price_y(bar.close);

        CandleGeometry {
            center_x,
            body_left: center_x - half_body,
            body_right: center_x + half_body,
            body_top: open_y.min(close_y),
            body_bottom: open_y.max(close_y),
            wick_top: price_y(bar.high),
            wick_bottom: price_y(bar.low),
            is_bullish: bar.is_bullish(),
        }
    }

    fn clamp_visible_count(&self, requested: usize) -> usize {
        let len = self.bars.len();
        let floor = self.tuning.min_visible_bars.min(len).max(1);
        requested.clamp(floor, len.max(floor))
    }
}

pub(crate) fn sanitize_dimension(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        SAFE_VIEWPORT_DIM
    }
}
