use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::bar::Bar;
use crate::core::timeframe::Timeframe;
use crate::core::viewport::ViewportState;
use crate::error::{TerminalError, TerminalResult};

/// Time-axis delimiter positioned at a bar slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMark {
    /// Newest-first bar index the delimiter belongs to.
    pub index: usize,
    pub center_x: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceMarkKind {
    VisibleMax,
    LastClose,
    VisibleMin,
}

/// Dashed price guide line with its axis label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMark {
    pub kind: PriceMarkKind,
    pub price: f64,
    pub pixel_y: f64,
    pub label: String,
}

/// Decides whether a bar gets a time-axis delimiter, and with what label.
///
/// Stateless decision table on the bar's UTC calendar fields. The intraday
/// timeframes mark round hours; the coarser ones mark day boundaries, which
/// requires the chronologically adjacent older bar — without a neighbor a
/// boundary cannot be detected, so the answer is no delimiter.
#[must_use]
pub fn time_axis_mark(
    timeframe: Timeframe,
    bar: &Bar,
    older_neighbor: Option<&Bar>,
) -> Option<String> {
    let datetime = bar.datetime()?;
    match timeframe {
        Timeframe::M5 => (datetime.minute() == 0).then(|| hour_label(datetime)),
        Timeframe::M15 => {
            (datetime.minute() == 0 && datetime.hour() % 2 == 0).then(|| hour_label(datetime))
        }
        Timeframe::M30 | Timeframe::H1 => {
            let neighbor = older_neighbor?.datetime()?;
            (neighbor.day() != datetime.day()).then(|| day_label(datetime))
        }
    }
}

/// Collects the delimiters of the visible window, positioned like the candles.
#[must_use]
pub fn visible_time_marks(state: &ViewportState, timeframe: Timeframe) -> Vec<TimeMark> {
    let range = state.visible_range();
    let bars = state.bars();

    (range.start..range.end)
        .filter_map(|index| {
            let bar = bars.get(index)?;
            let older_neighbor = bars.get(index + 1);
            let label = time_axis_mark(timeframe, bar, older_neighbor)?;
            Some(TimeMark {
                index,
                center_x: state.bar_center_x(index),
                label,
            })
        })
        .collect()
}

/// Builds the three price guide lines: visible maximum, latest close,
/// visible minimum, in that order.
///
/// The close comes from the newest bar of the whole series, not the visible
/// window, so the line tracks the last traded price even while scrolled back.
pub fn price_marks(state: &ViewportState) -> TerminalResult<SmallVec<[PriceMark; 3]>> {
    let extrema = state.price_extrema()?;
    let last_close = state
        .bars()
        .latest()
        .ok_or(TerminalError::EmptySeries)?
        .close;

    let mut marks = SmallVec::new();
    for (kind, price) in [
        (PriceMarkKind::VisibleMax, extrema.max),
        (PriceMarkKind::LastClose, last_close),
        (PriceMarkKind::VisibleMin, extrema.min),
    ] {
        marks.push(PriceMark {
            kind,
            price,
            pixel_y: state.price_to_pixel(price)?,
            label: price_label(price),
        });
    }
    Ok(marks)
}

fn hour_label(datetime: DateTime<Utc>) -> String {
    format!("{:02}:00", datetime.hour())
}

fn day_label(datetime: DateTime<Utc>) -> String {
    format!("{} {}", datetime.day(), datetime.format("%b"))
}

fn price_label(price: f64) -> String {
    format!("{price:.2}")
}
