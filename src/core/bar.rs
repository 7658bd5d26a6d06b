use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::{TerminalError, TerminalResult};

/// One OHLC price sample for a fixed time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// Builds a validated bar from raw values.
    ///
    /// Invariants:
    /// - all prices are finite
    /// - `low <= min(open, close)`
    /// - `high >= max(open, close)`
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64) -> TerminalResult<Self> {
        if !open.is_finite() || !high.is_finite() || !low.is_finite() || !close.is_finite() {
            return Err(TerminalError::InvalidData(
                "bar prices must be finite".to_owned(),
            ));
        }

        if low > open.min(close) {
            return Err(TerminalError::InvalidData(
                "bar low must be <= min(open, close)".to_owned(),
            ));
        }

        if high < open.max(close) {
            return Err(TerminalError::InvalidData(
                "bar high must be >= max(open, close)".to_owned(),
            ));
        }

        Ok(Self {
            timestamp_ms,
            open,
            high,
            low,
            close,
        })
    }

    /// Converts strongly-typed temporal/decimal input into a validated bar.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> TerminalResult<Self> {
        Self::new(
            datetime_to_unix_millis(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    /// Resolves the bar's UTC calendar timestamp.
    ///
    /// Returns `None` for timestamps outside the representable datetime range.
    #[must_use]
    pub fn datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Newest-first bar container shared by every viewport snapshot.
///
/// Index 0 is the most recent bar. The ordering invariant is checked once
/// here so the derivation code never has to. Cloning is cheap: the bars live
/// behind a shared slice, which keeps `ViewportState` a value type without
/// copying the series on every gesture frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Arc<[Bar]>,
}

impl BarSeries {
    /// Wraps a newest-first bar vector, rejecting out-of-order input.
    pub fn new(bars: Vec<Bar>) -> TerminalResult<Self> {
        if bars
            .windows(2)
            .any(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms)
        {
            return Err(TerminalError::InvalidData(
                "bar series must be ordered newest-first".to_owned(),
            ));
        }

        Ok(Self { bars: bars.into() })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            bars: Arc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Returns the most recent bar, when any.
    #[must_use]
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.first()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

impl Default for BarSeries {
    fn default() -> Self {
        Self::empty()
    }
}
