//! Wire boundary for the aggregate-bars endpoint.
//!
//! The terminal consumes whatever the market-data provider hands it: one JSON
//! payload per `(symbol, timeframe)` request, newest-first when asked with
//! `sort=desc`. This module owns the payload shape and the conversion into a
//! validated [`BarSeries`]; transports (HTTP clients, fixtures, replays) live
//! on the host side of [`BarFeed`].

use serde::Deserialize;

use crate::core::{Bar, BarSeries, Timeframe};
use crate::error::{TerminalError, TerminalResult};

/// One bar as the aggregates endpoint encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AggregateBarDto {
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v", default)]
    pub volume: Option<f64>,
}

impl AggregateBarDto {
    fn into_bar(self) -> TerminalResult<Bar> {
        Bar::new(self.timestamp_ms, self.open, self.high, self.low, self.close)
    }
}

/// Top-level aggregates response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregateResponse {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub results: Vec<AggregateBarDto>,
}

/// Parses an aggregates payload into a validated newest-first series.
///
/// The endpoint already returns descending timestamps; re-sorting here makes
/// the ordering invariant local instead of trusting the transport.
pub fn parse_bar_series(payload: &str) -> TerminalResult<BarSeries> {
    let response: AggregateResponse = serde_json::from_str(payload).map_err(|e| {
        TerminalError::InvalidData(format!("failed to parse aggregate payload: {e}"))
    })?;
    bars_from_dtos(response.results)
}

/// Validates and orders decoded wire bars into a series.
pub fn bars_from_dtos(dtos: Vec<AggregateBarDto>) -> TerminalResult<BarSeries> {
    let mut bars = dtos
        .into_iter()
        .map(AggregateBarDto::into_bar)
        .collect::<TerminalResult<Vec<_>>>()?;
    bars.sort_by(|left, right| right.timestamp_ms.cmp(&left.timestamp_ms));
    BarSeries::new(bars)
}

/// External bar-series provider seam.
///
/// One call per timeframe selection; the engine rebuilds its viewport from
/// scratch on every delivered series. No retry and no caching belong here.
pub trait BarFeed {
    fn fetch_bars(&self, timeframe: Timeframe) -> TerminalResult<BarSeries>;
}
