//! terminal-chart: viewport core for a candlestick terminal view.
//!
//! The crate models the interactive part of an OHLC chart as a pure value
//! pipeline: a newest-first [`core::BarSeries`] plus view parameters form a
//! [`core::ViewportState`], one pan/zoom frame is reduced by
//! [`core::apply_gesture`], and the axis helpers derive the marks a renderer
//! draws. Fetching, drawing and navigation stay on the host side of the
//! [`feed::BarFeed`] and [`api::TerminalEngine`] boundaries.

pub mod api;
pub mod core;
pub mod error;
pub mod feed;
pub mod telemetry;

pub use api::{ScreenState, TerminalConfig, TerminalEngine, ViewSnapshot};
pub use error::{TerminalError, TerminalResult};
