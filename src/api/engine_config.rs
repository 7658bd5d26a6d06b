use serde::{Deserialize, Serialize};

use crate::core::{Timeframe, ViewportTuning};
use crate::error::{TerminalError, TerminalResult};

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist/load terminal setup without
/// inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TerminalConfig {
    #[serde(default)]
    pub tuning: ViewportTuning,
    #[serde(default)]
    pub initial_timeframe: Timeframe,
}

impl TerminalConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets viewport tuning (visible-count bounds and the flat-range epsilon).
    #[must_use]
    pub fn with_tuning(mut self, tuning: ViewportTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Sets the timeframe the engine starts on.
    #[must_use]
    pub fn with_initial_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.initial_timeframe = timeframe;
        self
    }

    pub(crate) fn validate(self) -> TerminalResult<Self> {
        self.tuning.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> TerminalResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| TerminalError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> TerminalResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| TerminalError::InvalidData(format!("failed to parse config: {e}")))
    }
}
