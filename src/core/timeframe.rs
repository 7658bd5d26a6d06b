use serde::{Deserialize, Serialize};

/// Bar bucket granularity selectable from the terminal UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    M5,
    M15,
    M30,
    #[default]
    H1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Timeframe::M5, Timeframe::M15, Timeframe::M30, Timeframe::H1];

    /// Short label shown on the timeframe selector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
        }
    }

    /// Path fragment the aggregate-bars endpoint expects for this granularity.
    #[must_use]
    pub fn interval_path(self) -> &'static str {
        match self {
            Timeframe::M5 => "5/minute",
            Timeframe::M15 => "15/minute",
            Timeframe::M30 => "30/minute",
            Timeframe::H1 => "1/hour",
        }
    }

    #[must_use]
    pub fn bucket_minutes(self) -> u32 {
        match self {
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
        }
    }
}
