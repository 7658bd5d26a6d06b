use crate::core::{Timeframe, ViewportState};

/// What the terminal screen currently shows.
///
/// `Content` is the single owner of the live viewport snapshot; the engine
/// replaces it by value on every gesture, layout or data event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    /// Nothing requested yet.
    Initial,
    /// A fetch for the given timeframe is in flight.
    Loading { timeframe: Timeframe },
    Content(ViewportState),
    /// The fetch failed or returned no bars; the host shows the error state.
    Failed { message: String },
}

impl ScreenState {
    #[must_use]
    pub fn is_content(&self) -> bool {
        matches!(self, ScreenState::Content(_))
    }

    #[must_use]
    pub fn viewport(&self) -> Option<&ViewportState> {
        match self {
            ScreenState::Content(state) => Some(state),
            _ => None,
        }
    }
}
