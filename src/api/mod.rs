mod engine;
mod engine_config;
mod screen;

pub use engine::{TerminalEngine, ViewSnapshot};
pub use engine_config::TerminalConfig;
pub use screen::ScreenState;
