use thiserror::Error;

pub type TerminalResult<T> = Result<T, TerminalError>;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no bars available")]
    EmptySeries,
}
