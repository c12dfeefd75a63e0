use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    UnsupportedShape,
    EmptyLeagueList,
    InvalidLeagueIndex,
    InvalidGameModeIndex,
    RecordNotFound,
    InvalidUrl,
    Network,
    Timeout,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
