use thiserror::Error;

/// Errors surfaced by the core position/move-generation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("malformed FEN: {0}")]
    MalformedFen(String),

    #[error("malformed move string: {0}")]
    MalformedMove(String),

    #[error("illegal move passed to make()")]
    IllegalMove,
}

pub type EngineResult<T> = Result<T, EngineError>;
