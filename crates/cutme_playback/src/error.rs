use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no pieces to play")]
    NothingToPlay,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
