use crate::types::TimeMs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cut point {cut_point} is not inside (0, {duration})")]
    InvalidCutPoint { cut_point: TimeMs, duration: TimeMs },

    #[error("invalid piece range [{start}, {end})")]
    InvalidRange { start: TimeMs, end: TimeMs },

    #[error("no piece at track {track}, index {piece}")]
    AddressOutOfRange { track: usize, piece: usize },

    #[error("Piece not found: {0}")]
    PieceNotFound(uuid::Uuid),

    #[error("Track not found: {0}")]
    TrackNotFound(usize),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, CoreError>;
