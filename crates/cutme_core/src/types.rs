use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TimeMs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub const ZERO: Self = Self(0);

    pub fn from_seconds(s: f64) -> Self {
        Self((s * 1_000.0).round() as i64)
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    pub fn as_micros(&self) -> i64 {
        self.0 * 1_000
    }

    /// Compact label used for selection summaries: `42 s`, `3:07`, `2 h`, `5 d`.
    pub fn short_label(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let secs = self.0.unsigned_abs() / 1_000;
        if secs < 60 {
            return format!("{sign}{secs} s");
        }
        let mins = secs / 60;
        if mins < 60 {
            return format!("{sign}{}:{:02}", mins, secs % 60);
        }
        let hours = mins / 60;
        if hours < 24 {
            format!("{sign}{hours} h")
        } else {
            format!("{sign}{} d", hours / 24)
        }
    }
}

impl Add for TimeMs {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeMs {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<i64> for TimeMs {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i64> for TimeMs {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self(self.0 / rhs)
    }
}

impl std::iter::Sum for TimeMs {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TimeMs::ZERO, |acc, t| acc + t)
    }
}

impl fmt::Display for TimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = self.0.unsigned_abs();
        let ms = total_ms % 1_000;
        let total_secs = total_ms / 1_000;
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;
        if self.0 < 0 {
            write!(f, "-{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
        } else {
            write!(f, "{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
        }
    }
}

// ---------------------------------------------------------------------------
// MediaRef
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

/// Handle to a media source. The core never looks inside; it is resolved by
/// the playback and thumbnail collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediaRef {
    pub uri: String,
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn new(uri: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            uri: uri.into(),
            kind,
        }
    }
}

/// Media picked by the user, before it becomes a piece.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaImport {
    pub media: MediaRef,
    /// `None` for sources without an intrinsic length (still images).
    pub duration: Option<TimeMs>,
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A trimmed `[start, end)` reference into a media source.
///
/// A piece without a model is a blank spacer. Pieces are never edited in
/// place; cutting or moving produces new values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawPiece")]
pub struct Piece {
    id: Uuid,
    model: Option<MediaRef>,
    start: TimeMs,
    end: TimeMs,
}

#[derive(Deserialize)]
struct RawPiece {
    id: Uuid,
    model: Option<MediaRef>,
    start: TimeMs,
    end: TimeMs,
}

impl TryFrom<RawPiece> for Piece {
    type Error = CoreError;

    fn try_from(raw: RawPiece) -> Result<Self> {
        check_range(raw.start, raw.end)?;
        Ok(Self {
            id: raw.id,
            model: raw.model,
            start: raw.start,
            end: raw.end,
        })
    }
}

fn check_range(start: TimeMs, end: TimeMs) -> Result<()> {
    if start < TimeMs::ZERO || end <= start {
        return Err(CoreError::InvalidRange { start, end });
    }
    Ok(())
}

impl Piece {
    pub fn new(model: Option<MediaRef>, start: TimeMs, end: TimeMs) -> Result<Self> {
        check_range(start, end)?;
        Ok(Self {
            id: Uuid::new_v4(),
            model,
            start,
            end,
        })
    }

    /// Blank spacer covering `[0, duration)`.
    pub fn blank(duration: TimeMs) -> Result<Self> {
        Self::new(None, TimeMs::ZERO, duration)
    }

    pub fn from_import(import: &MediaImport, fallback: TimeMs) -> Result<Self> {
        let duration = import.duration.unwrap_or(fallback);
        Self::new(Some(import.media.clone()), TimeMs::ZERO, duration)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model(&self) -> Option<&MediaRef> {
        self.model.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.model.is_none()
    }

    pub fn start(&self) -> TimeMs {
        self.start
    }

    pub fn end(&self) -> TimeMs {
        self.end
    }

    pub fn duration(&self) -> TimeMs {
        self.end - self.start
    }

    /// Same content under a fresh identity.
    pub(crate) fn with_range(&self, start: TimeMs, end: TimeMs) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: self.model.clone(),
            start,
            end,
        }
    }
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

/// One lane of pieces, in left-to-right screen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub pieces: Vec<Piece>,
}

impl Track {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn duration(&self) -> TimeMs {
        self.pieces.iter().map(Piece::duration).sum()
    }
}

// ---------------------------------------------------------------------------
// PositionAddress
// ---------------------------------------------------------------------------

/// `(track, piece)` indices. Only valid for the timeline it was resolved
/// against; re-resolve with [`Timeline::locate`] after every edit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PositionAddress {
    pub track: usize,
    pub piece: usize,
}

impl PositionAddress {
    pub fn new(track: usize, piece: usize) -> Self {
        Self { track, piece }
    }
}

impl fmt::Display for PositionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.track, self.piece)
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeline {
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// The shared timebase for every width calculation. Zero when no track
    /// holds a piece.
    pub fn longest_duration(&self) -> TimeMs {
        longest_duration(&self.tracks)
    }

    pub fn piece_count(&self) -> usize {
        self.tracks.iter().map(|t| t.pieces.len()).sum()
    }

    pub fn piece_at(&self, pos: PositionAddress) -> Option<&Piece> {
        self.tracks.get(pos.track)?.pieces.get(pos.piece)
    }

    /// Resolve a piece's current address from its identity.
    pub fn locate(&self, piece_id: Uuid) -> Option<PositionAddress> {
        for (ti, track) in self.tracks.iter().enumerate() {
            if let Some(pi) = track.pieces.iter().position(|p| p.id() == piece_id) {
                return Some(PositionAddress::new(ti, pi));
            }
        }
        None
    }

    pub fn contains(&self, piece_id: Uuid) -> bool {
        self.locate(piece_id).is_some()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub fn longest_duration(tracks: &[Track]) -> TimeMs {
    tracks
        .iter()
        .map(Track::duration)
        .max()
        .unwrap_or(TimeMs::ZERO)
        .max(TimeMs::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
