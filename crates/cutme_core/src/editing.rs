use crate::error::{CoreError, Result};
use crate::types::*;
use std::collections::HashSet;
use uuid::Uuid;

impl Piece {
    /// Split at an offset measured from the piece's own start.
    ///
    /// The offset must lie strictly inside `(0, duration)`; cutting on a
    /// boundary would produce an empty piece.
    pub fn cut(&self, cut_point: TimeMs) -> Result<(Piece, Piece)> {
        let duration = self.duration();
        if cut_point <= TimeMs::ZERO || cut_point >= duration {
            return Err(CoreError::InvalidCutPoint {
                cut_point,
                duration,
            });
        }

        let split = self.start() + cut_point;
        Ok((
            self.with_range(self.start(), split),
            self.with_range(split, self.end()),
        ))
    }
}

impl Timeline {
    /// Relocate the piece at `initial` to `target`, optionally preceded by a
    /// blank spacer, and return the edited timeline.
    ///
    /// `target.track` past the last track appends a new track; `target.piece`
    /// past the end of its track appends to that track.
    pub fn move_piece(
        &self,
        initial: PositionAddress,
        target: PositionAddress,
        preceding_blank: Option<TimeMs>,
    ) -> Result<Timeline> {
        let piece = self
            .piece_at(initial)
            .cloned()
            .ok_or(CoreError::AddressOutOfRange {
                track: initial.track,
                piece: initial.piece,
            })?;

        let mut inserted = Vec::with_capacity(2);
        if let Some(blank) = preceding_blank.filter(|d| *d > TimeMs::ZERO) {
            inserted.push(Piece::blank(blank)?);
        }
        inserted.push(piece);

        let mut tracks = self.tracks.clone();

        // Deleting first would shift a later target one slot to the left.
        if initial.track == target.track && initial.piece < target.piece {
            insert_pieces(&mut tracks, target, inserted);
            remove_piece(&mut tracks, initial);
        } else {
            remove_piece(&mut tracks, initial);
            insert_pieces(&mut tracks, target, inserted);
        }

        tracing::debug!(%initial, %target, ?preceding_blank, "moved piece");
        Ok(Timeline { tracks })
    }

    /// Replace the piece at `pos` with its two halves.
    pub fn cut_piece(&self, pos: PositionAddress, cut_point: TimeMs) -> Result<Timeline> {
        let piece = self.piece_at(pos).ok_or(CoreError::AddressOutOfRange {
            track: pos.track,
            piece: pos.piece,
        })?;
        let (left, right) = piece.cut(cut_point)?;

        let mut tracks = self.tracks.clone();
        let pieces = &mut tracks[pos.track].pieces;
        pieces[pos.piece] = left;
        pieces.insert(pos.piece + 1, right);
        Ok(Timeline { tracks })
    }

    /// Total duration of the pieces before `pos` in its track, i.e. the
    /// timeline time at which that piece starts.
    pub fn preceding_duration(&self, pos: PositionAddress) -> Result<TimeMs> {
        let track = self
            .tracks
            .get(pos.track)
            .filter(|t| pos.piece < t.pieces.len())
            .ok_or(CoreError::AddressOutOfRange {
                track: pos.track,
                piece: pos.piece,
            })?;
        Ok(track.pieces[..pos.piece].iter().map(Piece::duration).sum())
    }

    /// Drop every piece whose id is in `ids`. Tracks are kept even if they
    /// end up empty.
    pub fn remove_pieces(&self, ids: &HashSet<Uuid>) -> Timeline {
        let tracks = self
            .tracks
            .iter()
            .map(|t| Track::new(t.pieces.iter().filter(|p| !ids.contains(&p.id())).cloned().collect()))
            .collect();
        Timeline { tracks }
    }

    /// Insert `pieces` into an existing track at `index`, or append when
    /// `index` is past the end.
    pub fn insert_into_track(&self, track: usize, index: usize, pieces: Vec<Piece>) -> Result<Timeline> {
        if track >= self.tracks.len() {
            return Err(CoreError::TrackNotFound(track));
        }
        let mut tracks = self.tracks.clone();
        insert_pieces(&mut tracks, PositionAddress::new(track, index), pieces);
        Ok(Timeline { tracks })
    }

    /// Empty lanes removed, then exactly one empty lane appended at the end.
    pub fn normalized(&self) -> Timeline {
        let mut tracks: Vec<Track> = self.tracks.iter().filter(|t| !t.is_empty()).cloned().collect();
        tracks.push(Track::empty());
        Timeline { tracks }
    }
}

fn insert_pieces(tracks: &mut Vec<Track>, target: PositionAddress, pieces: Vec<Piece>) {
    match tracks.get_mut(target.track) {
        None => tracks.push(Track::new(pieces)),
        Some(track) if target.piece >= track.pieces.len() => track.pieces.extend(pieces),
        Some(track) => {
            let tail = track.pieces.split_off(target.piece);
            track.pieces.extend(pieces);
            track.pieces.extend(tail);
        }
    }
}

fn remove_piece(tracks: &mut [Track], pos: PositionAddress) {
    tracks[pos.track].pieces.remove(pos.piece);
}
