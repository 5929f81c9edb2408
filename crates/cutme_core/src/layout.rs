//! Conversions between the duration domain and on-screen offsets.
//!
//! Every width is proportional to `duration / longest_duration`, so all tracks
//! share one time axis no matter how long each of them is. A timeline without
//! pieces has no axis: widths are 0 and inverse conversions yield `None`.

use crate::settings::EditorSettings;
use crate::types::*;
use uuid::Uuid;

/// Horizontal extent of one piece inside its track row, in dp, measured from
/// the left edge of the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub piece_id: Uuid,
    pub left_dp: f32,
    pub width_dp: f32,
}

impl Span {
    pub fn right_dp(&self) -> f32 {
        self.left_dp + self.width_dp
    }
}

/// Where a dragged piece is being held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPoint {
    /// Centre of the dragged card, window pixels.
    pub x_px: f32,
    /// Current horizontal scroll of the timeline, pixels.
    pub scroll_px: f32,
    /// On-screen width of the dragged card.
    pub dragged_width_dp: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMapper {
    viewport_width_dp: f32,
    density: f32,
    leading_padding_dp: f32,
    zoom: f32,
    longest: TimeMs,
}

impl LayoutMapper {
    pub fn new(settings: &EditorSettings, timeline: &Timeline, zoom: f32) -> Self {
        Self::with_longest(settings, timeline.longest_duration(), zoom)
    }

    pub fn with_longest(settings: &EditorSettings, longest: TimeMs, zoom: f32) -> Self {
        Self {
            viewport_width_dp: settings.viewport_width_dp,
            density: settings.density,
            leading_padding_dp: settings.leading_padding_dp(),
            zoom: clamp_zoom(zoom, settings.min_zoom),
            longest,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn longest(&self) -> TimeMs {
        self.longest
    }

    /// Width at zoom 1, rounded to whole dp.
    pub fn base_width_dp(&self, duration: TimeMs) -> f32 {
        if self.longest <= TimeMs::ZERO {
            return 0.0;
        }
        (self.viewport_width_dp * (duration.0 as f32 / self.longest.0 as f32)).round()
    }

    pub fn width_of(&self, piece: &Piece) -> f32 {
        self.base_width_dp(piece.duration()) * self.zoom
    }

    pub fn track_width_dp(&self, track: &Track) -> f32 {
        track.pieces.iter().map(|p| self.width_of(p)).sum()
    }

    /// Left-to-right spans of a track's pieces, after the leading padding.
    pub fn piece_spans(&self, track: &Track) -> Vec<Span> {
        let mut left = self.leading_padding_dp;
        track
            .pieces
            .iter()
            .map(|piece| {
                let width = self.width_of(piece);
                let span = Span {
                    piece_id: piece.id(),
                    left_dp: left,
                    width_dp: width,
                };
                left += width;
                span
            })
            .collect()
    }

    /// Full scrollable width: both paddings plus the widest track.
    pub fn content_width_dp(&self, timeline: &Timeline) -> f32 {
        let widest = timeline
            .tracks
            .iter()
            .map(|t| self.track_width_dp(t))
            .fold(0.0_f32, f32::max);
        self.leading_padding_dp * 2.0 + widest
    }

    /// Width of the gap between the timeline start and the left edge of a
    /// card dropped at `drop`. Never negative.
    pub fn blank_width_dp(&self, drop: DropPoint) -> u32 {
        let density = if self.density > 0.0 { self.density } else { 1.0 };
        let left_edge = (drop.scroll_px + drop.x_px) / density - drop.dragged_width_dp / 2.0;
        (left_edge - self.leading_padding_dp).round().max(0.0) as u32
    }

    /// Duration of a blank spacer `width_dp` wide, for `move_piece`.
    pub fn blank_duration(&self, width_dp: u32) -> Option<TimeMs> {
        if width_dp == 0 || self.longest <= TimeMs::ZERO || self.viewport_width_dp <= 0.0 {
            return None;
        }
        let ms = (self.longest.0 as f64 * width_dp as f64 / self.viewport_width_dp as f64).round() as i64;
        (ms > 0).then_some(TimeMs(ms))
    }
}

pub fn clamp_zoom(zoom: f32, min_zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.max(min_zoom)
    } else {
        min_zoom
    }
}

/// Keep the on-screen scale per millisecond steady when the longest track
/// changes length.
pub fn rescale_zoom(zoom: f32, old_longest: TimeMs, new_longest: TimeMs, min_zoom: f32) -> f32 {
    if old_longest <= TimeMs::ZERO || new_longest <= TimeMs::ZERO {
        return clamp_zoom(zoom, min_zoom);
    }
    clamp_zoom(zoom * (new_longest.0 as f32 / old_longest.0 as f32), min_zoom)
}

/// Horizontal scroll state of the timeline, which doubles as the playback
/// cursor: the point under the centre line is the current time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollProgress {
    pub value: i32,
    pub max: i32,
}

impl ScrollProgress {
    pub fn new(value: i32, max: i32) -> Self {
        Self { value, max }
    }

    pub fn cursor(&self, duration: TimeMs) -> TimeMs {
        if self.max <= 0 {
            return TimeMs::ZERO;
        }
        TimeMs((duration.0 as f64 * self.value as f64 / self.max as f64).round() as i64)
    }

    /// Scroll value that puts `position` under the centre line.
    pub fn scroll_for(&self, position: TimeMs, duration: TimeMs) -> Option<i32> {
        if duration <= TimeMs::ZERO {
            return None;
        }
        Some((self.max as i64 * position.0 / duration.0) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::preset_phone;

    fn settings(viewport: f32) -> EditorSettings {
        EditorSettings {
            viewport_width_dp: viewport,
            density: 2.0,
            ..preset_phone()
        }
    }

    fn piece(ms: i64) -> Piece {
        Piece::new(Some(MediaRef::new("v", MediaKind::Video)), TimeMs::ZERO, TimeMs(ms)).unwrap()
    }

    fn two_tracks() -> Timeline {
        Timeline::new(vec![
            Track::new(vec![piece(1_000), piece(2_000)]),
            Track::new(vec![piece(4_000)]),
        ])
    }

    // -----------------------------------------------------------------------
    // widths
    // -----------------------------------------------------------------------

    #[test]
    fn longest_track_spans_viewport_at_zoom_one() {
        let tl = two_tracks();
        let layout = LayoutMapper::new(&settings(400.0), &tl, 1.0);
        assert_eq!(layout.track_width_dp(&tl.tracks[1]), 400.0);
        assert_eq!(layout.track_width_dp(&tl.tracks[0]), 300.0);
    }

    #[test]
    fn width_scales_with_zoom() {
        let tl = two_tracks();
        let layout = LayoutMapper::new(&settings(400.0), &tl, 2.5);
        assert_eq!(layout.width_of(&tl.tracks[0].pieces[0]), 250.0);
    }

    #[test]
    fn width_is_proportional_to_duration() {
        let viewport = 411.0;
        let tl = Timeline::new(vec![
            Track::new(vec![piece(333), piece(1_234), piece(77)]),
            Track::new(vec![piece(9_871)]),
        ]);
        let longest = tl.longest_duration().0 as f32;
        for zoom in [0.5_f32, 1.0, 1.7, 3.0, 8.25] {
            let layout = LayoutMapper::new(&settings(viewport), &tl, zoom);
            for p in tl.tracks.iter().flat_map(|t| &t.pieces) {
                let ratio = layout.width_of(p) / (viewport * zoom);
                let expected = p.duration().0 as f32 / longest;
                assert!((ratio - expected).abs() <= 0.5 / viewport + 1e-6);
            }
        }
    }

    #[test]
    fn zero_longest_gives_zero_widths() {
        let tl = Timeline::new(vec![Track::empty(), Track::empty()]);
        let layout = LayoutMapper::new(&settings(400.0), &tl, 1.0);
        assert_eq!(layout.base_width_dp(TimeMs(1_000)), 0.0);
        assert_eq!(layout.content_width_dp(&tl), 400.0);
        assert_eq!(layout.blank_duration(50), None);
    }

    #[test]
    fn zoom_below_minimum_is_clamped() {
        let layout = LayoutMapper::new(&settings(400.0), &two_tracks(), 0.1);
        assert_eq!(layout.zoom(), 0.5);
        assert_eq!(clamp_zoom(f32::NAN, 0.5), 0.5);
    }

    #[test]
    fn spans_start_after_leading_padding() {
        let tl = two_tracks();
        let layout = LayoutMapper::new(&settings(400.0), &tl, 1.0);
        let spans = layout.piece_spans(&tl.tracks[0]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].left_dp, 200.0);
        assert_eq!(spans[0].width_dp, 100.0);
        assert_eq!(spans[1].left_dp, 300.0);
        assert_eq!(spans[1].right_dp(), 500.0);
        assert_eq!(spans[1].piece_id, tl.tracks[0].pieces[1].id());
    }

    // -----------------------------------------------------------------------
    // inverse mapping
    // -----------------------------------------------------------------------

    #[test]
    fn blank_width_from_drop_point() {
        let layout = LayoutMapper::new(&settings(400.0), &two_tracks(), 1.0);
        // (100 + 500) / 2 - 40 / 2 - 200 = 80
        let drop = DropPoint {
            x_px: 500.0,
            scroll_px: 100.0,
            dragged_width_dp: 40.0,
        };
        assert_eq!(layout.blank_width_dp(drop), 80);
    }

    #[test]
    fn blank_width_is_clamped_to_zero() {
        let layout = LayoutMapper::new(&settings(400.0), &two_tracks(), 1.0);
        let drop = DropPoint {
            x_px: 10.0,
            scroll_px: 0.0,
            dragged_width_dp: 40.0,
        };
        assert_eq!(layout.blank_width_dp(drop), 0);
    }

    #[test]
    fn blank_duration_from_width() {
        let layout = LayoutMapper::new(&settings(400.0), &two_tracks(), 1.0);
        assert_eq!(layout.blank_duration(100), Some(TimeMs(1_000)));
        assert_eq!(layout.blank_duration(0), None);
    }

    // -----------------------------------------------------------------------
    // zoom rescale
    // -----------------------------------------------------------------------

    #[test]
    fn rescale_keeps_scale_per_millisecond() {
        assert_eq!(rescale_zoom(2.0, TimeMs(4_000), TimeMs(8_000), 0.5), 4.0);
        assert_eq!(rescale_zoom(2.0, TimeMs(4_000), TimeMs(1_000), 0.5), 0.5);
        assert_eq!(rescale_zoom(2.0, TimeMs::ZERO, TimeMs(1_000), 0.5), 2.0);
        assert_eq!(rescale_zoom(2.0, TimeMs(1_000), TimeMs::ZERO, 0.5), 2.0);
    }

    // -----------------------------------------------------------------------
    // scroll progress
    // -----------------------------------------------------------------------

    #[test]
    fn cursor_from_scroll() {
        assert_eq!(ScrollProgress::new(50, 200).cursor(TimeMs(8_000)), TimeMs(2_000));
        assert_eq!(ScrollProgress::new(0, 0).cursor(TimeMs(8_000)), TimeMs::ZERO);
    }

    #[test]
    fn scroll_for_position() {
        let progress = ScrollProgress::new(0, 1_000);
        assert_eq!(progress.scroll_for(TimeMs(2_000), TimeMs(8_000)), Some(250));
        assert_eq!(progress.scroll_for(TimeMs(2_000), TimeMs::ZERO), None);
    }
}
