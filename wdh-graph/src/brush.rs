//! Brush (zoom window) offset math.
//!
//! The brush stores its selection as a pair of durations trimmed from the
//! two ends of the full series domain, not as absolute times. Stored that
//! way, the selection survives a refetch: re-projecting the offsets onto
//! the new domain yields the equivalent window.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use wdh_series::series::TimeRange;

/// Durations trimmed from the start and end of the full domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushOffset {
    /// Distance from the domain start to the window start.
    pub start: TimeDelta,
    /// Distance from the window end to the domain end.
    pub end: TimeDelta,
}

impl BrushOffset {
    pub fn new(start: TimeDelta, end: TimeDelta) -> Self {
        BrushOffset { start, end }
    }

    /// Project these offsets onto a domain, yielding the visible window.
    ///
    /// Out-of-range offsets clamp to the domain bounds; a selection that
    /// would invert (end at or before start) falls back to the full domain.
    pub fn window(&self, domain: TimeRange) -> TimeRange {
        let start = domain.clamp_time(domain.start + self.start);
        let end = domain.clamp_time(domain.end - self.end);
        if end <= start {
            return domain;
        }
        TimeRange::new(start, end)
    }

    /// Convert an absolute selection back into offsets against a domain
    /// (the drag-end conversion). Offsets are clamped to be non-negative.
    pub fn from_window(domain: TimeRange, selection: TimeRange) -> Self {
        BrushOffset {
            start: (selection.start - domain.start).max(TimeDelta::zero()),
            end: (domain.end - selection.end).max(TimeDelta::zero()),
        }
    }
}

/// In-progress brush gesture.
///
/// Intermediate drag frames only move the visual selection; nothing is
/// dispatched to the store until the gesture ends, so high-frequency
/// pointer-move events never thrash the derived-state graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrushDrag {
    selection: Option<TimeRange>,
}

impl BrushDrag {
    pub fn new() -> Self {
        BrushDrag::default()
    }

    /// Track an intermediate drag frame. Visual-only; no state dispatch.
    pub fn update(&mut self, selection: TimeRange) {
        self.selection = Some(selection);
    }

    /// The selection to draw the handles at, if a drag is in progress.
    pub fn selection(&self) -> Option<TimeRange> {
        self.selection
    }

    /// End the gesture, converting the final selection into offsets for a
    /// single store dispatch. Returns `None` when no drag happened.
    pub fn finish(&mut self, domain: TimeRange) -> Option<BrushOffset> {
        self.selection
            .take()
            .map(|selection| BrushOffset::from_window(domain, selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range(start_ms: i64, end_ms: i64) -> TimeRange {
        TimeRange::new(
            Utc.timestamp_millis_opt(start_ms).unwrap(),
            Utc.timestamp_millis_opt(end_ms).unwrap(),
        )
    }

    #[test]
    fn test_window_projection() {
        let domain = range(0, 1_000_000);
        let offset = BrushOffset::new(
            TimeDelta::milliseconds(100_200),
            TimeDelta::milliseconds(300_400),
        );
        assert_eq!(offset.window(domain), range(100_200, 699_600));
    }

    #[test]
    fn test_round_trip_through_offsets() {
        let domain = range(0, 1_000_000);
        let selection = range(100_200, 699_600);
        let offset = BrushOffset::from_window(domain, selection);
        assert_eq!(offset.start, TimeDelta::milliseconds(100_200));
        assert_eq!(offset.end, TimeDelta::milliseconds(300_400));
        assert_eq!(offset.window(domain), selection);
    }

    #[test]
    fn test_reprojection_after_domain_change() {
        // A refetch replaces the domain; stored offsets re-project onto it.
        let offset = BrushOffset::new(
            TimeDelta::milliseconds(10_000),
            TimeDelta::milliseconds(20_000),
        );
        assert_eq!(offset.window(range(0, 100_000)), range(10_000, 80_000));
        assert_eq!(
            offset.window(range(50_000, 250_000)),
            range(60_000, 230_000)
        );
    }

    #[test]
    fn test_out_of_range_offsets_clamp() {
        let domain = range(0, 100_000);
        let offset = BrushOffset::new(
            TimeDelta::milliseconds(-50_000),
            TimeDelta::milliseconds(250_000),
        );
        // Start clamps into the domain; the inverted window falls back to
        // the full domain.
        assert_eq!(offset.window(domain), domain);

        let offset = BrushOffset::new(TimeDelta::milliseconds(-50_000), TimeDelta::zero());
        assert_eq!(offset.window(domain), domain);
    }

    #[test]
    fn test_inverted_selection_falls_back_to_domain() {
        let domain = range(0, 100_000);
        let offset = BrushOffset::new(
            TimeDelta::milliseconds(80_000),
            TimeDelta::milliseconds(80_000),
        );
        assert_eq!(offset.window(domain), domain);
    }

    #[test]
    fn test_drag_defers_until_finish() {
        let domain = range(0, 1_000_000);
        let mut drag = BrushDrag::new();
        assert_eq!(drag.finish(domain), None);

        drag.update(range(100_000, 200_000));
        drag.update(range(100_200, 699_600));
        assert_eq!(drag.selection(), Some(range(100_200, 699_600)));

        let offset = drag.finish(domain).unwrap();
        assert_eq!(offset.start, TimeDelta::milliseconds(100_200));
        assert_eq!(offset.end, TimeDelta::milliseconds(300_400));
        // The gesture is consumed.
        assert_eq!(drag.selection(), None);
    }
}
