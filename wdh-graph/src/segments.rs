//! Partitioning of a series into classified line segments.

use chrono::{DateTime, Utc};
use serde::Serialize;

use wdh_series::observation::Observation;
use wdh_series::qualifier::PointClass;

/// One point of a line segment, reduced to what the renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_time: DateTime<Utc>,
    pub value: Option<f64>,
}

impl From<&Observation> for SegmentPoint {
    fn from(obs: &Observation) -> Self {
        SegmentPoint {
            date_time: obs.date_time,
            value: obs.finite_value(),
        }
    }
}

/// A maximal contiguous run of points sharing one drawing classification.
///
/// Unmasked runs are drawn as lines (approved/estimated styling); masked
/// runs are drawn as shaded regions labeled with the mask reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub class: PointClass,
    pub points: Vec<SegmentPoint>,
}

impl LineSegment {
    pub fn is_masked(&self) -> bool {
        self.class.is_masked()
    }
}

/// Partition a series into line segments.
///
/// A new segment starts whenever the point classification changes; null and
/// non-finite values classify as masked, so they terminate the surrounding
/// runs and form masked runs spanning the gap. Each point belongs to
/// exactly one segment. An empty series yields an empty list; an all-null
/// series yields a single masked run.
pub fn line_segments(points: &[Observation]) -> Vec<LineSegment> {
    let mut segments: Vec<LineSegment> = Vec::new();

    for obs in points {
        let class = PointClass::of(obs);
        match segments.last_mut() {
            Some(segment) if segment.class == class => {
                segment.points.push(obs.into());
            }
            _ => segments.push(LineSegment {
                class,
                points: vec![obs.into()],
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wdh_series::qualifier::MaskReason;

    fn obs(minute: i64, value: Option<f64>, qualifiers: &[&str]) -> Observation {
        let mut o = Observation::new(
            Utc.timestamp_millis_opt(minute * 60_000).unwrap(),
            value,
        );
        o.qualifiers = qualifiers.iter().map(|q| q.to_string()).collect();
        o
    }

    #[test]
    fn test_empty_series() {
        assert!(line_segments(&[]).is_empty());
    }

    #[test]
    fn test_uniform_series_single_segment() {
        let points = vec![
            obs(0, Some(1.0), &["A"]),
            obs(15, Some(2.0), &["A"]),
            obs(30, Some(3.0), &["A"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].points.len(), 3);
        assert!(segments[0].class.approved);
        assert!(!segments[0].is_masked());
    }

    #[test]
    fn test_null_in_middle_yields_three_segments() {
        // approved-run, masked single-point run, approved-run.
        let points = vec![
            obs(0, Some(1.0), &["A"]),
            obs(15, Some(2.0), &["A"]),
            obs(30, None, &["A", "ICE"]),
            obs(45, Some(4.0), &["A"]),
            obs(60, Some(5.0), &["A"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].points.len(), 2);
        assert_eq!(segments[1].points.len(), 1);
        assert_eq!(segments[2].points.len(), 2);
        assert_eq!(segments[1].class.mask, Some(MaskReason::Ice));
        assert!(!segments[0].is_masked());
        assert!(!segments[2].is_masked());
        // Boundary semantics: every point belongs to exactly one segment.
        let total: usize = segments.iter().map(|s| s.points.len()).sum();
        assert_eq!(total, points.len());
    }

    #[test]
    fn test_all_null_series_single_masked_run() {
        let points = vec![obs(0, None, &["P"]), obs(15, None, &["P"])];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].class.mask, Some(MaskReason::Missing));
        assert_eq!(segments[0].points.len(), 2);
    }

    #[test]
    fn test_classification_change_without_nulls() {
        // Approved-to-estimated transition splits the line.
        let points = vec![
            obs(0, Some(1.0), &["A"]),
            obs(15, Some(2.0), &["A", "E"]),
            obs(30, Some(3.0), &["A", "E"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].class.estimated);
        assert!(segments[1].class.estimated);
    }

    #[test]
    fn test_adjacent_masks_with_different_reasons_split() {
        let points = vec![
            obs(0, None, &["P", "ICE"]),
            obs(15, None, &["P", "FLD"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].class.mask, Some(MaskReason::Ice));
        assert_eq!(segments[1].class.mask, Some(MaskReason::Flood));
    }

    #[test]
    fn test_non_finite_value_masks() {
        let points = vec![
            obs(0, Some(1.0), &[]),
            obs(15, Some(f64::INFINITY), &[]),
            obs(30, Some(2.0), &[]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].class.mask, Some(MaskReason::Missing));
        // The non-finite value does not leak into the segment point.
        assert_eq!(segments[1].points[0].value, None);
    }
}
