//! Nearest-point resolution for the chart cursor.

use chrono::{DateTime, Utc};

use wdh_series::observation::Observation;

/// The data point closest in time to a cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub index: usize,
    pub point: &'a Observation,
}

/// Find the point nearest to `time` in a time-ordered series.
///
/// Bisection finds the insertion point, then the closer of the two
/// neighboring points wins; at either boundary the only available neighbor
/// is returned. When both neighbors are equidistant the earlier point is
/// returned, but callers should only rely on "closer wins".
pub fn nearest_point(points: &[Observation], time: DateTime<Utc>) -> Option<Nearest<'_>> {
    if points.is_empty() {
        return None;
    }
    // Lower-bound insertion index, held at >= 1 so a left neighbor exists.
    let index = points
        .partition_point(|p| p.date_time < time)
        .clamp(1, points.len());

    let before = &points[index - 1];
    match points.get(index) {
        Some(after) if time - before.date_time > after.date_time - time => Some(Nearest {
            index,
            point: after,
        }),
        _ => Some(Nearest {
            index: index - 1,
            point: before,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series(times_ms: &[i64]) -> Vec<Observation> {
        times_ms
            .iter()
            .map(|ms| {
                Observation::new(
                    Utc.timestamp_millis_opt(*ms).unwrap(),
                    Some(*ms as f64),
                )
            })
            .collect()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_closer_wins() {
        // Two points at t=0 and t=100; target 60 is closer to t=100.
        let points = series(&[0, 100]);
        let nearest = nearest_point(&points, at(60)).unwrap();
        assert_eq!(nearest.index, 1);
        assert_eq!(nearest.point.date_time, at(100));

        let nearest = nearest_point(&points, at(40)).unwrap();
        assert_eq!(nearest.index, 0);
    }

    #[test]
    fn test_boundaries_clamp() {
        let points = series(&[100, 200, 300]);
        assert_eq!(nearest_point(&points, at(-500)).unwrap().index, 0);
        assert_eq!(nearest_point(&points, at(900)).unwrap().index, 2);
    }

    #[test]
    fn test_exact_hit() {
        let points = series(&[100, 200, 300]);
        let nearest = nearest_point(&points, at(200)).unwrap();
        assert_eq!(nearest.index, 1);
        assert_eq!(nearest.point.date_time, at(200));
    }

    #[test]
    fn test_idempotent() {
        let points = series(&[0, 900_000, 1_800_000]);
        let a = nearest_point(&points, at(600_000)).unwrap();
        let b = nearest_point(&points, at(600_000)).unwrap();
        assert_eq!(a.index, b.index);
        assert_eq!(a.point, b.point);
    }

    #[test]
    fn test_empty_series() {
        assert!(nearest_point(&[], at(0)).is_none());
    }

    #[test]
    fn test_single_point() {
        let points = series(&[500]);
        let nearest = nearest_point(&points, at(123_456)).unwrap();
        assert_eq!(nearest.index, 0);
    }
}
