//! Cursor and tooltip derivations.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use wdh_graph::cursor::nearest_point;
use wdh_series::series::TsKey;

use crate::state::{AppState, CursorSetting};

use super::graph::CursorMap;

/// The observation a cursor resolves to on one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_time: DateTime<Utc>,
    pub value: Option<f64>,
    pub qualifiers: Vec<String>,
    pub ts_key: TsKey,
}

/// A point the tooltip renders: only finite-valued cursor points qualify.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub x: DateTime<Utc>,
    pub y: f64,
}

/// Resolve the cursor setting to a concrete offset from the query-window
/// start, or `None` when the cursor is hidden.
///
/// With no explicit offset the cursor parks at the last finite reading of
/// the selected current series, so a chart opens with the freshest value
/// highlighted. `current_keys` is the resolved key list for the current
/// slot; callers pass the memoized one.
pub fn cursor_offset(state: &AppState, current_keys: &[String]) -> Option<TimeDelta> {
    match state.graph.cursor {
        CursorSetting::Hidden => None,
        CursorSetting::Fixed(offset) => Some(offset),
        CursorSetting::Latest => {
            let series = current_keys
                .iter()
                .find_map(|key| state.series_data.time_series.get(key))?;
            let last = series.last_finite_point()?;
            let start = state
                .series_data
                .query_window(TsKey::Current, state.graph.current_period)
                .map(|w| w.start)
                .or_else(|| series.points.first().map(|p| p.date_time))?;
            Some(last.offset_from(start))
        }
    }
}

/// The nearest observation to the cursor on each matching series in the
/// given slot. Empty when the slot is toggled off or the cursor is hidden.
///
/// The offset is interpreted against each slot's own query window, so the
/// compare series lines up with the current one a year later.
pub fn ts_cursor_points(
    state: &AppState,
    keys: &[String],
    offset: Option<TimeDelta>,
    ts_key: TsKey,
) -> CursorMap {
    let mut map = CursorMap::new();
    if !state.graph.show.get(ts_key) {
        return map;
    }
    let Some(offset) = offset else {
        return map;
    };
    let data = &state.series_data;
    let period = state.graph.current_period;
    for key in keys {
        let Some(series) = data.time_series.get(key) else {
            continue;
        };
        let Some(start) = data
            .query_window(ts_key, period)
            .map(|w| w.start)
            .or_else(|| series.points.first().map(|p| p.date_time))
        else {
            continue;
        };
        if let Some(nearest) = nearest_point(&series.points, start + offset) {
            map.insert(
                key.clone(),
                CursorPoint {
                    date_time: nearest.point.date_time,
                    value: nearest.point.value,
                    qualifiers: nearest.point.qualifiers.clone(),
                    ts_key,
                },
            );
        }
    }
    map
}

/// Flatten a cursor-point map for the tooltip, dropping masked and
/// non-finite values. Ordered by series key for stable rendering.
pub fn tooltip_points(cursor_points: &CursorMap) -> Vec<TooltipPoint> {
    let mut entries: Vec<(&String, &CursorPoint)> = cursor_points.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .filter_map(|(_, point)| {
            let y = point.value.filter(|v| v.is_finite())?;
            Some(TooltipPoint {
                x: point.date_time,
                y,
            })
        })
        .collect()
}
