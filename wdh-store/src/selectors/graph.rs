//! Selection and scale derivations over store state.

use std::collections::HashMap;
use std::sync::Arc;

use wdh_graph::segments::{line_segments, LineSegment};
use wdh_graph::ticks::TickDetails;
use wdh_series::observation::Observation;
use wdh_series::series::{Period, SeriesKey, TimeRange, TimeSeriesData, TsKey};

use crate::state::{AppState, GraphState};

use super::cursor::CursorPoint;

/// Line segments per series, keyed by the composite series key.
pub type SegmentMap = HashMap<String, Vec<LineSegment>>;

/// Cursor point per series, keyed by the composite series key.
pub type CursorMap = HashMap<String, CursorPoint>;

/// Everything a renderer needs to draw the main chart, bundled from the
/// individually memoized parts.
#[derive(Clone)]
pub struct HydrographView {
    pub y_domain: Arc<[f64; 2]>,
    pub ticks: Arc<TickDetails>,
    pub segments: Arc<SegmentMap>,
    pub cursor_points: Arc<CursorMap>,
    pub window: Option<TimeRange>,
}

/// Parameter code of the selected variable, used to pick the scale family.
pub fn current_parameter_code(state: &AppState) -> Option<String> {
    let id = state.graph.current_variable_id.as_ref()?;
    state
        .series_data
        .variable(id)
        .map(|v| v.parameter_code.clone())
}

/// Keys of the series in the given slot that match the selected variable,
/// method, and period, in deterministic order.
///
/// Median series carry a synthetic method id, so the method filter only
/// applies to the instantaneous slots.
pub fn series_keys_for(data: &TimeSeriesData, graph: &GraphState, ts_key: TsKey) -> Vec<String> {
    let mut keys: Vec<String> = data
        .time_series
        .iter()
        .filter_map(|(key_str, series)| {
            let key: SeriesKey = key_str.parse().ok()?;
            let matches = key.ts_key == ts_key
                && key.period == graph.current_period
                && graph.current_variable_id.as_deref() == Some(series.variable_id.as_str())
                && (ts_key == TsKey::Median
                    || graph.current_method_id.map_or(true, |m| m == key.method_id));
            matches.then(|| key_str.clone())
        })
        .collect();
    keys.sort();
    keys
}

/// Point arrays for every series whose slot is toggled on. The Y domain is
/// fit to exactly these.
pub fn visible_points(data: &TimeSeriesData, graph: &GraphState) -> Vec<Vec<Observation>> {
    let mut arrays = Vec::new();
    for ts_key in TsKey::ALL {
        if !graph.show.get(ts_key) {
            continue;
        }
        for key in series_keys_for(data, graph, ts_key) {
            if let Some(series) = data.time_series.get(&key) {
                arrays.push(series.points.clone());
            }
        }
    }
    arrays
}

/// Style-run segments for each listed series.
pub fn line_segments_map(data: &TimeSeriesData, keys: &[String]) -> SegmentMap {
    keys.iter()
        .filter_map(|key| {
            data.time_series
                .get(key)
                .map(|series| (key.clone(), line_segments(&series.points)))
        })
        .collect()
}

/// The time range shown on the main chart: the query window for the
/// selected period, narrowed by the brush when one is set.
pub fn main_window(state: &AppState) -> Option<TimeRange> {
    let domain = match state.graph.current_period {
        Period::Custom => state
            .graph
            .custom_time_range
            .or_else(|| state.series_data.query_window(TsKey::Current, Period::Custom)),
        period => state.series_data.query_window(TsKey::Current, period),
    }?;
    Some(match state.graph.brush {
        Some(brush) => brush.window(domain),
        None => domain,
    })
}
