//! The memoized selector graph.
//!
//! Free functions in [`cursor`] and [`graph`] compute derived values from
//! state; [`Derived`] holds one memo cell per derivation so repeated reads
//! between state changes are pointer-equal cache hits, and a change to one
//! part of the state only recomputes the derivations that read it.

pub mod cursor;
pub mod graph;
pub mod memo;

use std::sync::Arc;

use chrono::TimeDelta;
use wdh_graph::domain;
use wdh_graph::ticks::{self, TickDetails};
use wdh_series::observation::Observation;
use wdh_series::series::{Period, TimeRange, TimeSeriesData, TsKey};

use crate::state::{AppState, ShowSeries};

use cursor::TooltipPoint;
use graph::{CursorMap, HydrographView, SegmentMap};
use memo::{Memo1, Memo2, Memo3, Memo4, Memo5, PerTsKey};

/// Memo cells for every derivation, in dependency order.
#[derive(Default)]
pub struct Derived {
    series_keys:
        PerTsKey<Memo4<Arc<TimeSeriesData>, Option<String>, Option<i64>, Period, Vec<String>>>,
    visible_points: Memo5<
        Arc<TimeSeriesData>,
        ShowSeries,
        Arc<Vec<String>>,
        Arc<Vec<String>>,
        Arc<Vec<String>>,
        Vec<Vec<Observation>>,
    >,
    y_domain: Memo2<Arc<Vec<Vec<Observation>>>, Option<String>, [f64; 2]>,
    ticks: Memo3<Arc<[f64; 2]>, Option<String>, u32, TickDetails>,
    segments: PerTsKey<Memo2<Arc<TimeSeriesData>, Arc<Vec<String>>, SegmentMap>>,
    cursor_points: PerTsKey<
        Memo5<Arc<TimeSeriesData>, Arc<Vec<String>>, Option<TimeDelta>, Period, bool, CursorMap>,
    >,
    tooltip_points: PerTsKey<Memo1<Arc<CursorMap>, Vec<TooltipPoint>>>,
    view: Memo5<
        Arc<[f64; 2]>,
        Arc<TickDetails>,
        Arc<SegmentMap>,
        Arc<CursorMap>,
        Option<TimeRange>,
        HydrographView,
    >,
}

impl Derived {
    /// Keys of the series shown in a slot for the current selection.
    pub fn series_keys(&mut self, state: &AppState, ts_key: TsKey) -> Arc<Vec<String>> {
        self.series_keys.get_mut(ts_key).get(
            &state.series_data,
            &state.graph.current_variable_id,
            &state.graph.current_method_id,
            &state.graph.current_period,
            || graph::series_keys_for(&state.series_data, &state.graph, ts_key),
        )
    }

    /// Point arrays of every visible series, the input to the Y domain.
    pub fn visible_points(&mut self, state: &AppState) -> Arc<Vec<Vec<Observation>>> {
        // recompute when data, toggles, or the selected series change
        let current = self.series_keys(state, TsKey::Current);
        let compare = self.series_keys(state, TsKey::Compare);
        let median = self.series_keys(state, TsKey::Median);
        self.visible_points.get(
            &state.series_data,
            &state.graph.show,
            &current,
            &compare,
            &median,
            || graph::visible_points(&state.series_data, &state.graph),
        )
    }

    pub fn y_domain(&mut self, state: &AppState) -> Arc<[f64; 2]> {
        let points = self.visible_points(state);
        let parameter = graph::current_parameter_code(state);
        self.y_domain.get(&points, &parameter, || {
            domain::y_domain(points.as_slice(), parameter.as_deref().unwrap_or(""))
        })
    }

    pub fn tick_details(&mut self, state: &AppState) -> Arc<TickDetails> {
        let y_domain = self.y_domain(state);
        let parameter = graph::current_parameter_code(state);
        let window_width = state.ui.window_width;
        self.ticks.get(&y_domain, &parameter, &window_width, || {
            ticks::tick_details(*y_domain, parameter.as_deref().unwrap_or(""), window_width)
        })
    }

    /// Style-run segments per series in a slot, keyed by series key.
    pub fn line_segments(&mut self, state: &AppState, ts_key: TsKey) -> Arc<SegmentMap> {
        let keys = self.series_keys(state, ts_key);
        self.segments
            .get_mut(ts_key)
            .get(&state.series_data, &keys, || {
                graph::line_segments_map(&state.series_data, &keys)
            })
    }

    /// Offset of the cursor from the query-window start, if shown.
    pub fn cursor_offset(&mut self, state: &AppState) -> Option<TimeDelta> {
        let keys = self.series_keys(state, TsKey::Current);
        cursor::cursor_offset(state, &keys)
    }

    pub fn ts_cursor_points(&mut self, state: &AppState, ts_key: TsKey) -> Arc<CursorMap> {
        let keys = self.series_keys(state, ts_key);
        let offset = self.cursor_offset(state);
        let period = state.graph.current_period;
        let visible = state.graph.show.get(ts_key);
        self.cursor_points.get_mut(ts_key).get(
            &state.series_data,
            &keys,
            &offset,
            &period,
            &visible,
            || cursor::ts_cursor_points(state, &keys, offset, ts_key),
        )
    }

    pub fn tooltip_points(&mut self, state: &AppState, ts_key: TsKey) -> Arc<Vec<TooltipPoint>> {
        let points = self.ts_cursor_points(state, ts_key);
        self.tooltip_points
            .get_mut(ts_key)
            .get(&points, || cursor::tooltip_points(&points))
    }

    /// The bundled view of the main chart. Pointer-stable as long as none
    /// of its parts changed.
    pub fn hydrograph_view(&mut self, state: &AppState) -> Arc<HydrographView> {
        let y_domain = self.y_domain(state);
        let ticks = self.tick_details(state);
        let segments = self.line_segments(state, TsKey::Current);
        let cursor_points = self.ts_cursor_points(state, TsKey::Current);
        let window = graph::main_window(state);
        self.view
            .get(&y_domain, &ticks, &segments, &cursor_points, &window, || {
                HydrographView {
                    y_domain: Arc::clone(&y_domain),
                    ticks: Arc::clone(&ticks),
                    segments: Arc::clone(&segments),
                    cursor_points: Arc::clone(&cursor_points),
                    window,
                }
            })
    }
}
