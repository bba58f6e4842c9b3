//! The action/reducer state container.

use std::sync::Arc;

use chrono::TimeDelta;
use wdh_graph::brush::BrushOffset;
use wdh_graph::ticks::TickDetails;
use wdh_series::observation::Observation;
use wdh_series::series::{Period, TimeRange, TimeSeriesData, TsKey};

use crate::playback::PlayId;
use crate::selectors::cursor::TooltipPoint;
use crate::selectors::graph::{self, CursorMap, HydrographView, SegmentMap};
use crate::selectors::Derived;
use crate::state::{AppState, CursorSetting};

/// Every way the state can change. State is only mutated by dispatching
/// one of these.
#[derive(Debug, Clone)]
pub enum Action {
    /// Swap in a freshly fetched data slice.
    ReplaceSeriesData(Arc<TimeSeriesData>),
    SetSeriesVisibility { ts_key: TsKey, show: bool },
    SetCurrentVariable(String),
    SetCurrentMethod(i64),
    SetPeriod(Period),
    SetCustomTimeRange(TimeRange),
    SetCursorOffset(CursorSetting),
    SetBrushOffset { start: TimeDelta, end: TimeDelta },
    ClearBrushOffset,
    AddLoadingKeys(Vec<String>),
    RemoveLoadingKeys(Vec<String>),
    PlaybackStarted(PlayId),
    PlaybackStopped,
    ResizeGraph { window_width: u32, width: u32 },
}

fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::ReplaceSeriesData(data) => state.series_data = data,
        Action::SetSeriesVisibility { ts_key, show } => state.graph.show.set(ts_key, show),
        Action::SetCurrentVariable(id) => state.graph.current_variable_id = Some(id),
        Action::SetCurrentMethod(id) => state.graph.current_method_id = Some(id),
        Action::SetPeriod(period) => state.graph.current_period = period,
        Action::SetCustomTimeRange(range) => state.graph.custom_time_range = Some(range),
        Action::SetCursorOffset(cursor) => state.graph.cursor = cursor,
        Action::SetBrushOffset { start, end } => {
            state.graph.brush = Some(BrushOffset::new(start, end))
        }
        Action::ClearBrushOffset => state.graph.brush = None,
        Action::AddLoadingKeys(keys) => state.graph.loading_keys.extend(keys),
        Action::RemoveLoadingKeys(keys) => {
            state.graph.loading_keys.retain(|k| !keys.contains(k))
        }
        Action::PlaybackStarted(id) => state.graph.play_id = Some(id),
        Action::PlaybackStopped => state.graph.play_id = None,
        Action::ResizeGraph {
            window_width,
            width,
        } => {
            state.ui.window_width = window_width;
            state.ui.width = width;
        }
    }
}

/// The state container. Reads go through the selector methods so they
/// benefit from memoization; writes go through [`Store::dispatch`].
#[derive(Default)]
pub struct Store {
    state: AppState,
    derived: Derived,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Store {
            state,
            derived: Derived::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        log::debug!("dispatch {action:?}");
        reduce(&mut self.state, action);
    }

    pub fn is_visible(&self, ts_key: TsKey) -> bool {
        self.state.graph.show.get(ts_key)
    }

    pub fn series_keys(&mut self, ts_key: TsKey) -> Arc<Vec<String>> {
        self.derived.series_keys(&self.state, ts_key)
    }

    pub fn visible_points(&mut self) -> Arc<Vec<Vec<Observation>>> {
        self.derived.visible_points(&self.state)
    }

    pub fn y_domain(&mut self) -> Arc<[f64; 2]> {
        self.derived.y_domain(&self.state)
    }

    pub fn tick_details(&mut self) -> Arc<TickDetails> {
        self.derived.tick_details(&self.state)
    }

    pub fn line_segments(&mut self, ts_key: TsKey) -> Arc<SegmentMap> {
        self.derived.line_segments(&self.state, ts_key)
    }

    pub fn cursor_offset(&mut self) -> Option<TimeDelta> {
        self.derived.cursor_offset(&self.state)
    }

    pub fn ts_cursor_points(&mut self, ts_key: TsKey) -> Arc<CursorMap> {
        self.derived.ts_cursor_points(&self.state, ts_key)
    }

    pub fn tooltip_points(&mut self, ts_key: TsKey) -> Arc<Vec<TooltipPoint>> {
        self.derived.tooltip_points(&self.state, ts_key)
    }

    pub fn main_window(&self) -> Option<TimeRange> {
        graph::main_window(&self.state)
    }

    pub fn hydrograph_view(&mut self) -> Arc<HydrographView> {
        self.derived.hydrograph_view(&self.state)
    }
}
