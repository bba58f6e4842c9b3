//! The state tree held by the store.

use std::sync::Arc;

use chrono::TimeDelta;
use wdh_graph::brush::BrushOffset;
use wdh_series::series::{Period, TimeRange, TimeSeriesData, TsKey};

use crate::playback::PlayId;

/// Where the cursor sits, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorSetting {
    /// No cursor is shown and no tooltip points are produced.
    Hidden,
    /// No explicit position; the cursor parks at the most recent reading.
    #[default]
    Latest,
    /// Explicit offset from the start of the query window.
    Fixed(TimeDelta),
}

/// Visibility toggles for the three series slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowSeries {
    pub current: bool,
    pub compare: bool,
    pub median: bool,
}

impl Default for ShowSeries {
    fn default() -> Self {
        ShowSeries {
            current: true,
            compare: false,
            median: false,
        }
    }
}

impl ShowSeries {
    pub fn get(&self, ts_key: TsKey) -> bool {
        match ts_key {
            TsKey::Current => self.current,
            TsKey::Compare => self.compare,
            TsKey::Median => self.median,
        }
    }

    pub fn set(&mut self, ts_key: TsKey, show: bool) {
        match ts_key {
            TsKey::Current => self.current = show,
            TsKey::Compare => self.compare = show,
            TsKey::Median => self.median = show,
        }
    }
}

/// Chart-specific state: what is selected, shown, and pointed at.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphState {
    pub show: ShowSeries,
    pub current_variable_id: Option<String>,
    pub current_method_id: Option<i64>,
    pub current_period: Period,
    pub custom_time_range: Option<TimeRange>,
    pub cursor: CursorSetting,
    pub brush: Option<BrushOffset>,
    pub play_id: Option<PlayId>,
    pub loading_keys: Vec<String>,
}

impl Default for GraphState {
    fn default() -> Self {
        GraphState {
            show: ShowSeries::default(),
            current_variable_id: None,
            current_method_id: None,
            current_period: Period::P7D,
            custom_time_range: None,
            cursor: CursorSetting::Latest,
            brush: None,
            play_id: None,
            loading_keys: Vec::new(),
        }
    }
}

/// Layout state that affects derivation, kept separate from graph state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    /// Width of the browser window or host surface, in pixels.
    pub window_width: u32,
    /// Width of the chart itself, in pixels.
    pub width: u32,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            window_width: 1024,
            width: 800,
        }
    }
}

/// The whole state tree. Series data is shared behind an [`Arc`] so the
/// selector graph can detect replacement by pointer identity.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub series_data: Arc<TimeSeriesData>,
    pub graph: GraphState,
    pub ui: UiState,
}
