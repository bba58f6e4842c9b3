//! Explicit state container for hydrograph charts.
//!
//! [`store::Store`] holds the full application state and mutates it only
//! through dispatched [`store::Action`]s. Everything drawn on screen is
//! derived from that state through the memoized selector graph in
//! [`selectors`], and [`playback::Playback`] drives the cursor forward in
//! time on a background timer.

pub mod playback;
pub mod selectors;
pub mod state;
pub mod store;
