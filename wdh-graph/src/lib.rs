//! Chart-state derivation for hydrograph rendering.
//!
//! This crate turns ordered observation series into the plain data the
//! rendering layer consumes: padded Y-axis domains, "nice" tick sets,
//! classified line segments, nearest-point cursor resolution, and the
//! brush (zoom window) offset math. Everything here is pure and
//! synchronous; no function assumes a specific rendering technology.

pub mod brush;
pub mod cursor;
pub mod domain;
pub mod segments;
pub mod ticks;
