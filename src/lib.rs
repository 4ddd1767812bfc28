//! Layout engine for a zoomable Gantt timeline header.
//!
//! Task date ranges are padded, cut into tick cells whose widths follow a
//! per-scale drag-step density, grouped into header labels, and projected
//! back to pixel offsets for bars and drag previews. Everything in
//! [`model`] is pure; [`io`] loads task sets and scale overrides.

pub mod error;
pub mod io;
pub mod model;

pub use error::{Result, TimelineError};
