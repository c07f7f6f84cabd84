//! Interpolation helpers for path evaluation.
//!
//! Segment selection walks normalized segment weights; segment evaluation eases the
//! segment-local time first and then blends the anchors either linearly or along a cubic
//! Bezier defined by the segment's handle pair.

pub mod functions;

pub use functions::{auto_handles, evaluate_segment, polyline_length, select_segment};
