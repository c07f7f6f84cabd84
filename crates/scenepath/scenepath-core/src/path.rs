//! Animation path data model and the per-scene path registry.
//!
//! A path is a list of scene-space anchors plus per-segment timing data:
//! - `segment_weights`: share of the path duration spent on each segment (normalized on use)
//! - `segment_easings`: optional per-segment easing, falling back to `easing`
//! - `curve_mode`/`handles`: straight segments or cubic Bezier segments
//!
//! Sampling maps normalized local progress in [0,1] onto one segment and evaluates it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::errors::PathError;
use crate::geometry::Point;
use crate::ids::ObjectId;
use crate::interp::{auto_handles, evaluate_segment, select_segment};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveMode {
    #[default]
    Polyline,
    Bezier,
}

/// Bezier handles for one segment: `out` leaves the segment start, `in` arrives at its end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandlePair {
    pub out: Point,
    #[serde(rename = "in")]
    pub r#in: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationPath {
    pub points: Vec<Point>,
    pub segment_weights: Vec<f32>,
    #[serde(default)]
    pub segment_easings: Option<Vec<Easing>>,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub curve_mode: CurveMode,
    #[serde(default)]
    pub handles: Vec<HandlePair>,
    pub duration_ms: f32,
}

impl AnimationPath {
    /// Polyline path with equal segment weights and linear easing.
    pub fn new(points: Vec<Point>, duration_ms: f32) -> Self {
        let segments = points.len().saturating_sub(1);
        let w = if segments > 0 {
            1.0 / segments as f32
        } else {
            0.0
        };
        Self {
            points,
            segment_weights: vec![w; segments],
            segment_easings: None,
            easing: Easing::Linear,
            curve_mode: CurveMode::Polyline,
            handles: Vec::new(),
            duration_ms,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_segment_weights(mut self, weights: Vec<f32>) -> Self {
        self.segment_weights = weights;
        self
    }

    pub fn with_segment_easings(mut self, easings: Vec<Easing>) -> Self {
        self.segment_easings = Some(easings);
        self
    }

    /// Switch to bezier mode with explicit handles.
    pub fn with_handles(mut self, handles: Vec<HandlePair>) -> Self {
        self.curve_mode = CurveMode::Bezier;
        self.handles = handles;
        self
    }

    /// Change the curve mode. Entering bezier mode without handles derives smooth ones.
    pub fn set_curve_mode(&mut self, mode: CurveMode) {
        self.curve_mode = mode;
        if mode == CurveMode::Bezier && self.handles.len() != self.segment_count() {
            self.handles = auto_handles(&self.points);
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Easing for segment `i`: its own entry if present, else the path easing.
    #[inline]
    pub fn segment_easing(&self, i: usize) -> Easing {
        self.segment_easings
            .as_ref()
            .and_then(|e| e.get(i).copied())
            .unwrap_or(self.easing)
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.points.len() < 2 {
            return Err(PathError::TooFewPoints(self.points.len()));
        }
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(PathError::InvalidDuration(self.duration_ms));
        }
        let segments = self.segment_count();
        if self.segment_weights.len() != segments {
            return Err(PathError::WeightCountMismatch {
                expected: segments,
                actual: self.segment_weights.len(),
            });
        }
        if let Some(easings) = &self.segment_easings {
            if easings.len() != segments {
                return Err(PathError::EasingCountMismatch {
                    expected: segments,
                    actual: easings.len(),
                });
            }
        }
        if self.curve_mode == CurveMode::Bezier && self.handles.len() != segments {
            return Err(PathError::HandleCountMismatch {
                expected: segments,
                actual: self.handles.len(),
            });
        }
        let mut total = 0.0f32;
        for (index, w) in self.segment_weights.iter().enumerate() {
            if !w.is_finite() || *w < 0.0 {
                return Err(PathError::InvalidWeight { index, value: *w });
            }
            total += *w;
        }
        if total <= 0.0 {
            return Err(PathError::ZeroTotalWeight);
        }
        Ok(())
    }

    /// Sample the path at normalized local progress. Returns None for paths with fewer
    /// than two anchors.
    pub fn point_at(&self, progress: f32) -> Option<Point> {
        if self.points.len() < 2 {
            return None;
        }
        let (i, local_t) = select_segment(&self.segment_weights, progress);
        let i = i.min(self.segment_count() - 1);
        let handles = match self.curve_mode {
            CurveMode::Bezier => self.handles.get(i),
            CurveMode::Polyline => None,
        };
        Some(evaluate_segment(
            self.curve_mode,
            self.points[i],
            self.points[i + 1],
            handles,
            local_t,
            self.segment_easing(i),
        ))
    }

    /// Shift anchors and handles.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for p in &mut self.points {
            *p = p.translated(dx, dy);
        }
        for h in &mut self.handles {
            h.out = h.out.translated(dx, dy);
            h.r#in = h.r#in.translated(dx, dy);
        }
    }
}

/// Paths owned by one scene, keyed by object. Iteration follows registration order.
#[derive(Clone, Debug, Default)]
pub struct PathRegistry {
    paths: IndexMap<ObjectId, AnimationPath>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the path for `object`, returning the replaced one.
    pub fn insert(&mut self, object: ObjectId, path: AnimationPath) -> Option<AnimationPath> {
        self.paths.insert(object, path)
    }

    pub fn get(&self, object: &ObjectId) -> Option<&AnimationPath> {
        self.paths.get(object)
    }

    pub fn get_mut(&mut self, object: &ObjectId) -> Option<&mut AnimationPath> {
        self.paths.get_mut(object)
    }

    pub fn remove(&mut self, object: &ObjectId) -> Option<AnimationPath> {
        self.paths.shift_remove(object)
    }

    pub fn contains(&self, object: &ObjectId) -> bool {
        self.paths.contains_key(object)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &AnimationPath)> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Shift every registered path.
    pub fn translate_all(&mut self, dx: f32, dy: f32) {
        for path in self.paths.values_mut() {
            path.translate(dx, dy);
        }
    }
}
