//! Pure interpolation functions:
//! - lerp_f32 / lerp_point
//! - cubic_bezier_point (4 control points)
//! - select_segment (weighted segment lookup)
//! - evaluate_segment (easing, then lerp or bezier)
//! - auto_handles (Catmull-Rom derived bezier handles)

use crate::easing::Easing;
use crate::geometry::Point;
use crate::path::{CurveMode, HandlePair};

/// Linear interpolation of scalars. Exact at both endpoints.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn lerp_point(a: Point, b: Point, t: f32) -> Point {
    Point::new(lerp_f32(a.x, b.x, t), lerp_f32(a.y, b.y, t))
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

#[inline]
pub fn cubic_bezier_point(p0: Point, c0: Point, c1: Point, p1: Point, t: f32) -> Point {
    Point::new(
        cubic_bezier(p0.x, c0.x, c1.x, p1.x, t),
        cubic_bezier(p0.y, c0.y, c1.y, p1.y, t),
    )
}

#[inline]
fn usable_weight(w: f32) -> f32 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

/// Find the segment containing normalized `progress` and the fractional position inside it.
///
/// Weights are normalized by their sum; zero-weight segments are never selected. Boundary
/// law: progress 0 maps to `(0, 0.0)` and progress 1 to `(last, 1.0)`. If no weight is
/// usable the segments are treated as equally weighted.
pub fn select_segment(weights: &[f32], progress: f32) -> (usize, f32) {
    let n = weights.len();
    if n == 0 {
        return (0, 0.0);
    }
    let last = n - 1;
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    if p <= 0.0 {
        return (0, 0.0);
    }
    if p >= 1.0 {
        return (last, 1.0);
    }

    let total: f32 = weights.iter().copied().map(usable_weight).sum();
    if total <= 0.0 {
        let scaled = p * n as f32;
        let idx = (scaled.floor() as usize).min(last);
        return (idx, (scaled - idx as f32).clamp(0.0, 1.0));
    }

    let mut acc = 0.0f32;
    for (i, w) in weights.iter().enumerate() {
        let w = usable_weight(*w) / total;
        if w > 0.0 && (p < acc + w || i == last) {
            return (i, ((p - acc) / w).clamp(0.0, 1.0));
        }
        acc += w;
    }
    // Only reachable when trailing segments carry zero weight and rounding left p past acc.
    (last, 1.0)
}

/// Evaluate one segment at `local_t` after applying `easing`.
///
/// Bezier mode without a handle pair degrades to a straight line.
pub fn evaluate_segment(
    mode: CurveMode,
    p0: Point,
    p1: Point,
    handles: Option<&HandlePair>,
    local_t: f32,
    easing: Easing,
) -> Point {
    let e = easing.apply(local_t);
    match (mode, handles) {
        (CurveMode::Bezier, Some(h)) => cubic_bezier_point(p0, h.out, h.r#in, p1, e),
        _ => lerp_point(p0, p1, e),
    }
}

/// Build smooth handles for every segment of a polyline (tangent of neighbours / 6).
/// End segments reuse their own endpoint in place of the missing neighbour.
pub fn auto_handles(points: &[Point]) -> Vec<HandlePair> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(points.len() - 1);
    for i in 0..points.len() - 1 {
        let p0 = points[i];
        let p1 = points[i + 1];
        let prev = if i > 0 { points[i - 1] } else { p0 };
        let next = points.get(i + 2).copied().unwrap_or(p1);
        out.push(HandlePair {
            out: p0 + (p1 - prev) * (1.0 / 6.0),
            r#in: p1 - (next - p0) * (1.0 / 6.0),
        });
    }
    out
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
