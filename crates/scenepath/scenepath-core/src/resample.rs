//! Arc-length resampling of recorded drag trajectories.

use std::cmp::Ordering;

use crate::config::AnchorTiers;
use crate::geometry::Point;
use crate::interp::functions::lerp_point;

const LENGTH_EPSILON: f32 = 1e-5;

/// Resample `raw` to `desired_count` points spaced evenly by travelled distance.
///
/// - `desired_count` is floored at 2.
/// - Inputs that already have no more than `desired_count` points are returned unchanged.
/// - A polyline with zero total length collapses to `[first, last]`.
/// - The first and last output points are exactly the input extremes.
pub fn resample(raw: &[Point], desired_count: usize) -> Vec<Point> {
    let n = desired_count.max(2);
    if raw.len() <= n {
        return raw.to_vec();
    }

    let first = raw[0];
    let last = raw[raw.len() - 1];

    let mut cumulative = Vec::with_capacity(raw.len());
    let mut total = 0.0f32;
    cumulative.push(0.0);
    for pair in raw.windows(2) {
        total += pair[0].distance(pair[1]);
        cumulative.push(total);
    }
    if total <= LENGTH_EPSILON {
        return vec![first, last];
    }

    let mut out = Vec::with_capacity(n);
    out.push(first);
    for i in 1..n - 1 {
        let target = total * i as f32 / (n - 1) as f32;
        let idx = match cumulative
            .binary_search_by(|len| len.partial_cmp(&target).unwrap_or(Ordering::Less))
        {
            Ok(ix) => ix,
            Err(ix) => ix,
        };
        let idx = idx.clamp(1, raw.len() - 1);
        let seg_start = cumulative[idx - 1];
        let seg_len = cumulative[idx] - seg_start;
        let t = if seg_len <= LENGTH_EPSILON {
            0.0
        } else {
            ((target - seg_start) / seg_len).clamp(0.0, 1.0)
        };
        out.push(lerp_point(raw[idx - 1], raw[idx], t));
    }
    out.push(last);
    out
}

/// Anchor budget for a recorded path, chosen from the animation duration.
///
/// Short animations get a sparse trajectory; longer ones tolerate more anchors.
pub fn anchor_count_for_duration(duration_ms: f32, tiers: &AnchorTiers) -> usize {
    let count = if duration_ms <= tiers.short_max_ms {
        tiers.short
    } else if duration_ms <= tiers.medium_max_ms {
        tiers.medium
    } else {
        tiers.long
    };
    count.max(2)
}
