//! Time math shared by the scene timeline.

/// Floating modulo with a result in `[0, b)` for positive `b`.
pub(crate) fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Map global normalized scene time into a path's local progress.
///
/// `local = t * (baseline_cycle_ms / path_duration_ms)`; looping wraps into [0,1] (an
/// exact positive multiple of 1 lands on 1 so the final anchor is reachable), otherwise
/// the result is clamped.
pub fn local_progress(t: f32, baseline_cycle_ms: f32, path_duration_ms: f32, looping: bool) -> f32 {
    if path_duration_ms <= 0.0 || !path_duration_ms.is_finite() {
        return 1.0;
    }
    let raw = t * (baseline_cycle_ms / path_duration_ms);
    if !raw.is_finite() {
        return 0.0;
    }
    if looping {
        let m = fmod(raw, 1.0);
        if m == 0.0 && raw > 0.0 {
            1.0
        } else {
            m
        }
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Advance normalized time by `delta_ms` of a `cycle_ms` cycle.
///
/// Returns the new time and whether the end was reached. With `looping` the time wraps
/// modulo 1; otherwise it is clamped to 1.
pub fn advance(t: f32, delta_ms: f32, cycle_ms: f32, looping: bool) -> (f32, bool) {
    if cycle_ms <= 0.0 || !delta_ms.is_finite() {
        return (t, false);
    }
    let next = t + delta_ms.max(0.0) / cycle_ms;
    if next < 1.0 {
        return (next, false);
    }
    if looping {
        (fmod(next, 1.0), true)
    } else {
        (1.0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "left={a} right={b}");
    }

    #[test]
    fn fmod_is_non_negative() {
        approx(fmod(-0.25, 1.0), 0.75);
        approx(fmod(2.5, 1.0), 0.5);
        assert_eq!(fmod(1.0, 0.0), 0.0);
    }

    #[test]
    fn local_progress_equal_durations_is_identity() {
        approx(local_progress(0.4, 3000.0, 3000.0, false), 0.4);
        approx(local_progress(0.4, 3000.0, 3000.0, true), 0.4);
    }

    #[test]
    fn local_progress_scales_by_baseline() {
        // Baseline 5000 ms, path 2500 ms: the path runs twice per cycle.
        approx(local_progress(0.25, 5000.0, 2500.0, false), 0.5);
        approx(local_progress(0.75, 5000.0, 2500.0, false), 1.0);
        approx(local_progress(0.75, 5000.0, 2500.0, true), 0.5);
        approx(local_progress(0.5, 5000.0, 2500.0, true), 1.0);
        approx(local_progress(1.0, 5000.0, 5000.0, true), 1.0);
        approx(local_progress(0.0, 5000.0, 5000.0, true), 0.0);
    }

    #[test]
    fn advance_wraps_or_clamps() {
        let (t, ended) = advance(0.9, 200.0, 1000.0, true);
        assert!(ended);
        approx(t, 0.1);
        let (t, ended) = advance(0.9, 200.0, 1000.0, false);
        assert!(ended);
        assert_eq!(t, 1.0);
        let (t, ended) = advance(0.1, 100.0, 1000.0, false);
        assert!(!ended);
        approx(t, 0.2);
    }
}
