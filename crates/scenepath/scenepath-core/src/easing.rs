//! Closed-form cubic easing curves applied to segment-local time.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map progress in [0,1] through the curve. Input is clamped; both endpoints are exact.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for e in ALL {
            assert_eq!(e.apply(0.0), 0.0, "{e:?} at 0");
            assert_eq!(e.apply(1.0), 1.0, "{e:?} at 1");
        }
    }

    #[test]
    fn curve_shapes() {
        assert!((Easing::EaseIn.apply(0.5) - 0.125).abs() < 1e-6);
        assert!((Easing::EaseOut.apply(0.5) - 0.875).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.25) - 0.0625).abs() < 1e-6);
        assert!((Easing::Linear.apply(0.3) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::EaseOut.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseIn.apply(2.0), 1.0);
    }

    #[test]
    fn serde_names_are_camel_case() {
        let s = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(s, "\"easeInOut\"");
        let e: Easing = serde_json::from_str("\"easeIn\"").unwrap();
        assert_eq!(e, Easing::EaseIn);
    }
}
