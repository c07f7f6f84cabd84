//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::errors::ConfigError;

/// Configuration for timing, sampling density and override matching.
///
/// Every field has a default, so hosts can pass a partial JSON object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Visual baseline cycle used to advance normalized time, in ms.
    /// `None` uses each scene's own duration.
    pub baseline_cycle_ms: Option<f32>,
    /// Duration given to newly created scenes, in ms.
    pub default_scene_duration_ms: f32,
    /// Minimum pointer travel (drawing-layer units) between two raw recording samples.
    pub min_sample_distance: f32,
    /// Two change points closer than this in normalized time are the same point.
    pub change_point_epsilon: f32,
    /// Anchor counts per duration tier for recorded paths.
    pub anchor_tiers: AnchorTiers,
    /// Easing assigned to freshly recorded paths.
    pub default_easing: Easing,
    /// Whether new scenes loop.
    pub default_loop: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline_cycle_ms: None,
            default_scene_duration_ms: 3000.0,
            min_sample_distance: 4.0,
            change_point_epsilon: 1e-3,
            anchor_tiers: AnchorTiers::default(),
            default_easing: Easing::Linear,
            default_loop: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnchorTiers {
    pub short_max_ms: f32,
    pub medium_max_ms: f32,
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl Default for AnchorTiers {
    fn default() -> Self {
        Self {
            short_max_ms: 3000.0,
            medium_max_ms: 5000.0,
            short: 4,
            medium: 6,
            long: 8,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(b) = self.baseline_cycle_ms {
            if !b.is_finite() || b <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "baseline_cycle_ms must be positive, got {b}"
                )));
            }
        }
        if !self.default_scene_duration_ms.is_finite() || self.default_scene_duration_ms <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_scene_duration_ms must be positive, got {}",
                self.default_scene_duration_ms
            )));
        }
        if !self.min_sample_distance.is_finite() || self.min_sample_distance < 0.0 {
            return Err(ConfigError::Invalid(
                "min_sample_distance must be >= 0".into(),
            ));
        }
        if !self.change_point_epsilon.is_finite() || self.change_point_epsilon < 0.0 {
            return Err(ConfigError::Invalid(
                "change_point_epsilon must be >= 0".into(),
            ));
        }
        if self.anchor_tiers.short_max_ms > self.anchor_tiers.medium_max_ms {
            return Err(ConfigError::Invalid(
                "anchor_tiers.short_max_ms must not exceed medium_max_ms".into(),
            ));
        }
        Ok(())
    }
}
