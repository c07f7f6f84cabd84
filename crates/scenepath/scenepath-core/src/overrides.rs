//! Implicit keyframes: timestamped property patches layered over a baseline snapshot.
//!
//! A change point takes effect at its time and stays in effect until a later change point
//! overrides the same key. Resolution is a step function over normalized scene time; there
//! is no interpolation between change points.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Kind-specific style value (stroke colour, font size, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum StyleValue {
    Number(f32),
    /// Packed 0xRRGGBB.
    Color(u32),
    Text(String),
    Bool(bool),
}

pub type StyleMap = HashMap<String, StyleValue>;

/// Effective visual properties of an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperties {
    pub scale: [f32; 2],
    /// Radians.
    pub rotation: f32,
    pub alpha: f32,
    #[serde(default)]
    pub style: StyleMap,
}

impl Default for ObjectProperties {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0],
            rotation: 0.0,
            alpha: 1.0,
            style: StyleMap::new(),
        }
    }
}

/// Partial set of properties. Absent fields leave the underlying value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub style: StyleMap,
}

impl PropertyPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Some([sx, sy]);
        self
    }

    pub fn rotation(mut self, radians: f32) -> Self {
        self.rotation = Some(radians);
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn style(mut self, key: &str, value: StyleValue) -> Self {
        self.style.insert(key.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scale.is_none() && self.rotation.is_none() && self.alpha.is_none() && self.style.is_empty()
    }

    /// Fold `other` into this patch; keys present in `other` win.
    pub fn merge_from(&mut self, other: &PropertyPatch) {
        if other.scale.is_some() {
            self.scale = other.scale;
        }
        if other.rotation.is_some() {
            self.rotation = other.rotation;
        }
        if other.alpha.is_some() {
            self.alpha = other.alpha;
        }
        for (k, v) in &other.style {
            self.style.insert(k.clone(), v.clone());
        }
    }

    pub fn apply_to(&self, props: &mut ObjectProperties) {
        if let Some(s) = self.scale {
            props.scale = s;
        }
        if let Some(r) = self.rotation {
            props.rotation = r;
        }
        if let Some(a) = self.alpha {
            props.alpha = a;
        }
        for (k, v) in &self.style {
            props.style.insert(k.clone(), v.clone());
        }
    }
}

/// Apply `patches` in order over `baseline`.
pub fn merge<'a, I>(baseline: &ObjectProperties, patches: I) -> ObjectProperties
where
    I: IntoIterator<Item = &'a PropertyPatch>,
{
    let mut out = baseline.clone();
    for p in patches {
        p.apply_to(&mut out);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    /// Normalized scene time in [0,1].
    pub time: f32,
    pub patch: PropertyPatch,
}

/// Per-object override data: baseline snapshot plus time-sorted change points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideTrack {
    original: ObjectProperties,
    change_points: Vec<ChangePoint>,
}

impl OverrideTrack {
    pub fn new(original: ObjectProperties) -> Self {
        Self {
            original,
            change_points: Vec::new(),
        }
    }

    pub fn original(&self) -> &ObjectProperties {
        &self.original
    }

    pub fn change_points(&self) -> &[ChangePoint] {
        &self.change_points
    }

    fn find_within(&self, time: f32, epsilon: f32) -> Option<usize> {
        self.change_points
            .iter()
            .position(|cp| (cp.time - time).abs() <= epsilon)
    }

    pub fn has_change_point_at(&self, time: f32, epsilon: f32) -> bool {
        self.find_within(time.clamp(0.0, 1.0), epsilon).is_some()
    }

    /// Add `patch` at `time`, merging into an existing point within `epsilon`.
    /// Returns the effective properties at `time`. A NaN time leaves the track untouched.
    pub fn set_change_point_at_time(
        &mut self,
        time: f32,
        patch: PropertyPatch,
        epsilon: f32,
    ) -> ObjectProperties {
        if time.is_nan() {
            return self.resolve(time);
        }
        let time = time.clamp(0.0, 1.0);
        match self.find_within(time, epsilon) {
            Some(i) => self.change_points[i].patch.merge_from(&patch),
            None => {
                let at = self.change_points.partition_point(|cp| cp.time < time);
                self.change_points.insert(at, ChangePoint { time, patch });
            }
        }
        self.resolve(time)
    }

    /// Remove every change point within `epsilon` of `time`.
    /// Returns the effective properties at `time` afterwards. A NaN time removes nothing.
    pub fn remove_change_point_at_time(&mut self, time: f32, epsilon: f32) -> ObjectProperties {
        if time.is_nan() {
            return self.resolve(time);
        }
        let time = time.clamp(0.0, 1.0);
        self.change_points
            .retain(|cp| (cp.time - time).abs() > epsilon);
        self.resolve(time)
    }

    /// Effective properties at normalized `time`: baseline plus every change point at or
    /// before `time`, in order.
    pub fn resolve(&self, time: f32) -> ObjectProperties {
        let count = self.change_points.partition_point(|cp| cp.time <= time);
        merge(
            &self.original,
            self.change_points[..count].iter().map(|cp| &cp.patch),
        )
    }
}
