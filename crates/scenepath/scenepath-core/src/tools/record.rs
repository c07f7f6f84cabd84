//! Drag-to-animate recording: turns a pointer drag on an object into an animation path.
//!
//! The dragged object follows the pointer while its center is sampled into a raw buffer.
//! On release the buffer is arc-length resampled to the scene's anchor budget and
//! registered as the object's path, replacing any earlier recording.

use log::{debug, warn};

use crate::context::AnimationContext;
use crate::geometry::Point;
use crate::host::{ensure_object_id, SceneHost};
use crate::ids::{ObjectId, SceneId};
use crate::path::AnimationPath;
use crate::resample::{anchor_count_for_duration, resample};

#[derive(Debug, Clone)]
struct Gesture {
    scene: SceneId,
    object: ObjectId,
    last_pointer: Point,
    current: Point,
    raw: Vec<Point>,
    min_distance: f32,
}

#[derive(Debug, Default)]
pub struct PathRecorder {
    active: bool,
    gesture: Option<Gesture>,
    preview: Vec<Point>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_activate(&mut self) {
        self.active = true;
    }

    /// Deactivation discards any in-progress recording.
    pub fn on_deactivate(&mut self) {
        self.cancel();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_recording(&self) -> bool {
        self.gesture.is_some()
    }

    /// Path recorded so far (drawing-layer space), including the live object center.
    pub fn preview(&self) -> &[Point] {
        &self.preview
    }

    /// Start recording on the object and scene under `pointer`.
    /// Returns false (and records nothing) when either is missing.
    pub fn begin(
        &mut self,
        ctx: &AnimationContext,
        host: &mut dyn SceneHost,
        pointer: Point,
    ) -> bool {
        if !self.active {
            return false;
        }
        self.cancel();
        let Some(scene) = ctx.scene_at(pointer) else {
            debug!("record: no scene under {pointer:?}");
            return false;
        };
        let Some(object) = host.object_at(pointer) else {
            debug!("record: no object under {pointer:?}");
            return false;
        };
        let id = ensure_object_id(host, &object);
        let Some(center) = host.object_center(&id) else {
            return false;
        };
        self.gesture = Some(Gesture {
            scene,
            object: id,
            last_pointer: pointer,
            current: center,
            raw: vec![center],
            min_distance: ctx.config().min_sample_distance,
        });
        self.preview = vec![center];
        true
    }

    /// Move the object with the pointer and sample its new center.
    pub fn drag(&mut self, host: &mut dyn SceneHost, pointer: Point) {
        let Some(g) = self.gesture.as_mut() else {
            return;
        };
        let delta = pointer - g.last_pointer;
        g.last_pointer = pointer;
        if let Err(e) = host.translate_object(&g.object, delta.x, delta.y) {
            warn!("record: could not move {}: {e}", g.object);
            return;
        }
        let Some(center) = host.object_center(&g.object) else {
            return;
        };
        g.current = center;
        let far_enough = g
            .raw
            .last()
            .map_or(true, |last| last.distance(center) > g.min_distance);
        if far_enough {
            g.raw.push(center);
        }

        self.preview.clear();
        self.preview.extend_from_slice(&g.raw);
        if self.preview.last() != Some(&center) {
            self.preview.push(center);
        }
    }

    /// Finish the gesture and register the resampled path.
    /// Returns the animated object's id when a path was registered.
    pub fn end(
        &mut self,
        ctx: &mut AnimationContext,
        host: &mut dyn SceneHost,
    ) -> Option<ObjectId> {
        let gesture = self.gesture.take()?;
        self.preview.clear();

        let mut raw = gesture.raw;
        let last = host.object_center(&gesture.object).unwrap_or(gesture.current);
        // A lone start sample still needs its duplicate to form a path.
        if raw.len() < 2 || raw.last() != Some(&last) {
            raw.push(last);
        }
        if raw.len() < 2 {
            return None;
        }

        let tiers = ctx.config().anchor_tiers.clone();
        let easing = ctx.config().default_easing;
        let scene = ctx.scene_mut(gesture.scene)?;
        let duration = scene.duration_ms();
        let points = resample(&raw, anchor_count_for_duration(duration, &tiers));
        let path = AnimationPath::new(points, duration).with_easing(easing);

        match scene.register_path(gesture.object.clone(), path) {
            Ok(_) => Some(gesture.object),
            Err(e) => {
                warn!("record: discarding path for {}: {e}", gesture.object);
                None
            }
        }
    }

    /// Drop the in-progress gesture without committing anything.
    pub fn cancel(&mut self) {
        if self.gesture.take().is_some() {
            debug!("record: gesture cancelled");
        }
        self.preview.clear();
    }
}
