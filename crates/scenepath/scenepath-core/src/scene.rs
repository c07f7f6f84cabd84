//! Scene timeline: normalized playback time, per-frame path evaluation and property
//! overrides for every object tracked by one authoring scene.
//!
//! State machine:
//! `Stopped(t=0) -> Playing -> {Paused, Finished(t=1)}`, with `Scrubbing` as a transient
//! state that forces playback to pause while the user drags the progress control.
//!
//! Per-object failures (invalid path, host conversion error) are logged and skipped so a
//! single bad object never aborts the frame for the others.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{HostError, PathError};
use crate::geometry::{Point, Rect};
use crate::host::{CoordSpace, SceneHost};
use crate::ids::{ObjectId, SceneId};
use crate::outputs::{Change, Outputs, SceneEvent, SceneFrame};
use crate::overrides::{ObjectProperties, OverrideTrack, PropertyPatch};
use crate::path::{AnimationPath, CurveMode, PathRegistry};
use crate::timeline::{advance, local_progress};

/// Movement below this (drawing-layer units) is not treated as a scene relocation.
const MOVE_EPSILON: f32 = 1e-4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    Finished,
    Scrubbing,
}

#[derive(Debug, Clone)]
pub struct Scene {
    id: SceneId,
    bounds: Rect,
    time: f32,
    looping: bool,
    playing: bool,
    scrubbing: bool,
    duration_ms: f32,
    baseline_cycle_ms: Option<f32>,
    change_point_epsilon: f32,
    paths: PathRegistry,
    overrides: IndexMap<ObjectId, OverrideTrack>,
}

impl Scene {
    pub fn new(id: SceneId, bounds: Rect, cfg: &Config) -> Self {
        Self {
            id,
            bounds,
            time: 0.0,
            looping: cfg.default_loop,
            playing: false,
            scrubbing: false,
            duration_ms: cfg.default_scene_duration_ms,
            baseline_cycle_ms: cfg.baseline_cycle_ms,
            change_point_epsilon: cfg.change_point_epsilon,
            paths: PathRegistry::new(),
            overrides: IndexMap::new(),
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Normalized playback time in [0,1].
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Set the scene duration used for new recordings and (by default) the baseline cycle.
    /// Non-positive or non-finite values are ignored.
    pub fn set_duration_ms(&mut self, ms: f32) {
        if ms.is_finite() && ms > 0.0 {
            self.duration_ms = ms;
        }
    }

    /// Cycle length that one unit of normalized time represents.
    pub fn baseline_cycle_ms(&self) -> f32 {
        self.baseline_cycle_ms.unwrap_or(self.duration_ms)
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    pub fn state(&self) -> PlaybackState {
        if self.scrubbing {
            PlaybackState::Scrubbing
        } else if self.playing {
            PlaybackState::Playing
        } else if self.time >= 1.0 {
            PlaybackState::Finished
        } else if self.time <= 0.0 {
            PlaybackState::Stopped
        } else {
            PlaybackState::Paused
        }
    }

    pub fn frame(&self) -> SceneFrame {
        SceneFrame {
            scene: self.id,
            time: self.time,
            playing: self.playing,
            looping: self.looping,
        }
    }

    // --- path registry -------------------------------------------------------------

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    pub fn path(&self, object: &ObjectId) -> Option<&AnimationPath> {
        self.paths.get(object)
    }

    /// Register (or replace) the path driving `object`.
    pub fn register_path(
        &mut self,
        object: ObjectId,
        path: AnimationPath,
    ) -> Result<Option<AnimationPath>, PathError> {
        path.validate()?;
        debug!(
            "scene {:?}: registering {}-point path for {object}",
            self.id,
            path.points.len()
        );
        Ok(self.paths.insert(object, path))
    }

    pub fn unregister_path(&mut self, object: &ObjectId) -> Option<AnimationPath> {
        self.paths.remove(object)
    }

    /// Returns false when `object` has no path.
    pub fn set_curve_mode(&mut self, object: &ObjectId, mode: CurveMode) -> bool {
        match self.paths.get_mut(object) {
            Some(path) => {
                path.set_curve_mode(mode);
                true
            }
            None => false,
        }
    }

    /// Scene-space point of `object`'s path at normalized scene time `t`.
    pub fn evaluate(&self, object: &ObjectId, t: f32) -> Option<Point> {
        let path = self.paths.get(object)?;
        if path.validate().is_err() {
            return None;
        }
        let local = local_progress(
            t.clamp(0.0, 1.0),
            self.baseline_cycle_ms(),
            path.duration_ms,
            self.looping,
        );
        path.point_at(local)
    }

    // --- override tracks -----------------------------------------------------------

    pub fn override_track(&self, object: &ObjectId) -> Option<&OverrideTrack> {
        self.overrides.get(object)
    }

    /// Track for `object`, created from `baseline` on first use.
    pub fn ensure_override_track(
        &mut self,
        object: ObjectId,
        baseline: impl FnOnce() -> ObjectProperties,
    ) -> &mut OverrideTrack {
        self.overrides
            .entry(object)
            .or_insert_with(|| OverrideTrack::new(baseline()))
    }

    pub fn remove_override_track(&mut self, object: &ObjectId) -> Option<OverrideTrack> {
        self.overrides.shift_remove(object)
    }

    /// Add a change point for an object that already has a track.
    /// Returns the effective properties at `time`.
    pub fn set_change_point_at_time(
        &mut self,
        object: &ObjectId,
        time: f32,
        patch: PropertyPatch,
    ) -> Option<ObjectProperties> {
        let eps = self.change_point_epsilon;
        self.overrides
            .get_mut(object)
            .map(|track| track.set_change_point_at_time(time, patch, eps))
    }

    pub fn remove_change_point_at_time(
        &mut self,
        object: &ObjectId,
        time: f32,
    ) -> Option<ObjectProperties> {
        let eps = self.change_point_epsilon;
        self.overrides
            .get_mut(object)
            .map(|track| track.remove_change_point_at_time(time, eps))
    }

    pub fn resolve_properties(&self, object: &ObjectId, time: f32) -> Option<ObjectProperties> {
        self.overrides.get(object).map(|track| track.resolve(time))
    }

    // --- playback ------------------------------------------------------------------

    /// Resume ticking. Finished non-looping playback restarts from 0.
    pub fn play(&mut self, out: &mut Outputs) {
        if self.playing {
            return;
        }
        if !self.looping && self.time >= 1.0 {
            self.time = 0.0;
        }
        self.scrubbing = false;
        self.playing = true;
        out.push_event(SceneEvent::PlaybackStarted { scene: self.id });
        out.push_frame(self.frame());
    }

    pub fn pause(&mut self, out: &mut Outputs) {
        if !self.playing {
            return;
        }
        self.playing = false;
        out.push_event(SceneEvent::PlaybackPaused { scene: self.id });
        out.push_frame(self.frame());
    }

    pub fn toggle_play(&mut self, out: &mut Outputs) {
        if self.playing {
            self.pause(out);
        } else {
            self.play(out);
        }
    }

    /// Advance time by one frame and re-apply every tracked object. No-op while paused.
    pub fn tick(&mut self, delta_ms: f32, host: &mut dyn SceneHost, out: &mut Outputs) {
        if !self.playing {
            return;
        }
        let (t, reached_end) = advance(self.time, delta_ms, self.baseline_cycle_ms(), self.looping);
        self.time = t;
        if reached_end {
            if self.looping {
                out.push_event(SceneEvent::Looped { scene: self.id });
            } else {
                self.playing = false;
                out.push_event(SceneEvent::PlaybackEnded { scene: self.id });
            }
        }
        self.apply(host, out);
    }

    /// Seek to normalized `t` (clamped) and re-apply immediately.
    pub fn set_time(&mut self, t: f32, host: &mut dyn SceneHost, out: &mut Outputs) {
        let new_time = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let old_time = self.time;
        self.time = new_time;
        if old_time != new_time {
            out.push_event(SceneEvent::TimeChanged {
                scene: self.id,
                old_time,
                new_time,
            });
        }
        self.apply(host, out);
    }

    /// Nudge time by a relative amount; clamped, never wraps.
    pub fn step(&mut self, delta: f32, host: &mut dyn SceneHost, out: &mut Outputs) {
        self.set_time(self.time + delta, host, out);
    }

    /// Enter scrubbing: playback is forced to pause until the scrub ends.
    pub fn begin_scrub(&mut self, out: &mut Outputs) {
        self.pause(out);
        self.scrubbing = true;
        out.push_frame(self.frame());
    }

    pub fn scrub_to(&mut self, t: f32, host: &mut dyn SceneHost, out: &mut Outputs) {
        if !self.scrubbing {
            self.begin_scrub(out);
        }
        self.set_time(t, host, out);
    }

    pub fn end_scrub(&mut self, out: &mut Outputs) {
        self.scrubbing = false;
        out.push_frame(self.frame());
    }

    // --- relocation ----------------------------------------------------------------

    /// Follow a scene move of `(dx, dy)`: shift bounds and every path, and carry along
    /// objects whose center lay inside the previous bounds.
    pub fn sync_scene_transform(
        &mut self,
        dx: f32,
        dy: f32,
        host: &mut dyn SceneHost,
        out: &mut Outputs,
    ) {
        if dx.abs() < MOVE_EPSILON && dy.abs() < MOVE_EPSILON {
            return;
        }
        let previous = self.bounds;
        self.bounds = previous.translated(dx, dy);
        self.paths.translate_all(dx, dy);
        for object in host.objects_within(previous) {
            if let Err(e) = host.translate_object(&object, dx, dy) {
                warn!("scene {:?}: could not carry {object} along: {e}", self.id);
            }
        }
        debug!("scene {:?} moved by ({dx}, {dy})", self.id);
        out.push_event(SceneEvent::SceneMoved {
            scene: self.id,
            dx,
            dy,
        });
    }

    /// Compare the host's view of the scene origin against `bounds` and sync any drift.
    pub fn sync_with_host(&mut self, host: &mut dyn SceneHost, out: &mut Outputs) {
        if let Some(origin) = host.scene_origin(self.id) {
            let delta = origin - self.bounds.origin();
            self.sync_scene_transform(delta.x, delta.y, host, out);
        }
    }

    // --- per-frame application ---------------------------------------------------------

    /// Write positions for every path-driven object, then the resolved overrides, then
    /// the frame summary.
    pub fn apply(&self, host: &mut dyn SceneHost, out: &mut Outputs) {
        for (object, path) in self.paths.iter() {
            if let Err(e) = path.validate() {
                debug!("scene {:?}: skipping path of {object}: {e}", self.id);
                continue;
            }
            let local = local_progress(
                self.time,
                self.baseline_cycle_ms(),
                path.duration_ms,
                self.looping,
            );
            let Some(point) = path.point_at(local) else {
                continue;
            };
            match place_object(host, object, point) {
                Ok(position) => out.push_change(Change::Position {
                    scene: self.id,
                    object: object.clone(),
                    position,
                }),
                Err(e) => warn!("scene {:?}: could not position {object}: {e}", self.id),
            }
        }

        for (object, track) in &self.overrides {
            if track.change_points().is_empty() {
                continue;
            }
            let properties = track.resolve(self.time);
            match host.apply_properties(object, &properties) {
                Ok(()) => out.push_change(Change::Properties {
                    scene: self.id,
                    object: object.clone(),
                    properties,
                }),
                Err(e) => warn!("scene {:?}: could not restyle {object}: {e}", self.id),
            }
        }

        out.push_frame(self.frame());
    }
}

/// Convert a scene-space point into the object's parent space and write it.
fn place_object(
    host: &mut dyn SceneHost,
    object: &ObjectId,
    point: Point,
) -> Result<Point, HostError> {
    let local = host.convert_point(
        point,
        &CoordSpace::Layer,
        &CoordSpace::ParentOf(object.clone()),
    )?;
    host.set_local_position(object, local)?;
    Ok(local)
}
