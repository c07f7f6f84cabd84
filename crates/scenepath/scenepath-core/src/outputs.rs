//! Output contracts of one update.
//!
//! Outputs record what the engine wrote to the host this update (positions, resolved
//! properties), discrete playback events, and one frame summary per scene for the
//! progress control.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::ids::{ObjectId, SceneId};
use crate::overrides::ObjectProperties;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Change {
    /// Object center written in its parent space.
    Position {
        scene: SceneId,
        object: ObjectId,
        position: Point,
    },
    Properties {
        scene: SceneId,
        object: ObjectId,
        properties: ObjectProperties,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum SceneEvent {
    PlaybackStarted { scene: SceneId },
    PlaybackPaused { scene: SceneId },
    /// Non-looping playback reached t = 1.
    PlaybackEnded { scene: SceneId },
    /// Looping playback wrapped past t = 1.
    Looped { scene: SceneId },
    TimeChanged { scene: SceneId, old_time: f32, new_time: f32 },
    SceneMoved { scene: SceneId, dx: f32, dy: f32 },
}

/// Per-scene state after an update, used to redraw the progress control.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub scene: SceneId,
    pub time: f32,
    pub playing: bool,
    pub looping: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<SceneEvent>,
    #[serde(default)]
    pub frames: Vec<SceneFrame>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Record a scene summary, replacing an earlier one for the same scene.
    pub fn push_frame(&mut self, frame: SceneFrame) {
        if let Some(existing) = self.frames.iter_mut().find(|f| f.scene == frame.scene) {
            *existing = frame;
        } else {
            self.frames.push(frame);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty() && self.frames.is_empty()
    }

    /// Last position written for `object` this update.
    pub fn position_of(&self, object: &ObjectId) -> Option<Point> {
        self.changes.iter().rev().find_map(|c| match c {
            Change::Position {
                object: o,
                position,
                ..
            } if o == object => Some(*position),
            _ => None,
        })
    }

    /// Last properties written for `object` this update.
    pub fn properties_of(&self, object: &ObjectId) -> Option<&ObjectProperties> {
        self.changes.iter().rev().find_map(|c| match c {
            Change::Properties {
                object: o,
                properties,
                ..
            } if o == object => Some(properties),
            _ => None,
        })
    }
}
