//! scenepath-core (host-agnostic)
//!
//! Scene timeline and path-animation engine for the canvas course builder. A scene owns
//! normalized playback time, the recorded motion paths of its objects and their
//! property-override tracks; the host scene graph is reached only through
//! [`host::SceneHost`].
//!
//! Typical flow:
//! - [`AnimationContext::init`] once, then `create_scene` per authoring region
//! - [`PathRecorder`] turns drags into [`AnimationPath`]s
//! - [`ModifyTool`] records implicit keyframes
//! - the frame clock calls [`AnimationContext::tick`]; the UI calls play/pause/seek

pub mod config;
pub mod context;
pub mod easing;
pub mod errors;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod overrides;
pub mod path;
pub mod resample;
pub mod scene;
pub mod timeline;
pub mod tools;

// Re-exports for adapters
pub use config::{AnchorTiers, Config};
pub use context::{AnimationContext, UpdateMessage};
pub use easing::Easing;
pub use errors::{ConfigError, HostError, PathError};
pub use geometry::{Point, Rect};
pub use host::{ensure_object_id, CoordSpace, HostObject, NodeKey, ObjectKind, SceneHost};
pub use ids::{ObjectId, SceneId};
pub use interp::{evaluate_segment, select_segment};
pub use outputs::{Change, Outputs, SceneEvent, SceneFrame};
pub use overrides::{
    merge, ChangePoint, ObjectProperties, OverrideTrack, PropertyPatch, StyleMap, StyleValue,
};
pub use path::{AnimationPath, CurveMode, HandlePair, PathRegistry};
pub use resample::{anchor_count_for_duration, resample};
pub use scene::{PlaybackState, Scene};
pub use timeline::local_progress;
pub use tools::{ModifyTool, PathRecorder};
