//! Pointer-driven authoring tools that feed the scene timeline.

pub mod modify;
pub mod record;

pub use modify::ModifyTool;
pub use record::PathRecorder;
