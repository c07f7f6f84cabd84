//! Identifiers for scenes and tracked objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SceneId(pub u32);

/// Stable identifier of a tracked object.
///
/// Objects on the drawing layer start out anonymous; an id is minted the first time the
/// engine needs to key data by the object (path registration or first override) and is
/// handed back to the host through [`crate::host::SceneHost::assign_object_id`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic allocator for SceneId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_scene: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_scene(&mut self) -> SceneId {
        let id = SceneId(self.next_scene);
        self.next_scene = self.next_scene.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
