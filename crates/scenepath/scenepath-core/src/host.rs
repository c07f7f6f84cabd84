//! Host seam: the rendering / scene-graph side the engine reads from and writes to.
//!
//! The host is consulted synchronously during ticks and gestures. Implementations for the
//! browser live in the wasm adapter; tests use an in-memory mock.

use serde::{Deserialize, Serialize};

use crate::errors::HostError;
use crate::geometry::{Point, Rect};
use crate::ids::{ObjectId, SceneId};
use crate::overrides::{ObjectProperties, StyleMap};

/// Host-side handle of a scene-graph node. Opaque to the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub u64);

/// Named coordinate spaces the host can convert between.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", content = "object", rename_all = "camelCase")]
pub enum CoordSpace {
    /// Shared drawing-layer space. Scene bounds and path anchors live here.
    Layer,
    /// Local space of the given object's parent container.
    ParentOf(ObjectId),
}

/// What a trackable object is, plus the metadata the engine needs about it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ObjectKind {
    Shape { shape: String },
    Stroke { tool: String },
    Text { font_family: String },
    Image { source: String },
    Table { rows: u32, columns: u32 },
    Group { children: u32 },
}

impl ObjectKind {
    /// Style fields captured in the modify tool's baseline snapshot for this kind.
    pub fn style_keys(&self) -> &'static [&'static str] {
        match self {
            ObjectKind::Shape { .. } => &["fill", "stroke", "strokeWidth"],
            ObjectKind::Stroke { .. } => &["stroke", "strokeWidth"],
            ObjectKind::Text { .. } => &["color", "fontSize", "fontWeight"],
            ObjectKind::Table { .. } => &["borderColor", "cellFill"],
            ObjectKind::Image { .. } | ObjectKind::Group { .. } => &[],
        }
    }
}

/// Snapshot of a host object as seen by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostObject {
    pub node: NodeKey,
    #[serde(default)]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub properties: ObjectProperties,
}

impl HostObject {
    /// Current properties restricted to the style fields relevant for this kind.
    pub fn baseline_snapshot(&self) -> ObjectProperties {
        let keys = self.kind.style_keys();
        let style: StyleMap = self
            .properties
            .style
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ObjectProperties {
            style,
            ..self.properties.clone()
        }
    }
}

/// Everything the engine needs from the scene graph.
///
/// Positions written through [`SceneHost::set_local_position`] are object centers
/// expressed in the object's parent space.
pub trait SceneHost {
    /// Topmost object under a drawing-layer point.
    fn object_at(&mut self, point: Point) -> Option<HostObject>;

    fn object(&mut self, id: &ObjectId) -> Option<HostObject>;

    /// Remember `id` for the node so later lookups return it.
    fn assign_object_id(&mut self, node: NodeKey, id: &ObjectId);

    /// Bounding-box center in drawing-layer space.
    fn object_center(&mut self, id: &ObjectId) -> Option<Point>;

    fn set_local_position(&mut self, id: &ObjectId, position: Point) -> Result<(), HostError>;

    /// Move an object by a drawing-layer delta.
    fn translate_object(&mut self, id: &ObjectId, dx: f32, dy: f32) -> Result<(), HostError>;

    fn convert_point(
        &mut self,
        point: Point,
        from: &CoordSpace,
        to: &CoordSpace,
    ) -> Result<Point, HostError>;

    /// Objects whose bounding-box center lies inside `rect` (drawing-layer space).
    fn objects_within(&mut self, rect: Rect) -> Vec<ObjectId>;

    /// Current drawing-layer origin of a scene's frame, if the host tracks it.
    fn scene_origin(&mut self, _scene: SceneId) -> Option<Point> {
        None
    }

    fn apply_properties(&mut self, id: &ObjectId, props: &ObjectProperties)
        -> Result<(), HostError>;
}

/// Return the object's id, minting and assigning one first if it has none.
pub fn ensure_object_id(host: &mut dyn SceneHost, object: &HostObject) -> ObjectId {
    match &object.id {
        Some(id) => id.clone(),
        None => {
            let id = ObjectId::generate();
            log::debug!("assigning object id {id} to node {:?}", object.node);
            host.assign_object_id(object.node, &id);
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::StyleValue;

    #[test]
    fn snapshot_keeps_only_kind_style_fields() {
        let mut props = ObjectProperties::default();
        props.style.insert("fontSize".into(), StyleValue::Number(14.0));
        props.style.insert("fill".into(), StyleValue::Color(0x00ff00));
        props.alpha = 0.8;
        let text = HostObject {
            node: NodeKey(1),
            id: None,
            kind: ObjectKind::Text {
                font_family: "Inter".into(),
            },
            properties: props.clone(),
        };
        let snap = text.baseline_snapshot();
        assert_eq!(snap.alpha, 0.8);
        assert!(snap.style.contains_key("fontSize"));
        assert!(!snap.style.contains_key("fill"));

        let image = HostObject {
            kind: ObjectKind::Image {
                source: "a.png".into(),
            },
            ..text
        };
        assert!(image.baseline_snapshot().style.is_empty());
    }

    #[test]
    fn host_object_json_is_flat_tagged() {
        let obj: HostObject = serde_json::from_str(
            r#"{ "node": 7, "kind": "table", "rows": 2, "columns": 3 }"#,
        )
        .unwrap();
        assert_eq!(obj.node, NodeKey(7));
        assert_eq!(obj.kind, ObjectKind::Table { rows: 2, columns: 3 });
        assert_eq!(obj.properties, ObjectProperties::default());
    }
}
