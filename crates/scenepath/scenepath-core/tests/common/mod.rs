#![allow(dead_code)]
//! In-memory scene graph used by the integration tests.

use std::collections::HashMap;

use scenepath_core::{
    CoordSpace, HostError, HostObject, NodeKey, ObjectId, ObjectKind, ObjectProperties, Point,
    Rect, SceneHost, SceneId,
};

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn approx_pt(a: Point, b: Point, eps: f32) {
    assert!(
        (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps,
        "left={a:?} right={b:?} eps={eps}"
    );
}

#[derive(Debug, Clone)]
pub struct MockObject {
    pub node: NodeKey,
    pub id: Option<ObjectId>,
    pub kind: ObjectKind,
    pub center: Point,
    pub half_size: f32,
    /// Drawing-layer position of the parent container's origin.
    pub parent_offset: Point,
    pub properties: ObjectProperties,
    pub detached: bool,
}

#[derive(Debug, Default)]
pub struct MockHost {
    pub objects: Vec<MockObject>,
    pub scene_origins: HashMap<SceneId, Point>,
    pub applied: Vec<(ObjectId, ObjectProperties)>,
    pub positions: Vec<(ObjectId, Point)>,
    next_node: u64,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymous shape centered at `center`.
    pub fn add(&mut self, center: Point) -> NodeKey {
        self.add_kind(
            ObjectKind::Shape {
                shape: "rect".into(),
            },
            center,
            ObjectProperties::default(),
        )
    }

    pub fn add_kind(
        &mut self,
        kind: ObjectKind,
        center: Point,
        properties: ObjectProperties,
    ) -> NodeKey {
        let node = NodeKey(self.next_node);
        self.next_node += 1;
        self.objects.push(MockObject {
            node,
            id: None,
            kind,
            center,
            half_size: 5.0,
            parent_offset: Point::ZERO,
            properties,
            detached: false,
        });
        node
    }

    /// Shape that already carries an id.
    pub fn add_with_id(&mut self, id: &str, center: Point) -> ObjectId {
        let node = self.add(center);
        let id = ObjectId::from(id);
        self.assign_object_id(node, &id);
        id
    }

    fn find(&self, id: &ObjectId) -> Option<&MockObject> {
        self.objects.iter().find(|o| o.id.as_ref() == Some(id))
    }

    fn find_mut(&mut self, id: &ObjectId) -> Option<&mut MockObject> {
        self.objects.iter_mut().find(|o| o.id.as_ref() == Some(id))
    }

    pub fn center(&self, id: &ObjectId) -> Point {
        self.find(id).map(|o| o.center).expect("known object")
    }

    pub fn id_of(&self, node: NodeKey) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|o| o.node == node)
            .and_then(|o| o.id.clone())
    }

    pub fn set_parent_offset(&mut self, id: &ObjectId, offset: Point) {
        if let Some(o) = self.find_mut(id) {
            o.parent_offset = offset;
        }
    }

    pub fn detach(&mut self, id: &ObjectId) {
        if let Some(o) = self.find_mut(id) {
            o.detached = true;
        }
    }

    pub fn set_scene_origin(&mut self, scene: SceneId, origin: Point) {
        self.scene_origins.insert(scene, origin);
    }

    fn snapshot(o: &MockObject) -> HostObject {
        HostObject {
            node: o.node,
            id: o.id.clone(),
            kind: o.kind.clone(),
            properties: o.properties.clone(),
        }
    }
}

impl SceneHost for MockHost {
    fn object_at(&mut self, point: Point) -> Option<HostObject> {
        self.objects
            .iter()
            .rev()
            .find(|o| {
                (point.x - o.center.x).abs() <= o.half_size
                    && (point.y - o.center.y).abs() <= o.half_size
            })
            .map(Self::snapshot)
    }

    fn object(&mut self, id: &ObjectId) -> Option<HostObject> {
        self.find(id).map(Self::snapshot)
    }

    fn assign_object_id(&mut self, node: NodeKey, id: &ObjectId) {
        if let Some(o) = self.objects.iter_mut().find(|o| o.node == node) {
            o.id = Some(id.clone());
        }
    }

    fn object_center(&mut self, id: &ObjectId) -> Option<Point> {
        self.find(id).map(|o| o.center)
    }

    fn set_local_position(&mut self, id: &ObjectId, position: Point) -> Result<(), HostError> {
        let o = self
            .find_mut(id)
            .ok_or_else(|| HostError::UnknownObject(id.clone()))?;
        if o.detached {
            return Err(HostError::Detached(id.clone()));
        }
        o.center = position + o.parent_offset;
        self.positions.push((id.clone(), position));
        Ok(())
    }

    fn translate_object(&mut self, id: &ObjectId, dx: f32, dy: f32) -> Result<(), HostError> {
        let o = self
            .find_mut(id)
            .ok_or_else(|| HostError::UnknownObject(id.clone()))?;
        o.center = o.center.translated(dx, dy);
        Ok(())
    }

    fn convert_point(
        &mut self,
        point: Point,
        from: &CoordSpace,
        to: &CoordSpace,
    ) -> Result<Point, HostError> {
        let offset_of = |host: &Self, space: &CoordSpace| -> Result<Point, HostError> {
            match space {
                CoordSpace::Layer => Ok(Point::ZERO),
                CoordSpace::ParentOf(id) => {
                    let o = host
                        .find(id)
                        .ok_or_else(|| HostError::UnknownObject(id.clone()))?;
                    if o.detached {
                        Err(HostError::Detached(id.clone()))
                    } else {
                        Ok(o.parent_offset)
                    }
                }
            }
        };
        let layer = point + offset_of(self, from)?;
        Ok(layer - offset_of(self, to)?)
    }

    fn objects_within(&mut self, rect: Rect) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| rect.contains(o.center))
            .filter_map(|o| o.id.clone())
            .collect()
    }

    fn scene_origin(&mut self, scene: SceneId) -> Option<Point> {
        self.scene_origins.get(&scene).copied()
    }

    fn apply_properties(
        &mut self,
        id: &ObjectId,
        props: &ObjectProperties,
    ) -> Result<(), HostError> {
        let o = self
            .find_mut(id)
            .ok_or_else(|| HostError::UnknownObject(id.clone()))?;
        if o.detached {
            return Err(HostError::Detached(id.clone()));
        }
        o.properties = props.clone();
        self.applied.push((id.clone(), props.clone()));
        Ok(())
    }
}
