//! Object-modification tool: records property changes as implicit keyframes.

use log::warn;

use crate::context::AnimationContext;
use crate::geometry::Point;
use crate::host::{ensure_object_id, SceneHost};
use crate::ids::{ObjectId, SceneId};
use crate::overrides::{ObjectProperties, PropertyPatch};

#[derive(Debug, Default)]
pub struct ModifyTool {
    active: bool,
    selection: Option<(SceneId, ObjectId)>,
}

impl ModifyTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_activate(&mut self) {
        self.active = true;
    }

    pub fn on_deactivate(&mut self) {
        self.selection = None;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected(&self) -> Option<(SceneId, &ObjectId)> {
        self.selection.as_ref().map(|(s, o)| (*s, o))
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select the object under `pointer`, snapshotting its baseline the first time.
    pub fn select(
        &mut self,
        ctx: &mut AnimationContext,
        host: &mut dyn SceneHost,
        pointer: Point,
    ) -> Option<ObjectId> {
        if !self.active {
            return None;
        }
        let scene_id = ctx.scene_at(pointer)?;
        let object = host.object_at(pointer)?;
        let id = ensure_object_id(host, &object);
        let scene = ctx.scene_mut(scene_id)?;
        scene.ensure_override_track(id.clone(), || object.baseline_snapshot());
        self.selection = Some((scene_id, id.clone()));
        Some(id)
    }

    /// Record `patch` at the scene's current time.
    pub fn set_change_point(
        &mut self,
        ctx: &mut AnimationContext,
        host: &mut dyn SceneHost,
        patch: PropertyPatch,
    ) -> Option<ObjectProperties> {
        let (scene_id, _) = self.selection.as_ref()?;
        let time = ctx.scene(*scene_id)?.time();
        self.set_change_point_at_time(ctx, host, time, patch)
    }

    pub fn set_change_point_at_time(
        &mut self,
        ctx: &mut AnimationContext,
        host: &mut dyn SceneHost,
        time: f32,
        patch: PropertyPatch,
    ) -> Option<ObjectProperties> {
        let (scene_id, object) = self.selection.as_ref()?;
        let props = ctx
            .scene_mut(*scene_id)?
            .set_change_point_at_time(object, time, patch)?;
        apply(host, object, &props);
        Some(props)
    }

    pub fn remove_change_point_at_time(
        &mut self,
        ctx: &mut AnimationContext,
        host: &mut dyn SceneHost,
        time: f32,
    ) -> Option<ObjectProperties> {
        let (scene_id, object) = self.selection.as_ref()?;
        let props = ctx
            .scene_mut(*scene_id)?
            .remove_change_point_at_time(object, time)?;
        apply(host, object, &props);
        Some(props)
    }
}

fn apply(host: &mut dyn SceneHost, object: &ObjectId, props: &ObjectProperties) {
    if let Err(e) = host.apply_properties(object, props) {
        warn!("modify: could not restyle {object}: {e}");
    }
}
