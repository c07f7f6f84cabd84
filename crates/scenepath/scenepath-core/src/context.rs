//! Animation context: owns every scene and serializes frame ticks and user seeks.
//!
//! The context is created with [`AnimationContext::init`] and handed to whichever
//! component needs scene access (tools, the wasm adapter). Frame-clock ticks and pointer
//! seeks are both queued as [`UpdateMessage`]s and drained in order by
//! [`AnimationContext::update`], so the last message queued for a frame decides `t`.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::geometry::{Point, Rect};
use crate::host::SceneHost;
use crate::ids::{IdAllocator, SceneId};
use crate::outputs::Outputs;
use crate::scene::Scene;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UpdateMessage {
    /// One rendered frame elapsed.
    FrameTick { delta_ms: f32 },
    /// The user dragged or clicked the progress control. Pauses the scene.
    UserSeek { scene: SceneId, time: f32 },
}

#[derive(Debug)]
pub struct AnimationContext {
    cfg: Config,
    ids: IdAllocator,
    scenes: Vec<Scene>,
    queue: VecDeque<UpdateMessage>,
    outputs: Outputs,
    live: bool,
}

impl AnimationContext {
    pub fn init(cfg: Config) -> Self {
        debug!("animation context initialized");
        Self {
            cfg,
            ids: IdAllocator::new(),
            scenes: Vec::new(),
            queue: VecDeque::new(),
            outputs: Outputs::default(),
            live: true,
        }
    }

    /// Drop every scene (with its paths and overrides) and stop reacting to updates.
    pub fn teardown(&mut self) {
        debug!("animation context torn down ({} scenes)", self.scenes.len());
        self.scenes.clear();
        self.queue.clear();
        self.outputs.clear();
        self.ids.reset();
        self.live = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns None once the context has been torn down.
    pub fn create_scene(&mut self, bounds: Rect) -> Option<SceneId> {
        if !self.live {
            debug!("create_scene ignored: context torn down");
            return None;
        }
        let id = self.ids.alloc_scene();
        self.scenes.push(Scene::new(id, bounds, &self.cfg));
        debug!("created scene {id:?} at {bounds:?}");
        Some(id)
    }

    pub fn create_scene_with_duration(
        &mut self,
        bounds: Rect,
        duration_ms: f32,
    ) -> Option<SceneId> {
        let id = self.create_scene(bounds)?;
        if let Some(scene) = self.scene_mut(id) {
            scene.set_duration_ms(duration_ms);
        }
        Some(id)
    }

    /// Remove a scene with everything it owns. Returns false for unknown ids.
    pub fn destroy_scene(&mut self, id: SceneId) -> bool {
        let before = self.scenes.len();
        self.scenes.retain(|s| s.id() != id);
        self.queue
            .retain(|m| !matches!(m, UpdateMessage::UserSeek { scene, .. } if *scene == id));
        before != self.scenes.len()
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id() == id)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Topmost (most recently created) scene containing a drawing-layer point.
    pub fn scene_at(&self, point: Point) -> Option<SceneId> {
        self.scenes
            .iter()
            .rev()
            .find(|s| s.bounds().contains(point))
            .map(|s| s.id())
    }

    pub fn enqueue(&mut self, msg: UpdateMessage) {
        if self.live {
            self.queue.push_back(msg);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain queued messages in order and return what changed.
    ///
    /// Frame ticks run, per scene: relocation sync, path evaluation, property overrides,
    /// frame summary.
    pub fn update(&mut self, host: &mut dyn SceneHost) -> &Outputs {
        self.outputs.clear();
        while let Some(msg) = self.queue.pop_front() {
            match msg {
                UpdateMessage::FrameTick { delta_ms } => {
                    for scene in &mut self.scenes {
                        scene.sync_with_host(host, &mut self.outputs);
                        scene.tick(delta_ms, host, &mut self.outputs);
                    }
                }
                UpdateMessage::UserSeek { scene, time } => {
                    if let Some(s) = self.scenes.iter_mut().find(|s| s.id() == scene) {
                        s.pause(&mut self.outputs);
                        s.set_time(time, host, &mut self.outputs);
                    }
                }
            }
        }
        &self.outputs
    }

    /// Frame-clock entry point: queue a tick and process the queue.
    pub fn tick(&mut self, delta_ms: f32, host: &mut dyn SceneHost) -> &Outputs {
        self.enqueue(UpdateMessage::FrameTick { delta_ms });
        self.update(host)
    }

    /// Programmatic seek: queue a seek and process the queue.
    pub fn seek(&mut self, scene: SceneId, time: f32, host: &mut dyn SceneHost) -> &Outputs {
        self.enqueue(UpdateMessage::UserSeek { scene, time });
        self.update(host)
    }

    /// Run a scene command against fresh outputs. Unknown scenes, or a torn-down context,
    /// yield empty outputs.
    pub fn with_scene<F>(&mut self, id: SceneId, f: F) -> &Outputs
    where
        F: FnOnce(&mut Scene, &mut Outputs),
    {
        self.outputs.clear();
        if !self.live {
            return &self.outputs;
        }
        if let Some(scene) = self.scenes.iter_mut().find(|s| s.id() == id) {
            f(scene, &mut self.outputs);
        }
        &self.outputs
    }

    pub fn play(&mut self, id: SceneId) -> &Outputs {
        self.with_scene(id, |s, out| s.play(out))
    }

    pub fn pause(&mut self, id: SceneId) -> &Outputs {
        self.with_scene(id, |s, out| s.pause(out))
    }

    pub fn toggle_play(&mut self, id: SceneId) -> &Outputs {
        self.with_scene(id, |s, out| s.toggle_play(out))
    }

    pub fn step(&mut self, id: SceneId, delta: f32, host: &mut dyn SceneHost) -> &Outputs {
        self.with_scene(id, |s, out| s.step(delta, host, out))
    }

    pub fn begin_scrub(&mut self, id: SceneId) -> &Outputs {
        self.with_scene(id, |s, out| s.begin_scrub(out))
    }

    pub fn scrub_to(&mut self, id: SceneId, time: f32, host: &mut dyn SceneHost) -> &Outputs {
        self.with_scene(id, |s, out| s.scrub_to(time, host, out))
    }

    pub fn end_scrub(&mut self, id: SceneId) -> &Outputs {
        self.with_scene(id, |s, out| s.end_scrub(out))
    }

    pub fn set_loop(&mut self, id: SceneId, looping: bool) -> &Outputs {
        self.with_scene(id, |s, out| {
            s.set_loop(looping);
            out.push_frame(s.frame());
        })
    }

    /// Explicit relocation for hosts that report scene moves as deltas.
    pub fn sync_scene_transform(
        &mut self,
        id: SceneId,
        dx: f32,
        dy: f32,
        host: &mut dyn SceneHost,
    ) -> &Outputs {
        self.with_scene(id, |s, out| s.sync_scene_transform(dx, dy, host, out))
    }
}

impl Default for AnimationContext {
    fn default() -> Self {
        Self::init(Config::default())
    }
}
