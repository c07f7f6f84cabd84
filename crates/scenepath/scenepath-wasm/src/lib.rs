use js_sys::{Array, Function, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use scenepath_core::{
    AnimationContext, AnimationPath, Config, CoordSpace, CurveMode, HostError, HostObject,
    ModifyTool, NodeKey, ObjectId, ObjectProperties, Outputs, PathRecorder, Point,
    PropertyPatch, Rect, SceneHost, SceneId,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Serialize with plain JS objects for maps so style tables read naturally on the JS side.
fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn props_to_js<T: Serialize>(props: Option<T>) -> Result<JsValue, JsError> {
    match props {
        Some(p) => to_js(&p, "properties"),
        None => Ok(JsValue::UNDEFINED),
    }
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    swb::from_value(value).map_err(|e| JsError::new(&format!("{what} parse error: {e}")))
}

/// `SceneHost` backed by a JS object exposing camelCase methods.
struct JsHost {
    obj: JsValue,
}

impl JsHost {
    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.obj, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Result<JsValue, HostError> {
        let f = self
            .method(name)
            .ok_or_else(|| HostError::Rejected(format!("host has no {name}()")))?;
        let arr: Array = args.iter().collect();
        f.apply(&self.obj, &arr)
            .map_err(|e| HostError::Rejected(format!("{name}: {e:?}")))
    }

    /// Call a write method; `false` from JS counts as a rejected write.
    fn call_write(&self, name: &str, args: &[JsValue]) -> Result<(), HostError> {
        let ret = self.call(name, args)?;
        if ret.as_bool() == Some(false) {
            return Err(HostError::Rejected(format!("{name} returned false")));
        }
        Ok(())
    }

    fn call_parse<T: DeserializeOwned>(&self, name: &str, args: &[JsValue]) -> Option<T> {
        match self.call(name, args) {
            Ok(v) if jsvalue_is_undefined_or_null(&v) => None,
            Ok(v) => match swb::from_value(v) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    log::warn!("host {name}() returned malformed data: {e}");
                    None
                }
            },
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    fn point(p: Point) -> JsValue {
        to_js(&p, "point").unwrap_or(JsValue::UNDEFINED)
    }

    fn id(id: &ObjectId) -> JsValue {
        JsValue::from_str(id.as_str())
    }
}

impl SceneHost for JsHost {
    fn object_at(&mut self, point: Point) -> Option<HostObject> {
        self.call_parse("objectAt", &[Self::point(point)])
    }

    fn object(&mut self, id: &ObjectId) -> Option<HostObject> {
        self.call_parse("object", &[Self::id(id)])
    }

    fn assign_object_id(&mut self, node: NodeKey, id: &ObjectId) {
        let args = [JsValue::from_f64(node.0 as f64), Self::id(id)];
        if let Err(e) = self.call("assignObjectId", &args) {
            log::warn!("{e}");
        }
    }

    fn object_center(&mut self, id: &ObjectId) -> Option<Point> {
        self.call_parse("objectCenter", &[Self::id(id)])
    }

    fn set_local_position(&mut self, id: &ObjectId, position: Point) -> Result<(), HostError> {
        self.call_write("setLocalPosition", &[Self::id(id), Self::point(position)])
    }

    fn translate_object(&mut self, id: &ObjectId, dx: f32, dy: f32) -> Result<(), HostError> {
        self.call_write(
            "translateObject",
            &[Self::id(id), JsValue::from_f64(dx as f64), JsValue::from_f64(dy as f64)],
        )
    }

    fn convert_point(
        &mut self,
        point: Point,
        from: &CoordSpace,
        to: &CoordSpace,
    ) -> Result<Point, HostError> {
        let space = |s: &CoordSpace| to_js(s, "space").unwrap_or(JsValue::UNDEFINED);
        let ret = self.call("convertPoint", &[Self::point(point), space(from), space(to)])?;
        if jsvalue_is_undefined_or_null(&ret) {
            return Err(HostError::Rejected("convertPoint returned nothing".into()));
        }
        swb::from_value(ret).map_err(|e| HostError::Rejected(format!("convertPoint: {e}")))
    }

    fn objects_within(&mut self, rect: Rect) -> Vec<ObjectId> {
        let arg = to_js(&rect, "rect").unwrap_or(JsValue::UNDEFINED);
        self.call_parse("objectsWithin", &[arg]).unwrap_or_default()
    }

    fn scene_origin(&mut self, scene: SceneId) -> Option<Point> {
        // Optional: hosts that report moves via sync_scene_transform omit it.
        self.method("sceneOrigin")?;
        self.call_parse("sceneOrigin", &[JsValue::from_f64(scene.0 as f64)])
    }

    fn apply_properties(
        &mut self,
        id: &ObjectId,
        props: &ObjectProperties,
    ) -> Result<(), HostError> {
        let arg = to_js(props, "properties").map_err(|_| {
            HostError::Rejected(format!("could not serialize properties for {id}"))
        })?;
        self.call_write("applyProperties", &[Self::id(id), arg])
    }
}

#[wasm_bindgen]
pub struct ScenePathEngine {
    ctx: AnimationContext,
    host: JsHost,
    recorder: PathRecorder,
    modify: ModifyTool,
}

impl ScenePathEngine {
    fn outputs(out: &Outputs) -> Result<JsValue, JsError> {
        to_js(out, "outputs")
    }
}

#[wasm_bindgen]
impl ScenePathEngine {
    /// Create an engine bound to a JS host object. Pass a config object or undefined/null
    /// for defaults. Example:
    ///   new ScenePathEngine(host, { default_scene_duration_ms: 5000 })
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, config: JsValue) -> Result<ScenePathEngine, JsError> {
        console_error_panic_hook::set_once();

        if jsvalue_is_undefined_or_null(&host) {
            return Err(JsError::new("host object is required"));
        }
        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            from_js(config, "config")?
        };
        cfg.validate()
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;

        Ok(ScenePathEngine {
            ctx: AnimationContext::init(cfg),
            host: JsHost { obj: host },
            recorder: PathRecorder::new(),
            modify: ModifyTool::new(),
        })
    }

    /// Drop every scene and stop reacting to updates.
    pub fn teardown(&mut self) {
        self.recorder.on_deactivate();
        self.modify.on_deactivate();
        self.ctx.teardown();
    }

    #[wasm_bindgen(js_name = is_live)]
    pub fn is_live(&self) -> bool {
        self.ctx.is_live()
    }

    // --- scenes --------------------------------------------------------------------

    /// Create a scene from `{ x, y, width, height }`. Returns its SceneId (u32).
    #[wasm_bindgen(js_name = create_scene)]
    pub fn create_scene(&mut self, bounds: JsValue) -> Result<u32, JsError> {
        let rect: Rect = from_js(bounds, "bounds")?;
        self.ctx
            .create_scene(rect)
            .map(|id| id.0)
            .ok_or_else(|| JsError::new("engine has been torn down"))
    }

    #[wasm_bindgen(js_name = create_scene_with_duration)]
    pub fn create_scene_with_duration(
        &mut self,
        bounds: JsValue,
        duration_ms: f32,
    ) -> Result<u32, JsError> {
        let rect: Rect = from_js(bounds, "bounds")?;
        self.ctx
            .create_scene_with_duration(rect, duration_ms)
            .map(|id| id.0)
            .ok_or_else(|| JsError::new("engine has been torn down"))
    }

    #[wasm_bindgen(js_name = destroy_scene)]
    pub fn destroy_scene(&mut self, scene: u32) -> bool {
        self.ctx.destroy_scene(SceneId(scene))
    }

    /// Topmost scene containing a drawing-layer point.
    #[wasm_bindgen(js_name = scene_at)]
    pub fn scene_at(&self, x: f32, y: f32) -> Option<u32> {
        self.ctx.scene_at(Point::new(x, y)).map(|s| s.0)
    }

    #[wasm_bindgen(js_name = set_duration)]
    pub fn set_duration(&mut self, scene: u32, duration_ms: f32) {
        if let Some(s) = self.ctx.scene_mut(SceneId(scene)) {
            s.set_duration_ms(duration_ms);
        }
    }

    /// `{ scene, time, playing, looping, state, durationMs, bounds }` or undefined.
    #[wasm_bindgen(js_name = scene_state)]
    pub fn scene_state(&self, scene: u32) -> Result<JsValue, JsError> {
        let Some(s) = self.ctx.scene(SceneId(scene)) else {
            return Ok(JsValue::UNDEFINED);
        };
        let state = serde_json::json!({
            "scene": s.id(),
            "time": s.time(),
            "playing": s.is_playing(),
            "looping": s.looping(),
            "state": s.state(),
            "durationMs": s.duration_ms(),
            "bounds": s.bounds(),
        });
        to_js(&state, "scene state")
    }

    // --- paths ---------------------------------------------------------------------

    /// Register (or replace) an object's path. `path` matches AnimationPath's JSON shape.
    #[wasm_bindgen(js_name = register_path)]
    pub fn register_path(
        &mut self,
        scene: u32,
        object: String,
        path: JsValue,
    ) -> Result<(), JsError> {
        let path: AnimationPath = from_js(path, "path")?;
        let s = self
            .ctx
            .scene_mut(SceneId(scene))
            .ok_or_else(|| JsError::new(&format!("unknown scene {scene}")))?;
        s.register_path(ObjectId::from(object), path)
            .map_err(|e| JsError::new(&format!("register_path: {e}")))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = unregister_path)]
    pub fn unregister_path(&mut self, scene: u32, object: String) -> bool {
        self.ctx
            .scene_mut(SceneId(scene))
            .and_then(|s| s.unregister_path(&ObjectId::from(object)))
            .is_some()
    }

    /// The object's path as JSON, or undefined.
    pub fn path(&self, scene: u32, object: String) -> Result<JsValue, JsError> {
        match self
            .ctx
            .scene(SceneId(scene))
            .and_then(|s| s.path(&ObjectId::from(object)))
        {
            Some(p) => to_js(p, "path"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Switch a path between "polyline" and "bezier".
    #[wasm_bindgen(js_name = set_curve_mode)]
    pub fn set_curve_mode(
        &mut self,
        scene: u32,
        object: String,
        mode: JsValue,
    ) -> Result<(), JsError> {
        let mode: CurveMode = from_js(mode, "curve mode")?;
        let updated = self
            .ctx
            .scene_mut(SceneId(scene))
            .map_or(false, |s| s.set_curve_mode(&ObjectId::from(object), mode));
        if !updated {
            return Err(JsError::new("unknown scene or object"));
        }
        Ok(())
    }

    // --- playback ------------------------------------------------------------------

    pub fn play(&mut self, scene: u32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.play(SceneId(scene)))
    }

    pub fn pause(&mut self, scene: u32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.pause(SceneId(scene)))
    }

    #[wasm_bindgen(js_name = toggle_play)]
    pub fn toggle_play(&mut self, scene: u32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.toggle_play(SceneId(scene)))
    }

    #[wasm_bindgen(js_name = set_loop)]
    pub fn set_loop(&mut self, scene: u32, looping: bool) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.set_loop(SceneId(scene), looping))
    }

    pub fn step(&mut self, scene: u32, delta: f32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.step(SceneId(scene), delta, &mut self.host))
    }

    /// User seek from the progress control. Pauses the scene.
    #[wasm_bindgen(js_name = set_time)]
    pub fn set_time(&mut self, scene: u32, time: f32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.seek(SceneId(scene), time, &mut self.host))
    }

    #[wasm_bindgen(js_name = begin_scrub)]
    pub fn begin_scrub(&mut self, scene: u32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.begin_scrub(SceneId(scene)))
    }

    #[wasm_bindgen(js_name = scrub_to)]
    pub fn scrub_to(&mut self, scene: u32, time: f32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.scrub_to(SceneId(scene), time, &mut self.host))
    }

    #[wasm_bindgen(js_name = end_scrub)]
    pub fn end_scrub(&mut self, scene: u32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.end_scrub(SceneId(scene)))
    }

    /// Explicit relocation for hosts without `sceneOrigin`.
    #[wasm_bindgen(js_name = sync_scene_transform)]
    pub fn sync_scene_transform(
        &mut self,
        scene: u32,
        dx: f32,
        dy: f32,
    ) -> Result<JsValue, JsError> {
        Self::outputs(
            self.ctx
                .sync_scene_transform(SceneId(scene), dx, dy, &mut self.host),
        )
    }

    /// Advance every playing scene by `delta_ms`. Returns Outputs JSON.
    pub fn update(&mut self, delta_ms: f32) -> Result<JsValue, JsError> {
        Self::outputs(self.ctx.tick(delta_ms, &mut self.host))
    }

    // --- record tool ---------------------------------------------------------------

    #[wasm_bindgen(js_name = record_activate)]
    pub fn record_activate(&mut self) {
        self.recorder.on_activate();
    }

    #[wasm_bindgen(js_name = record_deactivate)]
    pub fn record_deactivate(&mut self) {
        self.recorder.on_deactivate();
    }

    /// Pointer down. Returns false when there is no scene or object under the pointer.
    #[wasm_bindgen(js_name = record_begin)]
    pub fn record_begin(&mut self, x: f32, y: f32) -> bool {
        self.recorder
            .begin(&self.ctx, &mut self.host, Point::new(x, y))
    }

    #[wasm_bindgen(js_name = record_drag)]
    pub fn record_drag(&mut self, x: f32, y: f32) {
        self.recorder.drag(&mut self.host, Point::new(x, y));
    }

    /// Pointer up. Returns the animated object's id when a path was registered.
    #[wasm_bindgen(js_name = record_end)]
    pub fn record_end(&mut self) -> Option<String> {
        self.recorder
            .end(&mut self.ctx, &mut self.host)
            .map(|id| id.as_str().to_owned())
    }

    #[wasm_bindgen(js_name = record_cancel)]
    pub fn record_cancel(&mut self) {
        self.recorder.cancel();
    }

    /// Live preview polyline as `[{x, y}, ...]`.
    #[wasm_bindgen(js_name = record_preview)]
    pub fn record_preview(&self) -> Result<JsValue, JsError> {
        to_js(self.recorder.preview(), "preview")
    }

    // --- modify tool ---------------------------------------------------------------

    #[wasm_bindgen(js_name = modify_activate)]
    pub fn modify_activate(&mut self) {
        self.modify.on_activate();
    }

    #[wasm_bindgen(js_name = modify_deactivate)]
    pub fn modify_deactivate(&mut self) {
        self.modify.on_deactivate();
    }

    /// Select the object under the pointer. Returns its id.
    #[wasm_bindgen(js_name = modify_select)]
    pub fn modify_select(&mut self, x: f32, y: f32) -> Option<String> {
        self.modify
            .select(&mut self.ctx, &mut self.host, Point::new(x, y))
            .map(|id| id.as_str().to_owned())
    }

    /// Record a property patch at the scene's current time. Returns the effective
    /// properties, or undefined without a selection.
    #[wasm_bindgen(js_name = modify_set_change_point)]
    pub fn modify_set_change_point(&mut self, patch: JsValue) -> Result<JsValue, JsError> {
        let patch: PropertyPatch = from_js(patch, "patch")?;
        let props = self
            .modify
            .set_change_point(&mut self.ctx, &mut self.host, patch);
        props_to_js(props)
    }

    #[wasm_bindgen(js_name = modify_set_change_point_at_time)]
    pub fn modify_set_change_point_at_time(
        &mut self,
        time: f32,
        patch: JsValue,
    ) -> Result<JsValue, JsError> {
        let patch: PropertyPatch = from_js(patch, "patch")?;
        let props =
            self.modify
                .set_change_point_at_time(&mut self.ctx, &mut self.host, time, patch);
        props_to_js(props)
    }

    #[wasm_bindgen(js_name = modify_remove_change_point_at_time)]
    pub fn modify_remove_change_point_at_time(&mut self, time: f32) -> Result<JsValue, JsError> {
        let props = self
            .modify
            .remove_change_point_at_time(&mut self.ctx, &mut self.host, time);
        props_to_js(props)
    }
}

/// Route `log` output to the browser console. Level is one of "error", "warn", "info",
/// "debug", "trace"; defaults to "warn". Calling it twice is harmless.
#[wasm_bindgen(js_name = init_logging)]
pub fn init_logging(level: Option<String>) {
    let level = level
        .as_deref()
        .and_then(|l| l.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Warn);
    let _ = console_log::init_with_level(level);
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
