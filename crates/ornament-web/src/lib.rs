#![cfg(target_arch = "wasm32")]
//! WebAssembly bindings. The page owns the camera, the hand landmark model
//! and the WebGL/WebGPU renderer; this crate owns the scene state and hands
//! back per-instance matrices every frame.

mod dom;
mod photos;

use ornament_core::{HandLandmarks, InstanceData, ParticleId, PhotoAsset, Scene, SceneConfig};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ornament-web starting");

    if let Some(document) = dom::window_document() {
        dom::wire_controls_toggle_h(&document);
    }
    Ok(())
}

/// Photo particle bookkeeping for the JS renderer, which needs to know which
/// instance to texture with which URL.
#[derive(Default)]
pub(crate) struct PhotoRegistry {
    entries: Vec<PhotoEntry>,
}

#[derive(Serialize)]
struct PhotoEntry {
    id: u32,
    /// Index into `instance_data()`; the star occupies instance 0.
    instance: u32,
    url: String,
    placeholder: bool,
}

impl PhotoRegistry {
    pub(crate) fn push(&mut self, id: ParticleId, url: &str) {
        self.entries.push(PhotoEntry {
            id: id.0,
            instance: id.0 + 1,
            url: url.to_string(),
            placeholder: url == ornament_core::PLACEHOLDER_PATH,
        });
    }
}

#[wasm_bindgen]
pub struct OrnamentScene {
    scene: Rc<RefCell<Scene>>,
    photos: Rc<RefCell<PhotoRegistry>>,
}

#[wasm_bindgen]
impl OrnamentScene {
    /// `config_json` may be empty for the stock scene; `seed` is random when
    /// omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: Option<f64>) -> Result<OrnamentScene, JsValue> {
        let cfg = match config_json.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                SceneConfig::from_json(text).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            _ => SceneConfig::default(),
        };
        let seed = seed.map(|s| s as u64).unwrap_or_else(rand::random);
        Ok(OrnamentScene {
            scene: Rc::new(RefCell::new(Scene::new(cfg, seed))),
            photos: Rc::new(RefCell::new(PhotoRegistry::default())),
        })
    }

    /// Start the manifest / probe / placeholder chain in the background.
    pub fn load_photos(&self) {
        let cfg = self.scene.borrow().config().photos.clone();
        let scene = Rc::clone(&self.scene);
        let registry = Rc::clone(&self.photos);
        spawn_local(photos::load_photos(scene, registry, cfg));
    }

    /// Feed one hand-model result: a flat `[x0, y0, z0, ...]` buffer for the
    /// first hand, or nothing. Returns the new mode label if it changed.
    pub fn on_hand_landmarks(&self, landmarks: Option<Vec<f32>>, video_time: f64) -> Option<String> {
        let hand = landmarks.and_then(|flat| match HandLandmarks::from_flat(&flat) {
            Ok(h) => Some(h),
            Err(e) => {
                log::warn!("[gesture] {e}");
                None
            }
        });
        self.scene
            .borrow_mut()
            .on_hand_frame(video_time, hand.as_ref())
            .map(|m| m.label().to_string())
    }

    pub fn tick(&self, dt: f32) {
        self.scene.borrow_mut().tick(dt);
    }

    /// `instance_count() * 20` floats: a column-major mat4 then RGBA.
    pub fn instance_data(&self) -> js_sys::Float32Array {
        let scene = self.scene.borrow();
        let floats: &[f32] = bytemuck::cast_slice::<InstanceData, f32>(scene.instances());
        js_sys::Float32Array::from(floats)
    }

    pub fn instance_count(&self) -> u32 {
        self.scene.borrow().instances().len() as u32
    }

    pub fn view_proj(&self, aspect: f32) -> Vec<f32> {
        self.scene
            .borrow()
            .camera(aspect)
            .view_proj()
            .to_cols_array()
            .to_vec()
    }

    /// Add a user photo (e.g. from a file picker). Returns its instance index.
    pub fn add_photo(&self, url: String, aspect: f32) -> Result<u32, JsValue> {
        let id = self
            .scene
            .borrow_mut()
            .add_photo(&PhotoAsset::new(url.clone(), aspect))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.photos.borrow_mut().push(id, &url);
        Ok(id.0 + 1)
    }

    /// JSON list of `{id, instance, url, placeholder}` for every photo so far.
    pub fn photos_json(&self) -> String {
        serde_json::to_string(&self.photos.borrow().entries).unwrap_or_else(|_| "[]".into())
    }

    pub fn mode(&self) -> String {
        self.scene.borrow().mode().label().to_string()
    }

    pub fn hand_detected(&self) -> bool {
        self.scene.borrow().controller().hand.detected
    }
}
