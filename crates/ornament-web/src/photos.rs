//! Browser photo discovery over `fetch`: manifest, probing, placeholder.
//!
//! Same order and limits as [`ornament_core::resolve_photos`], but every step
//! is async so the page keeps animating while images arrive.

use crate::PhotoRegistry;
use ornament_core::{parse_manifest, probe_candidates, PhotoAsset, PhotoConfig, Scene};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(msg: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&msg.to_string())
}

pub async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let window = web::window().ok_or_else(|| js_err("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(js_err(format!("{url}: HTTP {}", resp.status())));
    }
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| js_err(format!("{url}: body is not text")))
}

/// Let the browser decode `url` (a path or an embedded `data:` URI) and
/// report its aspect ratio.
pub async fn load_image(url: &str) -> Result<PhotoAsset, JsValue> {
    let img = web::HtmlImageElement::new()?;
    img.set_src(url);
    JsFuture::from(img.decode()).await?;
    let (w, h) = (img.natural_width(), img.natural_height());
    if w == 0 || h == 0 {
        return Err(js_err(format!("{url}: empty image")));
    }
    Ok(PhotoAsset::new(url, w as f32 / h as f32))
}

async fn sleep_ms(ms: u64) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        if let Some(w) = web::window() {
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                ms.min(i32::MAX as u64) as i32,
            );
        }
    });
    let _ = JsFuture::from(promise).await;
}

fn add(scene: &Rc<RefCell<Scene>>, registry: &Rc<RefCell<PhotoRegistry>>, asset: &PhotoAsset) {
    let added = scene.borrow_mut().add_photo(asset);
    match added {
        Ok(id) => registry.borrow_mut().push(id, &asset.path),
        Err(e) => log::warn!("[photos] {e}"),
    }
}

/// Run the full chain, adding photos to `scene` as they load.
pub async fn load_photos(
    scene: Rc<RefCell<Scene>>,
    registry: Rc<RefCell<PhotoRegistry>>,
    cfg: PhotoConfig,
) {
    let manifest_url = format!("{}/{}", cfg.directory, cfg.manifest_name);
    let mut deferred = Vec::new();
    let mut loaded = 0usize;

    match fetch_text(&manifest_url).await {
        Ok(text) => match parse_manifest(&text) {
            Ok(paths) => {
                let split = cfg.initial_batch.min(paths.len());
                for path in &paths[..split] {
                    match load_image(path).await {
                        Ok(asset) => {
                            add(&scene, &registry, &asset);
                            loaded += 1;
                        }
                        Err(e) => log::warn!("[photos] skipping manifest entry: {e:?}"),
                    }
                }
                deferred = paths[split..].to_vec();
                log::info!("[photos] manifest: {loaded} loaded, {} deferred", deferred.len());
            }
            Err(e) => log::warn!("[photos] manifest ignored: {e}"),
        },
        Err(e) => log::info!("[photos] no manifest ({e:?}); probing filenames"),
    }

    if loaded == 0 {
        for url in probe_candidates(&cfg) {
            if loaded >= cfg.probe_max_hits {
                break;
            }
            if let Ok(asset) = load_image(&url).await {
                log::debug!("[photos] probe hit {url}");
                add(&scene, &registry, &asset);
                loaded += 1;
            }
        }
        if loaded == 0 {
            log::info!("[photos] nothing found, using placeholder");
            add(&scene, &registry, &PhotoAsset::placeholder());
        }
    }

    for path in deferred {
        sleep_ms(cfg.stream_delay_ms).await;
        match load_image(&path).await {
            Ok(asset) => add(&scene, &registry, &asset),
            Err(e) => log::warn!("[photos] {e:?}"),
        }
    }
}
