//! Filesystem photo loading and the background streaming worker.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::DynamicImage;
use ornament_core::{is_data_uri, Error, PhotoAsset, PhotoSource, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Reads manifests and images from disk. Relative paths that do not exist as
/// given are retried inside `directory`, so a manifest written for the
/// default `Memories/` folder still works when `--memories` points elsewhere.
#[derive(Clone, Debug)]
pub struct FsPhotoSource {
    directory: PathBuf,
}

impl FsPhotoSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let direct = PathBuf::from(path);
        if direct.exists() || direct.is_absolute() {
            return direct;
        }
        match direct.file_name() {
            Some(name) => self.directory.join(name),
            None => direct,
        }
    }
}

impl PhotoSource for FsPhotoSource {
    fn read_manifest(&mut self, path: &str) -> Result<String> {
        std::fs::read_to_string(path)
            .map_err(|e| Error::ManifestUnavailable(format!("{path}: {e}")))
    }

    fn load(&mut self, path: &str) -> Result<PhotoAsset> {
        if is_data_uri(path) {
            return load_data_uri(path);
        }
        load_image(&self.resolve(path))
    }
}

/// Decode an image for its aspect ratio and average colour.
pub fn load_image(path: &Path) -> Result<PhotoAsset> {
    let display = path.display().to_string();
    let img = image::open(path).map_err(|e| Error::PhotoLoad {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    asset_from_image(&img, display)
}

/// Decode a base64 `data:image/...` URI. The asset is labelled with the MIME
/// type and size rather than the whole URI.
pub fn load_data_uri(uri: &str) -> Result<PhotoAsset> {
    let (header, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| Error::PhotoLoad {
            path: "data:".into(),
            reason: "malformed data URI".into(),
        })?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default();
    let label = format!("data:{mime} ({} bytes)", payload.len());
    let fail = |reason: String| Error::PhotoLoad {
        path: label.clone(),
        reason,
    };
    if !params.any(|p| p == "base64") {
        return Err(fail("only base64 data URIs are supported".into()));
    }
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| fail(e.to_string()))?;
    let img = image::load_from_memory(&bytes).map_err(|e| fail(e.to_string()))?;
    asset_from_image(&img, label)
}

fn asset_from_image(img: &DynamicImage, display: String) -> Result<PhotoAsset> {
    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(Error::PhotoLoad {
            path: display,
            reason: "empty image".into(),
        });
    }
    let avg = img.thumbnail_exact(1, 1).to_rgb8();
    let [r, g, b] = avg.get_pixel(0, 0).0;
    let mut asset = PhotoAsset::new(display, w as f32 / h as f32);
    asset.tint = Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]);
    Ok(asset)
}

enum LoadRequest {
    /// Manifest remainder, paced by the stream delay.
    Streamed(String),
    /// User-supplied file, loaded ahead of any streamed backlog.
    Immediate(PathBuf),
}

/// Worker thread that loads photos off the frame thread.
pub struct PhotoLoader {
    requests: Sender<LoadRequest>,
    loaded: Receiver<PhotoAsset>,
}

impl PhotoLoader {
    /// Dropped files load as soon as they arrive; the manifest remainder
    /// waits in a local queue and loads one entry per `stream_delay`.
    pub fn spawn(mut source: FsPhotoSource, stream_delay: Duration) -> anyhow::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<LoadRequest>();
        let (out_tx, out_rx) = mpsc::channel();
        thread::Builder::new()
            .name("photo-loader".into())
            .spawn(move || {
                let mut pending: VecDeque<String> = VecDeque::new();
                let mut next_due: Option<Instant> = None;
                loop {
                    let req = match next_due {
                        None => match req_rx.recv() {
                            Ok(req) => Some(req),
                            Err(_) => break,
                        },
                        Some(due) => {
                            let wait = due.saturating_duration_since(Instant::now());
                            match req_rx.recv_timeout(wait) {
                                Ok(req) => Some(req),
                                Err(RecvTimeoutError::Timeout) => None,
                                Err(RecvTimeoutError::Disconnected) => break,
                            }
                        }
                    };
                    let result = match req {
                        Some(LoadRequest::Streamed(path)) => {
                            pending.push_back(path);
                            if next_due.is_none() {
                                next_due = Some(Instant::now() + stream_delay);
                            }
                            continue;
                        }
                        Some(LoadRequest::Immediate(path)) => load_image(&path),
                        None => {
                            let Some(path) = pending.pop_front() else {
                                next_due = None;
                                continue;
                            };
                            next_due = (!pending.is_empty()).then(|| Instant::now() + stream_delay);
                            source.load(&path)
                        }
                    };
                    match result {
                        Ok(asset) => {
                            if out_tx.send(asset).is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("[photos] {e}"),
                    }
                }
            })?;
        Ok(Self {
            requests: req_tx,
            loaded: out_rx,
        })
    }

    pub fn stream(&self, paths: impl IntoIterator<Item = String>) {
        for path in paths {
            let _ = self.requests.send(LoadRequest::Streamed(path));
        }
    }

    pub fn load_now(&self, path: PathBuf) {
        let _ = self.requests.send(LoadRequest::Immediate(path));
    }

    /// Photos finished since the last call.
    pub fn drain(&self) -> Vec<PhotoAsset> {
        self.loaded.try_iter().collect()
    }
}
