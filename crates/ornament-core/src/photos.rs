//! Photo discovery: manifest, then filename probing, then a placeholder.
//!
//! Loading itself is platform work and sits behind [`PhotoSource`]. This
//! module only decides which paths to try and in what order, so the chain is
//! the same on every frontend.

use crate::config::PhotoConfig;
use crate::error::{Error, Result};
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub static PROBE_PREFIXES: [&str; 5] = ["image", "img", "photo", "Memories", ""];
pub static PROBE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
pub const PLACEHOLDER_PATH: &str = "<placeholder>";

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoAsset {
    pub path: String,
    /// Width over height.
    pub aspect: f32,
    /// Representative colour used when the renderer cannot show the image.
    pub tint: Option<[f32; 3]>,
}

impl PhotoAsset {
    pub fn new(path: impl Into<String>, aspect: f32) -> Self {
        Self {
            path: path.into(),
            aspect,
            tint: None,
        }
    }

    /// Dark card with a gold frame, used when nothing else is found.
    pub fn placeholder() -> Self {
        Self {
            path: PLACEHOLDER_PATH.to_string(),
            aspect: 1.0,
            tint: Some([0.02, 0.02, 0.02]),
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.path == PLACEHOLDER_PATH
    }
}

/// Platform loader used by [`resolve_photos`].
pub trait PhotoSource {
    /// Raw manifest text. Missing files are `Error::ManifestUnavailable`.
    fn read_manifest(&mut self, path: &str) -> Result<String>;
    fn load(&mut self, path: &str) -> Result<PhotoAsset>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoOrigin {
    Manifest,
    Probe,
    Placeholder,
}

#[derive(Clone, Debug)]
pub struct PhotoPlan {
    /// Photos to add before the first frame.
    pub initial: Vec<PhotoAsset>,
    /// Manifest entries still to be streamed in.
    pub deferred: Vec<String>,
    pub origin: PhotoOrigin,
}

/// An image carried inside the manifest as a `data:` URI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedPhoto {
    #[serde(default)]
    pub name: String,
    pub uri: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Path(String),
    Embedded(EmbeddedPhoto),
}

#[inline]
pub fn is_data_uri(path: &str) -> bool {
    path.starts_with("data:")
}

/// Parse a manifest: a JSON array whose entries are path strings or
/// `{"name", "uri"}` objects. Embedded entries yield their URI. Duplicates are
/// dropped, order is kept.
pub fn parse_manifest(text: &str) -> Result<Vec<String>> {
    let entries: Vec<ManifestEntry> = serde_json::from_str(text)?;
    let mut seen = FnvHashSet::default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            ManifestEntry::Path(path) => path,
            ManifestEntry::Embedded(photo) => photo.uri,
        })
        .filter(|p| !p.trim().is_empty() && seen.insert(p.clone()))
        .collect())
}

/// Conventional filenames, index-major: `image1.jpg`, `image1.jpeg`, ...
pub fn probe_candidates(cfg: &PhotoConfig) -> impl Iterator<Item = String> + '_ {
    (1..=cfg.probe_max_index).flat_map(move |i| {
        PROBE_PREFIXES.iter().flat_map(move |pre| {
            PROBE_EXTENSIONS
                .iter()
                .map(move |ext| format!("{}/{}{}.{}", cfg.directory, pre, i, ext))
        })
    })
}

/// Run the fallback chain against `source`.
///
/// Manifest entries past `initial_batch` are returned in `deferred` even when
/// none of the eager ones loaded; the probe then still runs for the first
/// batch.
pub fn resolve_photos<S: PhotoSource + ?Sized>(source: &mut S, cfg: &PhotoConfig) -> PhotoPlan {
    let manifest_path = format!("{}/{}", cfg.directory, cfg.manifest_name);
    let mut initial = Vec::new();
    let mut deferred = Vec::new();

    match source
        .read_manifest(&manifest_path)
        .and_then(|text| parse_manifest(&text))
    {
        Ok(paths) => {
            let split = cfg.initial_batch.min(paths.len());
            for path in &paths[..split] {
                match source.load(path) {
                    Ok(asset) => initial.push(asset),
                    Err(e) => log::warn!("[photos] skipping manifest entry: {e}"),
                }
            }
            deferred = paths[split..].to_vec();
            log::info!(
                "[photos] manifest: {} loaded, {} deferred",
                initial.len(),
                deferred.len()
            );
        }
        Err(Error::ManifestUnavailable(reason)) => {
            log::info!("[photos] no manifest ({reason}); probing filenames");
        }
        Err(e) => log::warn!("[photos] manifest ignored: {e}"),
    }
    if !initial.is_empty() {
        return PhotoPlan {
            initial,
            deferred,
            origin: PhotoOrigin::Manifest,
        };
    }

    let mut found: SmallVec<[PhotoAsset; 8]> = SmallVec::new();
    for path in probe_candidates(cfg) {
        if found.len() >= cfg.probe_max_hits {
            break;
        }
        if let Ok(asset) = source.load(&path) {
            log::debug!("[photos] probe hit {path}");
            found.push(asset);
        }
    }
    if !found.is_empty() {
        log::info!("[photos] probe found {} photos", found.len());
        return PhotoPlan {
            initial: found.into_vec(),
            deferred,
            origin: PhotoOrigin::Probe,
        };
    }

    log::info!("[photos] nothing found, using placeholder");
    PhotoPlan {
        initial: vec![PhotoAsset::placeholder()],
        deferred,
        origin: PhotoOrigin::Placeholder,
    }
}
