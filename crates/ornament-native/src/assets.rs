//! Offline helpers for preparing a photo folder.
//!
//! `embed` packs every image into a single manifest of base64 data URIs so a
//! page can load all photos with one request. `compress` re-encodes images
//! into a `compress/` subfolder at a lower JPEG quality.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use ornament_core::{EmbeddedPhoto, PhotoConfig};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const EMBEDDED_MANIFEST_NAME: &str = "manifest_base64.json";
pub const COMPRESS_DIR_NAME: &str = "compress";
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// MIME types for the extensions `embed` picks up.
static EMBED_TYPES: [(&str, &str); 7] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
];

/// Extensions `compress` can decode and write back.
static COMPRESS_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = extension(path)?;
    EMBED_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|&(_, mime)| mime)
}

/// Regular files in `dir`, sorted by name.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

#[derive(Debug, Default, PartialEq)]
pub struct EmbedReport {
    pub embedded: usize,
    pub skipped: usize,
    /// Total size of the source images.
    pub source_bytes: u64,
}

pub fn embed_photo(path: &Path) -> Result<EmbeddedPhoto> {
    let mime = mime_for(path).with_context(|| format!("{} is not an image", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(EmbeddedPhoto {
        name,
        uri: format!("data:{mime};base64,{}", BASE64.encode(&bytes)),
    })
}

/// Write every image in `dir` into a JSON list of `{name, uri}` objects at
/// `out`.
pub fn embed_directory(dir: &Path, out: &Path) -> Result<EmbedReport> {
    let mut report = EmbedReport::default();
    let mut manifest = Vec::new();
    for path in sorted_files(dir)? {
        if mime_for(&path).is_none() {
            continue;
        }
        match embed_photo(&path) {
            Ok(photo) => {
                report.source_bytes += std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                log::info!("[assets] embedded {}", photo.name);
                manifest.push(photo);
            }
            Err(e) => {
                log::warn!("[assets] skipping {}: {e:#}", path.display());
                report.skipped += 1;
            }
        }
    }
    report.embedded = manifest.len();

    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest)
        .with_context(|| format!("writing {}", out.display()))?;
    log::info!(
        "[assets] {} photos ({:.2} MB) -> {}",
        report.embedded,
        report.source_bytes as f64 / (1024.0 * 1024.0),
        out.display()
    );
    Ok(report)
}

#[derive(Debug, Default, PartialEq)]
pub struct CompressReport {
    pub compressed: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
}

/// Re-encode one image. JPEGs use `quality`; other formats are re-saved in
/// their own format.
pub fn compress_image(src: &Path, dst: &Path, quality: u8) -> Result<()> {
    let img = image::open(src).with_context(|| format!("decoding {}", src.display()))?;
    match extension(src).as_deref() {
        Some("jpg" | "jpeg") => {
            let file = File::create(dst).with_context(|| format!("creating {}", dst.display()))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .with_context(|| format!("encoding {}", dst.display()))?;
        }
        _ => img
            .save(dst)
            .with_context(|| format!("encoding {}", dst.display()))?,
    }
    Ok(())
}

/// Compress every supported image in `dir` into `dir/compress/`.
pub fn compress_directory(dir: &Path, quality: u8) -> Result<CompressReport> {
    let files = sorted_files(dir)?;
    let output_dir = dir.join(COMPRESS_DIR_NAME);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut report = CompressReport {
        output_dir,
        ..CompressReport::default()
    };
    for src in files {
        let supported = extension(&src).is_some_and(|e| COMPRESS_EXTENSIONS.contains(&e.as_str()));
        let Some(name) = src.file_name().filter(|_| supported) else {
            continue;
        };
        let dst = report.output_dir.join(name);
        match compress_image(&src, &dst, quality) {
            Ok(()) => {
                let before = std::fs::metadata(&src).map(|m| m.len()).unwrap_or(0);
                let after = std::fs::metadata(&dst).map(|m| m.len()).unwrap_or(0);
                let saved = if before > 0 {
                    (1.0 - after as f64 / before as f64) * 100.0
                } else {
                    0.0
                };
                log::info!(
                    "[assets] {}: {before} -> {after} bytes ({saved:.1}% smaller)",
                    src.display()
                );
                report.compressed += 1;
            }
            Err(e) => {
                log::warn!("[assets] {e:#}");
                report.failed += 1;
            }
        }
    }
    log::info!(
        "[assets] compressed {}, failed {}, output {}",
        report.compressed,
        report.failed,
        report.output_dir.display()
    );
    Ok(report)
}

/// `ornament-assets` subcommands.
///
/// ```text
/// ornament-assets embed [DIR] [--out FILE]
/// ornament-assets compress [DIR] [--quality 1-100]
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum AssetCommand {
    Embed { dir: PathBuf, out: PathBuf },
    Compress { dir: PathBuf, quality: u8 },
}

impl AssetCommand {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut it = args.into_iter();
        let command = it.next().context("expected `embed` or `compress`")?;
        let mut dir: Option<PathBuf> = None;
        let mut out: Option<PathBuf> = None;
        let mut quality = DEFAULT_JPEG_QUALITY;
        while let Some(arg) = it.next() {
            let mut value = || it.next().with_context(|| format!("{arg} expects a value"));
            match arg.as_str() {
                "--out" if command == "embed" => out = Some(PathBuf::from(value()?)),
                "--quality" if command == "compress" => {
                    let v = value()?;
                    quality = v
                        .parse()
                        .ok()
                        .filter(|q| (1..=100).contains(q))
                        .with_context(|| format!("bad quality {v:?}"))?;
                }
                flag if flag.starts_with("--") => bail!("unknown argument {flag:?}"),
                _ if dir.is_none() => dir = Some(PathBuf::from(&arg)),
                other => bail!("unexpected argument {other:?}"),
            }
        }
        let dir = dir.unwrap_or_else(|| PathBuf::from(PhotoConfig::default().directory));
        match command.as_str() {
            "embed" => {
                let out = out.unwrap_or_else(|| dir.join(EMBEDDED_MANIFEST_NAME));
                Ok(AssetCommand::Embed { dir, out })
            }
            "compress" => Ok(AssetCommand::Compress { dir, quality }),
            other => bail!("unknown command {other:?}; expected `embed` or `compress`"),
        }
    }

    pub fn run(&self) -> Result<()> {
        match self {
            AssetCommand::Embed { dir, out } => embed_directory(dir, out).map(drop),
            AssetCommand::Compress { dir, quality } => compress_directory(dir, *quality).map(drop),
        }
    }
}
