// Host-side tests for the photo folder tools.

use ornament_core::{parse_manifest, resolve_photos, PhotoConfig, PhotoOrigin};
use ornament_native::assets::*;
use ornament_native::photos::FsPhotoSource;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ornament-assets-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn noisy_rgb(w: u32, h: u32) -> image::RgbImage {
    image::RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
    })
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn embed_writes_a_loadable_manifest() {
    let dir = scratch_dir("embed");
    noisy_rgb(8, 4).save(dir.join("b.png")).unwrap();
    noisy_rgb(4, 8).save(dir.join("a.png")).unwrap();
    std::fs::write(dir.join("notes.txt"), "not a photo").unwrap();

    let out = dir.join("manifest.json");
    let report = embed_directory(&dir, &out).unwrap();
    assert_eq!(report.embedded, 2);
    assert_eq!(report.skipped, 0);
    assert!(report.source_bytes > 0);

    let text = std::fs::read_to_string(&out).unwrap();
    let uris = parse_manifest(&text).unwrap();
    assert_eq!(uris.len(), 2);
    assert!(uris.iter().all(|u| u.starts_with("data:image/png;base64,")));
    assert!(text.contains("\"name\": \"a.png\""));

    // Sorted by name, so a.png (tall) comes first.
    let cfg = PhotoConfig {
        directory: dir.to_string_lossy().into_owned(),
        ..PhotoConfig::default()
    };
    let plan = resolve_photos(&mut FsPhotoSource::new(&dir), &cfg);
    assert_eq!(plan.origin, PhotoOrigin::Manifest);
    assert!((plan.initial[0].aspect - 0.5).abs() < 1e-6);
    assert!((plan.initial[1].aspect - 2.0).abs() < 1e-6);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mime_types_follow_extension() {
    assert_eq!(mime_for(Path::new("x.JPG")), Some("image/jpeg"));
    assert_eq!(mime_for(Path::new("x.webp")), Some("image/webp"));
    assert_eq!(mime_for(Path::new("x.heic")), Some("image/heic"));
    assert_eq!(mime_for(Path::new("x.mov")), None);
    assert_eq!(mime_for(Path::new("noext")), None);
}

#[test]
fn compress_reencodes_into_subfolder() {
    let dir = scratch_dir("compress");
    let jpeg = dir.join("photo.jpg");
    noisy_rgb(64, 48).save(&jpeg).unwrap();
    noisy_rgb(16, 16).save(dir.join("icon.png")).unwrap();
    std::fs::write(dir.join("broken.jpg"), b"not a jpeg").unwrap();
    std::fs::write(dir.join("clip.mov"), b"video").unwrap();

    let report = compress_directory(&dir, 10).unwrap();
    assert_eq!(report.compressed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.output_dir, dir.join(COMPRESS_DIR_NAME));

    let small = report.output_dir.join("photo.jpg");
    let img = image::open(&small).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
    assert!(report.output_dir.join("icon.png").is_file());
    assert!(!report.output_dir.join("clip.mov").exists());

    // A lower quality gives a smaller file.
    let high = dir.join("high.jpg");
    compress_image(&jpeg, &high, 95).unwrap();
    let low_len = std::fs::metadata(&small).unwrap().len();
    let high_len = std::fs::metadata(&high).unwrap().len();
    assert!(low_len < high_len, "{low_len} vs {high_len}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_directory_is_an_error() {
    let missing = Path::new("/nonexistent/ornament-photos");
    assert!(embed_directory(missing, &missing.join("m.json")).is_err());
    assert!(compress_directory(missing, 75).is_err());
}

#[test]
fn command_line_defaults_to_memories_folder() {
    assert_eq!(
        AssetCommand::parse(args(&["embed"])).unwrap(),
        AssetCommand::Embed {
            dir: PathBuf::from("Memories"),
            out: PathBuf::from("Memories").join(EMBEDDED_MANIFEST_NAME),
        }
    );
    assert_eq!(
        AssetCommand::parse(args(&["compress"])).unwrap(),
        AssetCommand::Compress {
            dir: PathBuf::from("Memories"),
            quality: DEFAULT_JPEG_QUALITY,
        }
    );
}

#[test]
fn command_line_flags() {
    assert_eq!(
        AssetCommand::parse(args(&["embed", "pics", "--out", "all.json"])).unwrap(),
        AssetCommand::Embed {
            dir: PathBuf::from("pics"),
            out: PathBuf::from("all.json"),
        }
    );
    assert_eq!(
        AssetCommand::parse(args(&["compress", "--quality", "40", "pics"])).unwrap(),
        AssetCommand::Compress {
            dir: PathBuf::from("pics"),
            quality: 40,
        }
    );
}

#[test]
fn command_line_errors() {
    for bad in [
        &[][..],
        &["shrink"][..],
        &["compress", "--quality", "0"][..],
        &["compress", "--quality", "high"][..],
        &["compress", "--quality"][..],
        &["compress", "--out", "x.json"][..],
        &["embed", "a", "b"][..],
    ] {
        assert!(AssetCommand::parse(args(bad)).is_err(), "accepted {bad:?}");
    }
}
