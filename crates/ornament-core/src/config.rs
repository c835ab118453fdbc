//! Scene configuration.
//!
//! Defaults reproduce the stock scene: 1500 ornaments and 2500 dust motes on
//! a 24 x 8 spiral, camera 50 units back. Every field is optional when loaded
//! from JSON; missing fields keep their default.

use crate::error::{Error, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ornament_count: usize,
    pub dust_count: usize,
    pub tree_height: f32,
    pub tree_radius: f32,
    pub camera_z: f32,
    pub camera_height: f32,
    pub camera_fovy_degrees: f32,
    /// Distance in front of the camera where a focused photo settles.
    pub focus_distance: f32,
    pub photos: PhotoConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    pub directory: String,
    pub manifest_name: String,
    /// Manifest entries loaded before the first frame; the rest are streamed.
    pub initial_batch: usize,
    pub stream_delay_ms: u64,
    pub probe_max_index: u32,
    pub probe_max_hits: usize,
    pub max_photos: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ornament_count: 1500,
            dust_count: 2500,
            tree_height: 24.0,
            tree_radius: 8.0,
            camera_z: 50.0,
            camera_height: 2.0,
            camera_fovy_degrees: 42.0,
            focus_distance: 15.0,
            photos: PhotoConfig::default(),
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            directory: "Memories".to_string(),
            manifest_name: "manifest.json".to_string(),
            initial_batch: 10,
            stream_delay_ms: 100,
            probe_max_index: 30,
            probe_max_hits: 8,
            max_photos: 512,
        }
    }
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: SceneConfig =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tree_height > 0.0) || !(self.tree_radius > 0.0) {
            return Err(Error::Config(format!(
                "tree dimensions must be positive (height {}, radius {})",
                self.tree_height, self.tree_radius
            )));
        }
        if !(self.camera_fovy_degrees > 0.0 && self.camera_fovy_degrees < 180.0) {
            return Err(Error::Config(format!(
                "camera_fovy_degrees out of range: {}",
                self.camera_fovy_degrees
            )));
        }
        if !(self.focus_distance > 0.0) {
            return Err(Error::Config(format!(
                "focus_distance must be positive, got {}",
                self.focus_distance
            )));
        }
        if self.photos.max_photos == 0 {
            return Err(Error::Config("photos.max_photos must be at least 1".into()));
        }
        if self.focus_distance >= self.camera_z {
            return Err(Error::Config(format!(
                "focus_distance {} would place the photo behind the tree axis",
                self.focus_distance
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn camera_eye(&self) -> Vec3 {
        Vec3::new(0.0, self.camera_height, self.camera_z)
    }

    #[inline]
    pub fn focus_point(&self) -> Vec3 {
        crate::constants::focus_point_vec3(self.camera_eye(), self.focus_distance)
    }

    #[inline]
    pub fn manifest_path(&self) -> String {
        format!("{}/{}", self.photos.directory, self.photos.manifest_name)
    }
}
