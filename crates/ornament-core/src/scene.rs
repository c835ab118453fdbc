//! Frame driver: owns every particle plus the [`ModeController`], and turns
//! hand frames and elapsed time into render instances.

use crate::config::SceneConfig;
use crate::constants::{COLOR_STAR, MAX_FRAME_DT, STAR_OFFSET, STAR_SCALE};
use crate::error::{Error, Result};
use crate::gesture::{FrameGate, HandLandmarks};
use crate::particle::{Category, Particle, ParticleId, UpdateContext};
use crate::photos::PhotoAsset;
use crate::state::{Camera, Mode, ModeController};
use glam::{Mat4, Vec3};
use instant::Instant;
use rand::prelude::*;

/// Per-instance data consumed by the renderer: model matrix and RGBA colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub const FLOATS: usize = 20;
}

/// Measures wall-clock time between frames.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl FrameClock {
    /// Seconds since the previous call.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt.as_secs_f32()
    }
}

pub struct Scene {
    cfg: SceneConfig,
    particles: Vec<Particle>,
    photos: Vec<ParticleId>,
    controller: ModeController,
    gate: FrameGate,
    rng: StdRng,
    elapsed: f32,
    scene_transform: Mat4,
    instances: Vec<InstanceData>,
}

impl Scene {
    /// Build the tree: ornaments first, then dust. Photos are added later.
    pub fn new(cfg: SceneConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let total = cfg.ornament_count + cfg.dust_count;
        let mut particles = Vec::with_capacity(total + cfg.photos.initial_batch);
        for i in 0..cfg.ornament_count {
            let category = Category::ornament_from_roll(rng.gen());
            particles.push(Particle::new(ParticleId(i as u32), category, &cfg, &mut rng));
        }
        for i in cfg.ornament_count..total {
            particles.push(Particle::new(
                ParticleId(i as u32),
                Category::Dust,
                &cfg,
                &mut rng,
            ));
        }
        log::info!(
            "[scene] {} ornaments, {} dust, seed {}",
            cfg.ornament_count,
            cfg.dust_count,
            seed
        );
        let mut scene = Self {
            cfg,
            particles,
            photos: Vec::new(),
            controller: ModeController::new(),
            gate: FrameGate::new(),
            rng,
            elapsed: 0.0,
            scene_transform: Mat4::IDENTITY,
            instances: Vec::new(),
        };
        scene.rebuild_instances();
        scene
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.cfg
    }
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.0 as usize)
    }
    #[inline]
    pub fn photo_ids(&self) -> &[ParticleId] {
        &self.photos
    }
    #[inline]
    pub fn controller(&self) -> &ModeController {
        &self.controller
    }
    #[inline]
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }
    #[inline]
    pub fn focus(&self) -> Option<ParticleId> {
        self.controller.focus()
    }
    #[inline]
    pub fn scene_transform(&self) -> Mat4 {
        self.scene_transform
    }
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Append a photo card. Existing particles are untouched.
    pub fn add_photo(&mut self, asset: &PhotoAsset) -> Result<ParticleId> {
        let max = self.cfg.photos.max_photos;
        if self.photos.len() >= max {
            return Err(Error::PhotoCapacity { max });
        }
        let id = ParticleId(self.particles.len() as u32);
        let mut particle = Particle::photo(id, asset.aspect, &self.cfg, &mut self.rng);
        if let Some(tint) = asset.tint {
            particle.set_tint(tint);
        }
        self.particles.push(particle);
        self.photos.push(id);
        log::debug!("[scene] photo {} added as {:?}", asset.path, id);
        self.rebuild_instances();
        Ok(id)
    }

    /// Feed one detector result. Frames with a repeated timestamp are
    /// dropped. Returns the new mode if it changed.
    pub fn on_hand_frame(&mut self, timestamp: f64, hand: Option<&HandLandmarks>) -> Option<Mode> {
        if !self.gate.admit(timestamp) {
            return None;
        }
        let reading = hand.map(HandLandmarks::read);
        let changed = self
            .controller
            .apply(reading.as_ref(), &self.photos, &mut self.rng);
        if let Some(mode) = changed {
            log::info!("[gesture] mode {}", mode.label());
        }
        changed
    }

    /// Force a non-focus mode, e.g. from a keyboard shortcut.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Mode> {
        self.controller.set_mode(mode)
    }

    /// Advance everything by `dt` seconds. A non-finite `dt` counts as 0.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.elapsed += dt;

        let mode = self.controller.mode();
        let hand = self.controller.hand;
        self.controller.rotation.step(mode, &hand, dt);
        self.scene_transform = self.controller.rotation.matrix();

        let ctx = UpdateContext {
            dt,
            elapsed: self.elapsed,
            mode,
            focus: self.controller.focus(),
            scene_transform: self.scene_transform,
            camera_eye: self.cfg.camera_eye(),
            focus_point: self.cfg.focus_point(),
        };
        for p in &mut self.particles {
            p.update(&ctx);
        }
        self.rebuild_instances();
    }

    /// Star first, then one instance per particle in id order.
    #[inline]
    pub fn instances(&self) -> &[InstanceData] {
        &self.instances
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera::looking_down_z(self.cfg.camera_eye(), self.cfg.camera_fovy_degrees, aspect)
    }

    fn rebuild_instances(&mut self) {
        self.instances.clear();
        self.instances.reserve(self.particles.len() + 1);
        let star = self.scene_transform
            * Mat4::from_scale_rotation_translation(
                Vec3::splat(STAR_SCALE * 2.0),
                glam::Quat::IDENTITY,
                Vec3::new(0.0, self.cfg.tree_height / 2.0 + STAR_OFFSET, 0.0),
            );
        self.instances.push(InstanceData {
            model: star.to_cols_array_2d(),
            color: [COLOR_STAR[0], COLOR_STAR[1], COLOR_STAR[2], 1.0],
        });
        let scene = self.scene_transform;
        self.instances
            .extend(self.particles.iter().map(|p| InstanceData {
                model: p.model_matrix(scene).to_cols_array_2d(),
                color: p.color(),
            }));
    }
}
