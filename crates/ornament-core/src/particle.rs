//! Particles and their three spatial arrangements.
//!
//! Every particle caches a resting (tree) target and a scatter target at
//! construction. The live [`Transform`] chases whichever target the current
//! [`Mode`] selects; nothing else about a particle changes after creation.

use crate::config::SceneConfig;
use crate::constants::*;
use crate::state::Mode;
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::PI;

/// Stable handle for a particle inside a [`crate::Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Box,
    GoldBox,
    GoldSphere,
    Red,
    Cane,
    Dust,
    Photo,
}

impl Category {
    #[inline]
    pub fn is_dust(self) -> bool {
        matches!(self, Category::Dust)
    }

    #[inline]
    pub fn is_photo(self) -> bool {
        matches!(self, Category::Photo)
    }

    /// Map a uniform roll in [0, 1) to an ornament kind.
    pub fn ornament_from_roll(roll: f32) -> Category {
        if roll < 0.40 {
            Category::Box
        } else if roll < 0.70 {
            Category::GoldBox
        } else if roll < 0.92 {
            Category::GoldSphere
        } else if roll < 0.97 {
            Category::Red
        } else {
            Category::Cane
        }
    }

    #[inline]
    pub fn spin_multiplier(self) -> f32 {
        if self.is_photo() {
            SPIN_MULT_PHOTO
        } else {
            SPIN_MULT_ORNAMENT
        }
    }

    /// Inner radius and width of the scatter shell.
    #[inline]
    pub fn scatter_band(self) -> (f32, f32) {
        if self.is_dust() {
            SCATTER_BAND_DUST
        } else {
            SCATTER_BAND_ORNAMENT
        }
    }

    pub fn color(self) -> [f32; 4] {
        let (rgb, a) = match self {
            Category::Box => (COLOR_DEEP_GREEN, 1.0),
            Category::GoldBox | Category::GoldSphere | Category::Photo => {
                (COLOR_CHAMPAGNE_GOLD, 1.0)
            }
            Category::Red => (COLOR_ACCENT_RED, 1.0),
            Category::Cane => (COLOR_CANE, 1.0),
            Category::Dust => (COLOR_DUST, DUST_OPACITY),
        };
        [rgb[0], rgb[1], rgb[2], a]
    }
}

/// Live transform. `rotation` is XYZ Euler angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    #[inline]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

/// Everything a particle may read during one update. Built once per frame by
/// the frame driver and shared by all particles.
#[derive(Clone, Copy, Debug)]
pub struct UpdateContext {
    pub dt: f32,
    pub elapsed: f32,
    pub mode: Mode,
    pub focus: Option<ParticleId>,
    /// Local-to-world transform of the whole tree.
    pub scene_transform: Mat4,
    pub camera_eye: Vec3,
    /// World-space point the focused photo is pulled to.
    pub focus_point: Vec3,
}

/// Stochastic spiral placement. `y` lies in [-h/2, h/2]; the radius is at
/// most `1.2 * max(radius, 0.5)`.
pub fn tree_position<R: Rng + ?Sized>(rng: &mut R, height: f32, radius: f32) -> Vec3 {
    let t = rng.gen::<f32>().powf(TREE_HEIGHT_BIAS);
    let y = t * height - height / 2.0;
    let r_max = (radius * (1.0 - t)).max(TREE_MIN_RADIUS);
    let angle = t * TREE_SPIRAL_TURNS_PI * PI + rng.gen::<f32>() * PI;
    let r = r_max * (TREE_RADIUS_JITTER_MIN + rng.gen::<f32>() * TREE_RADIUS_JITTER_SPAN);
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Uniform point on a spherical shell whose band depends on the category.
pub fn scatter_position<R: Rng + ?Sized>(rng: &mut R, category: Category) -> Vec3 {
    let (inner, width) = category.scatter_band();
    let r = inner + rng.gen::<f32>() * width;
    let theta = rng.gen::<f32>() * PI * 2.0;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

#[derive(Clone, Debug)]
pub struct Particle {
    id: ParticleId,
    category: Category,
    resting_position: Vec3,
    scatter_position: Vec3,
    spin_speed: Vec3,
    base_scale: f32,
    aspect: f32,
    tint: Option<[f32; 3]>,
    transform: Transform,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(
        id: ParticleId,
        category: Category,
        cfg: &SceneConfig,
        rng: &mut R,
    ) -> Self {
        let base_scale = match category {
            Category::Dust => 0.5 + rng.gen::<f32>(),
            Category::Photo => PHOTO_BASE_SCALE,
            _ => 0.4 + rng.gen::<f32>() * 0.5,
        };
        let rotation = if category.is_photo() || category.is_dust() {
            Vec3::ZERO
        } else {
            Vec3::new(
                rng.gen::<f32>() * 6.0,
                rng.gen::<f32>() * 6.0,
                rng.gen::<f32>() * 6.0,
            )
        };
        Self::with_base_scale(id, category, base_scale, rotation, cfg, rng)
    }

    /// A photo card with the given width/height ratio.
    pub fn photo<R: Rng + ?Sized>(
        id: ParticleId,
        aspect: f32,
        cfg: &SceneConfig,
        rng: &mut R,
    ) -> Self {
        let mut p = Self::new(id, Category::Photo, cfg, rng);
        p.aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        p
    }

    fn with_base_scale<R: Rng + ?Sized>(
        id: ParticleId,
        category: Category,
        base_scale: f32,
        rotation: Vec3,
        cfg: &SceneConfig,
        rng: &mut R,
    ) -> Self {
        let m = category.spin_multiplier();
        let spin_speed = Vec3::new(
            (rng.gen::<f32>() - 0.5) * m,
            (rng.gen::<f32>() - 0.5) * m,
            (rng.gen::<f32>() - 0.5) * m,
        );
        let resting_position = tree_position(rng, cfg.tree_height, cfg.tree_radius);
        let scatter_position = scatter_position(rng, category);
        Self {
            id,
            category,
            resting_position,
            scatter_position,
            spin_speed,
            base_scale,
            aspect: 1.0,
            tint: None,
            transform: Transform {
                position: Vec3::ZERO,
                rotation,
                scale: base_scale,
            },
        }
    }

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }
    #[inline]
    pub fn resting_position(&self) -> Vec3 {
        self.resting_position
    }
    #[inline]
    pub fn scatter_position(&self) -> Vec3 {
        self.scatter_position
    }
    #[inline]
    pub fn spin_speed(&self) -> Vec3 {
        self.spin_speed
    }
    #[inline]
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Override the category colour, e.g. with a photo's average colour.
    pub fn set_tint(&mut self, rgb: [f32; 3]) {
        self.tint = Some(rgb);
    }

    pub fn color(&self) -> [f32; 4] {
        match self.tint {
            Some([r, g, b]) => [r, g, b, 1.0],
            None => self.category.color(),
        }
    }

    /// Unscaled size of the mesh this particle stands for.
    pub fn extents(&self) -> Vec3 {
        match self.category {
            Category::Box | Category::GoldBox => Vec3::splat(0.55),
            Category::GoldSphere | Category::Red => Vec3::splat(1.0),
            Category::Cane => Vec3::new(0.3, 1.0, 0.16),
            Category::Dust => Vec3::splat(0.16),
            Category::Photo => Vec3::new(
                PHOTO_CARD_HEIGHT * self.aspect + PHOTO_FRAME_PADDING,
                PHOTO_CARD_HEIGHT + PHOTO_FRAME_PADDING,
                PHOTO_CARD_DEPTH,
            ),
        }
    }

    /// Model matrix in world space for a tree with the given transform.
    pub fn model_matrix(&self, scene_transform: Mat4) -> Mat4 {
        let local = Mat4::from_scale_rotation_translation(
            self.extents() * self.transform.scale,
            self.transform.quat(),
            self.transform.position,
        );
        scene_transform * local
    }

    /// Advance one frame. Tolerates any mode/focus combination.
    pub fn update(&mut self, ctx: &UpdateContext) {
        let focused = ctx.mode == Mode::Focus && ctx.focus == Some(self.id);

        let target = match ctx.mode {
            Mode::Tree => self.resting_position,
            Mode::Scatter => self.scatter_position,
            Mode::Focus if focused => ctx
                .scene_transform
                .inverse()
                .transform_point3(ctx.focus_point),
            Mode::Focus => self.scatter_position,
        };
        let rate = if focused {
            LERP_RATE_FOCUSED
        } else {
            LERP_RATE_DEFAULT
        };
        let alpha = (rate * ctx.dt).min(1.0);
        self.transform.position += (target - self.transform.position) * alpha;

        match ctx.mode {
            Mode::Scatter => {
                self.transform.rotation += self.spin_speed * ctx.dt;
            }
            Mode::Tree => {
                let keep = 1.0 - (TREE_UPRIGHT_RATE * ctx.dt).min(1.0);
                self.transform.rotation.x *= keep;
                self.transform.rotation.z *= keep;
                self.transform.rotation.y += TREE_SPIN_RATE * ctx.dt;
            }
            Mode::Focus => {}
        }
        if focused {
            self.face_camera(ctx);
        }

        let target_scale = self.target_scale(ctx, focused);
        let alpha = (SCALE_LERP_RATE * ctx.dt).min(1.0);
        self.transform.scale += (target_scale - self.transform.scale) * alpha;
    }

    fn target_scale(&self, ctx: &UpdateContext, focused: bool) -> f32 {
        if self.category.is_dust() {
            if ctx.mode == Mode::Tree {
                return 0.0;
            }
            let phase = ctx.elapsed * DUST_PULSE_FREQ + self.id.0 as f32;
            return self.base_scale * (DUST_PULSE_BASE + DUST_PULSE_SPAN * phase.sin());
        }
        match ctx.mode {
            Mode::Scatter if self.category.is_photo() => self.base_scale * PHOTO_SCATTER_SCALE,
            Mode::Focus if focused => FOCUSED_SCALE,
            Mode::Focus => self.base_scale * BACKGROUND_SCALE,
            _ => self.base_scale,
        }
    }

    // Orientation is fully determined by the camera, not integrated.
    fn face_camera(&mut self, ctx: &UpdateContext) {
        let world_pos = ctx.scene_transform.transform_point3(self.transform.position);
        let forward = ctx.camera_eye - world_pos;
        if forward.length_squared() < 1e-8 {
            return;
        }
        let z = forward.normalize();
        let x = Vec3::Y.cross(z);
        if x.length_squared() < 1e-8 {
            return;
        }
        let x = x.normalize();
        let y = z.cross(x);
        let world_rot = Quat::from_mat3(&Mat3::from_cols(x, y, z));
        let (_, scene_rot, _) = ctx.scene_transform.to_scale_rotation_translation();
        let local = scene_rot.inverse() * world_rot;
        let (rx, ry, rz) = local.to_euler(EulerRot::XYZ);
        self.transform.rotation = Vec3::new(rx, ry, rz);
    }
}
