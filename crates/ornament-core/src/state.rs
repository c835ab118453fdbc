//! Shared scene state: the display mode, the latest hand reading and the
//! smoothed whole-scene rotation.
//!
//! These types avoid platform-specific APIs and are used by both the native
//! and web frontends. A single [`ModeController`] is owned by the scene and
//! written only from the frame thread.

use crate::constants::*;
use crate::gesture::{GestureReading, Transition};
use crate::particle::ParticleId;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Tree,
    Scatter,
    Focus,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Tree => "TREE",
            Mode::Scatter => "SCATTER",
            Mode::Focus => "FOCUS",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandState {
    pub detected: bool,
    /// Palm centre remapped to [-1, 1] on both axes.
    pub pointer: Vec2,
}

/// Whole-scene rotation in radians: yaw about Y, pitch about X.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl SceneRotation {
    /// Advance one frame according to the current mode and hand input.
    pub fn step(&mut self, mode: Mode, hand: &HandState, dt: f32) {
        match mode {
            Mode::Scatter if hand.detected => {
                let target_yaw = hand.pointer.x * HAND_YAW_RANGE;
                let target_pitch = hand.pointer.y * HAND_PITCH_RANGE;
                let a = (HAND_STEER_RATE * dt).min(1.0);
                self.yaw += (target_yaw - self.yaw) * a;
                self.pitch += (target_pitch - self.pitch) * a;
            }
            Mode::Tree => {
                self.yaw += TREE_YAW_RATE * dt;
                self.pitch += (0.0 - self.pitch) * (TREE_PITCH_RETURN_RATE * dt).min(1.0);
            }
            _ => {
                self.yaw += IDLE_YAW_RATE * dt;
            }
        }
    }

    /// Local-to-world transform for the tree group (Euler XYZ, z = 0).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0))
    }
}

/// Single source of truth for mode, focus target, hand reading and rotation.
///
/// Invariant: `focus` is `Some` only while `mode == Mode::Focus`.
#[derive(Clone, Debug, Default)]
pub struct ModeController {
    mode: Mode,
    focus: Option<ParticleId>,
    pub hand: HandState,
    pub rotation: SceneRotation,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn focus(&self) -> Option<ParticleId> {
        self.focus
    }

    /// Apply one classified video frame. `None` means no hand was seen.
    ///
    /// `photos` are the candidates for a newly entered focus.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        reading: Option<&GestureReading>,
        photos: &[ParticleId],
        rng: &mut R,
    ) -> Option<Mode> {
        let Some(reading) = reading else {
            self.hand.detected = false;
            return None;
        };
        self.hand = HandState {
            detected: true,
            pointer: reading.pointer,
        };
        match reading.transition() {
            Transition::Focus => {
                if self.mode != Mode::Focus {
                    self.mode = Mode::Focus;
                    self.focus = photos.choose(rng).copied();
                    log::debug!("[mode] -> FOCUS on {:?}", self.focus);
                    return Some(Mode::Focus);
                }
                None
            }
            Transition::Tree => self.set_mode(Mode::Tree),
            Transition::Scatter => self.set_mode(Mode::Scatter),
            Transition::Hold => None,
        }
    }

    /// Switch to a non-focus mode, dropping any focus target. Returns the new
    /// mode if it changed.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Mode> {
        debug_assert!(mode != Mode::Focus, "focus is entered through apply()");
        self.focus = None;
        if self.mode == mode {
            return None;
        }
        log::debug!("[mode] {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;
        Some(mode)
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking straight down -Z.
    pub fn looking_down_z(eye: Vec3, fovy_degrees: f32, aspect: f32) -> Self {
        Self {
            eye,
            target: Vec3::new(eye.x, eye.y, 0.0),
            up: Vec3::Y,
            aspect,
            fovy_radians: fovy_degrees.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
