use glam::Vec3;

// Shared motion/gesture tuning constants used by both web and native frontends.

// Position easing (fraction of remaining distance per second)
pub const LERP_RATE_DEFAULT: f32 = 2.0;
pub const LERP_RATE_FOCUSED: f32 = 5.0; // focused photo snaps in faster
pub const SCALE_LERP_RATE: f32 = 4.0;

// Rotation while settled in the tree
pub const TREE_SPIN_RATE: f32 = 0.5; // rad/s around vertical
pub const TREE_UPRIGHT_RATE: f32 = 1.0; // x/z decay toward zero

// Spin speed multipliers per axis, applied to (rand - 0.5)
pub const SPIN_MULT_ORNAMENT: f32 = 2.0;
pub const SPIN_MULT_PHOTO: f32 = 0.3;

// Scale behaviour
pub const DUST_PULSE_BASE: f32 = 0.8;
pub const DUST_PULSE_SPAN: f32 = 0.4;
pub const DUST_PULSE_FREQ: f32 = 4.0;
pub const PHOTO_SCATTER_SCALE: f32 = 2.5;
pub const FOCUSED_SCALE: f32 = 4.5; // absolute, not relative to base
pub const BACKGROUND_SCALE: f32 = 0.8; // everyone else while focused
pub const PHOTO_BASE_SCALE: f32 = 0.8;

// Photo card geometry
pub const PHOTO_CARD_HEIGHT: f32 = 1.2;
pub const PHOTO_FRAME_PADDING: f32 = 0.12;
pub const PHOTO_CARD_DEPTH: f32 = 0.05;

// Tree placement
pub const TREE_HEIGHT_BIAS: f32 = 0.8;
pub const TREE_MIN_RADIUS: f32 = 0.5;
pub const TREE_SPIRAL_TURNS_PI: f32 = 50.0; // angle = t * 50pi + jitter
pub const TREE_RADIUS_JITTER_MIN: f32 = 0.8;
pub const TREE_RADIUS_JITTER_SPAN: f32 = 0.4;

// Scatter shells (inner radius, width)
pub const SCATTER_BAND_ORNAMENT: (f32, f32) = (8.0, 12.0);
pub const SCATTER_BAND_DUST: (f32, f32) = (12.0, 20.0);

// Gesture thresholds, normalized image units
pub const PINCH_THRESHOLD: f32 = 0.05;
pub const FIST_EXTENSION_MAX: f32 = 0.25;
pub const OPEN_EXTENSION_MIN: f32 = 0.4;

// Scene rotation
pub const HAND_YAW_RANGE: f32 = std::f32::consts::PI * 0.9;
pub const HAND_PITCH_RANGE: f32 = std::f32::consts::PI * 0.25;
pub const HAND_STEER_RATE: f32 = 3.0;
pub const TREE_YAW_RATE: f32 = 0.3;
pub const TREE_PITCH_RETURN_RATE: f32 = 2.0;
pub const IDLE_YAW_RATE: f32 = 0.1;

// Frame timing
pub const MAX_FRAME_DT: f32 = 0.1; // seconds; longer stalls are clamped

// Star topper sits this far above the apex
pub const STAR_OFFSET: f32 = 1.2;
pub const STAR_SCALE: f32 = 1.2;

// Palette (linear-ish RGB)
pub const COLOR_CHAMPAGNE_GOLD: [f32; 3] = [1.0, 0.851, 0.4];
pub const COLOR_DEEP_GREEN: [f32; 3] = [0.043, 0.247, 0.106];
pub const COLOR_ACCENT_RED: [f32; 3] = [0.6, 0.0, 0.0];
pub const COLOR_CANE: [f32; 3] = [0.95, 0.85, 0.85];
pub const COLOR_DUST: [f32; 3] = [1.0, 0.933, 0.733];
pub const COLOR_STAR: [f32; 3] = [1.0, 0.867, 0.533];
pub const DUST_OPACITY: f32 = 0.8;

/// Where the focused photo is pulled to, in world space.
#[inline]
pub fn focus_point_vec3(camera_eye: Vec3, distance_in_front: f32) -> Vec3 {
    Vec3::new(camera_eye.x, camera_eye.y, camera_eye.z - distance_in_front)
}
