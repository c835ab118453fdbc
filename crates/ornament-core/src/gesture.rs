//! Gesture classification from hand landmarks.
//!
//! The classifier is stateless: it turns one frame's 21 landmarks into a
//! [`GestureReading`] (palm pointer plus pinch and finger-extension metrics),
//! and the reading maps to a [`Transition`] through a fixed priority table.
//! Whether a transition actually changes anything is decided by
//! [`crate::ModeController`].

use crate::constants::{FIST_EXTENSION_MAX, OPEN_EXTENSION_MIN, PINCH_THRESHOLD};
use crate::error::{Error, Result};
use glam::{Vec2, Vec3};

/// Hand landmark indices (MediaPipe hand landmark model convention).
pub mod landmarks {
    pub const COUNT: usize = 21;
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    pub const FINGER_TIPS: [usize; 4] = [
        INDEX_FINGER_TIP,
        MIDDLE_FINGER_TIP,
        RING_FINGER_TIP,
        PINKY_TIP,
    ];
}

/// One detected hand: 21 points, x/y normalized to [0, 1] of the video frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; landmarks::COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; landmarks::COUNT]) -> Self {
        Self { points }
    }

    /// Build from any slice of points; fewer than 21 is an error, extras are
    /// ignored.
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        if points.len() < landmarks::COUNT {
            return Err(Error::InvalidLandmarks {
                expected: landmarks::COUNT,
                actual: points.len(),
            });
        }
        let mut out = [Vec3::ZERO; landmarks::COUNT];
        out.copy_from_slice(&points[..landmarks::COUNT]);
        Ok(Self { points: out })
    }

    /// Build from a flat `[x0, y0, z0, x1, ...]` buffer. A trailing partial
    /// point is an error.
    pub fn from_flat(values: &[f32]) -> Result<Self> {
        if values.len() % 3 != 0 {
            return Err(Error::InvalidLandmarks {
                expected: landmarks::COUNT,
                actual: values.len() / 3,
            });
        }
        let points: Vec<Vec3> = values
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    #[inline]
    pub fn points(&self) -> &[Vec3; landmarks::COUNT] {
        &self.points
    }

    #[inline]
    fn planar(&self, index: usize) -> Vec2 {
        self.points[index].truncate()
    }

    /// Thumb-tip to index-tip distance in the image plane.
    pub fn pinch_distance(&self) -> f32 {
        self.planar(landmarks::THUMB_TIP)
            .distance(self.planar(landmarks::INDEX_FINGER_TIP))
    }

    /// Mean image-plane distance from the wrist to the four non-thumb tips.
    pub fn average_finger_extension(&self) -> f32 {
        let wrist = self.planar(landmarks::WRIST);
        let sum: f32 = landmarks::FINGER_TIPS
            .iter()
            .map(|&i| self.planar(i).distance(wrist))
            .sum();
        sum / landmarks::FINGER_TIPS.len() as f32
    }

    /// Palm centre remapped from [0, 1] to [-1, 1].
    pub fn pointer(&self) -> Vec2 {
        (self.planar(landmarks::MIDDLE_FINGER_MCP) - Vec2::splat(0.5)) * 2.0
    }

    pub fn read(&self) -> GestureReading {
        GestureReading {
            pointer: self.pointer(),
            pinch_distance: self.pinch_distance(),
            finger_extension: self.average_finger_extension(),
        }
    }
}

/// Requested change, before it is reconciled with the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Focus,
    Tree,
    Scatter,
    /// Mid-range extension: keep whatever mode is active, including focus.
    Hold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub pointer: Vec2,
    pub pinch_distance: f32,
    pub finger_extension: f32,
}

impl GestureReading {
    #[inline]
    pub fn transition(&self) -> Transition {
        classify(self.pinch_distance, self.finger_extension)
    }
}

/// Transition table. First match wins: pinch, fist, open hand, dead zone.
pub fn classify(pinch_distance: f32, finger_extension: f32) -> Transition {
    if pinch_distance < PINCH_THRESHOLD {
        Transition::Focus
    } else if finger_extension < FIST_EXTENSION_MAX {
        Transition::Tree
    } else if finger_extension > OPEN_EXTENSION_MIN {
        Transition::Scatter
    } else {
        Transition::Hold
    }
}

/// Skips detector callbacks for video frames that were already classified.
#[derive(Clone, Debug, Default)]
pub struct FrameGate {
    last: Option<f64>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `timestamp` differs from the last admitted one. A rewound
    /// video (looping source, restarted camera) is admitted.
    pub fn admit(&mut self, timestamp: f64) -> bool {
        match self.last {
            Some(prev) if timestamp == prev => false,
            _ => {
                self.last = Some(timestamp);
                true
            }
        }
    }
}
