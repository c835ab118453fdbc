//! Hand tracker contract and the JSON-lines landmark format.
//!
//! A tracker yields zero or one hand per video frame. The JSON format is what
//! a MediaPipe hand landmarker script prints, one detection result per line:
//!
//! ```text
//! {"timestamp": 12.5, "hands": [{"score": 0.97, "landmarks": [{"x":0.5,"y":0.4,"z":0.0}, ...]}]}
//! ```

use crate::error::{Error, Result};
use crate::gesture::HandLandmarks;
use glam::Vec3;
use serde::Deserialize;

/// Anything that can report the hand seen in the latest video frame.
pub trait HandTracker {
    /// Poll the tracker. `Ok(None)` means no new frame is available;
    /// `Ok(Some(frame))` carries the frame's timestamp and its hand, if any.
    fn poll(&mut self) -> Result<Option<TrackedFrame>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackedFrame {
    /// Video time of the frame, seconds.
    pub timestamp: f64,
    pub hand: Option<HandLandmarks>,
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "full_confidence")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    timestamp: f64,
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

fn full_confidence() -> f32 {
    1.0
}

/// Parse one detection line. Hands below `min_score` count as absent; only
/// the first remaining hand is used. A hand with too few landmarks is logged
/// and reported as absent so the frame still clears the previous hand.
pub fn parse_detection_line(line: &str, min_score: f32) -> Result<TrackedFrame> {
    let det: DetectionJson =
        serde_json::from_str(line).map_err(|e| Error::Tracker(e.to_string()))?;
    if let Some(err) = det.error {
        return Err(Error::Tracker(err));
    }
    let hand = det
        .hands
        .into_iter()
        .find(|h| h.score >= min_score)
        .and_then(|h| {
            let points: Vec<Vec3> = h
                .landmarks
                .iter()
                .map(|l| Vec3::new(l.x, l.y, l.z))
                .collect();
            match HandLandmarks::from_points(&points) {
                Ok(hand) => Some(hand),
                Err(e) => {
                    log::warn!("[tracker] frame {}: {e}", det.timestamp);
                    None
                }
            }
        });
    Ok(TrackedFrame {
        timestamp: det.timestamp,
        hand,
    })
}
