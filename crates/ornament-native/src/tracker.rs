//! Hand trackers for the desktop build.
//!
//! [`SimulatedHand`] turns keyboard and mouse state into synthetic landmarks
//! so every gesture can be driven without a camera. [`ProcessTracker`] reads
//! JSON-lines detection results from an external landmark process (for
//! example a MediaPipe script reading the webcam) on a background thread.

use crate::input::SimPose;
use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use ornament_core::{landmarks, parse_detection_line, HandLandmarks, HandTracker, TrackedFrame};
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

// Simulated video runs at a nominal 30 fps.
const SIM_FRAME_SECONDS: f64 = 1.0 / 30.0;

// Fingertip distance from the wrist for each pose.
const SIM_FIST_EXTENSION: f32 = 0.1;
const SIM_OPEN_EXTENSION: f32 = 0.5;
const SIM_PINCH_EXTENSION: f32 = 0.32;
const SIM_PINCH_GAP: f32 = 0.02;

/// Keyboard/mouse driven hand. Starts with no hand in view.
#[derive(Clone, Debug)]
pub struct SimulatedHand {
    pose: Option<SimPose>,
    palm: Vec2,
    timestamp: f64,
}

impl Default for SimulatedHand {
    fn default() -> Self {
        Self {
            pose: None,
            palm: Vec2::splat(0.5),
            timestamp: 0.0,
        }
    }
}

impl SimulatedHand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Option<SimPose> {
        self.pose
    }

    pub fn set_pose(&mut self, pose: SimPose) {
        self.pose = Some(pose);
    }

    /// Take the hand out of view.
    pub fn release(&mut self) {
        self.pose = None;
    }

    /// Move the palm to a point given in [0, 1] window coordinates.
    pub fn move_palm(&mut self, x: f32, y: f32) {
        self.palm = Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
    }

    /// Landmarks for the current pose, or `None` with no hand in view.
    pub fn landmarks(&self) -> Option<HandLandmarks> {
        let pose = self.pose?;
        let wrist = Vec3::new(self.palm.x, self.palm.y + 0.15, 0.0);
        let extension = match pose {
            SimPose::Fist => SIM_FIST_EXTENSION,
            SimPose::Open => SIM_OPEN_EXTENSION,
            SimPose::Pinch => SIM_PINCH_EXTENSION,
        };
        let mut pts = [wrist; landmarks::COUNT];
        for &tip in &landmarks::FINGER_TIPS {
            pts[tip] = wrist - Vec3::new(0.0, extension, 0.0);
        }
        pts[landmarks::THUMB_TIP] = match pose {
            SimPose::Pinch => pts[landmarks::INDEX_FINGER_TIP] + Vec3::new(SIM_PINCH_GAP, 0.0, 0.0),
            _ => wrist + Vec3::new(-0.12, -0.05, 0.0),
        };
        pts[landmarks::MIDDLE_FINGER_MCP] = self.palm.extend(0.0);
        Some(HandLandmarks::new(pts))
    }
}

impl HandTracker for SimulatedHand {
    /// Every poll is a fresh video frame.
    fn poll(&mut self) -> ornament_core::Result<Option<TrackedFrame>> {
        self.timestamp += SIM_FRAME_SECONDS;
        Ok(Some(TrackedFrame {
            timestamp: self.timestamp,
            hand: self.landmarks(),
        }))
    }
}

/// Minimum detector confidence for a hand to count.
pub const MIN_HAND_SCORE: f32 = 0.5;

/// External landmark process, one JSON detection per stdout line.
pub struct ProcessTracker {
    child: Child,
    frames: Receiver<TrackedFrame>,
}

impl ProcessTracker {
    /// Start `command` (program followed by whitespace-separated arguments).
    pub fn spawn(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next().context("empty tracker command")?;
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start tracker {program:?}"))?;
        let stdout = child.stdout.take().context("tracker has no stdout")?;

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("hand-tracker".into())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let line = match line {
                        Ok(l) => l,
                        Err(e) => {
                            log::warn!("[tracker] read failed: {e}");
                            break;
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_detection_line(&line, MIN_HAND_SCORE) {
                        Ok(frame) => {
                            if tx.send(frame).is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("[tracker] {e}"),
                    }
                }
                log::info!("[tracker] landmark stream ended");
            })?;
        log::info!("[tracker] started {command:?}");
        Ok(Self { child, frames: rx })
    }
}

impl HandTracker for ProcessTracker {
    /// Returns the newest pending frame; older ones are dropped.
    fn poll(&mut self) -> ornament_core::Result<Option<TrackedFrame>> {
        let mut latest = None;
        loop {
            match self.frames.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(frame) => Ok(Some(frame)),
                        None => Err(ornament_core::Error::Tracker(
                            "landmark process exited".into(),
                        )),
                    };
                }
            }
        }
    }
}

impl Drop for ProcessTracker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
