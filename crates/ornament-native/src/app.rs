//! Window-independent application state: the scene plus its hand and photo
//! feeds. The event loop in `main.rs` forwards input here and renders
//! whatever [`App::scene`] holds.

use crate::input::KeyAction;
use crate::photos::PhotoLoader;
use crate::tracker::{ProcessTracker, SimulatedHand};
use ornament_core::{Error, HandTracker, Mode, PhotoAsset, Scene};
use std::path::PathBuf;

pub enum HandInput {
    Simulated(SimulatedHand),
    Process(ProcessTracker),
    /// The tracker failed; gestures are off for the rest of the session.
    Disabled,
}

impl HandInput {
    fn tracker(&mut self) -> Option<&mut dyn HandTracker> {
        match self {
            HandInput::Simulated(h) => Some(h as &mut dyn HandTracker),
            HandInput::Process(p) => Some(p as &mut dyn HandTracker),
            HandInput::Disabled => None,
        }
    }
}

pub struct App {
    scene: Scene,
    hand: HandInput,
    loader: Option<PhotoLoader>,
    hud_visible: bool,
    capacity_warned: bool,
}

impl App {
    pub fn new(scene: Scene, hand: HandInput, loader: Option<PhotoLoader>) -> Self {
        Self {
            scene,
            hand,
            loader,
            hud_visible: true,
            capacity_warned: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn hud_visible(&self) -> bool {
        self.hud_visible
    }

    /// Apply a keyboard action. Returns `false` when the app should quit.
    pub fn on_key(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Quit => return false,
            KeyAction::ToggleHud => self.hud_visible = !self.hud_visible,
            KeyAction::Pose(pose) => match &mut self.hand {
                HandInput::Simulated(h) => h.set_pose(pose),
                _ => log::debug!("[input] pose keys only drive the simulated hand"),
            },
            KeyAction::ReleaseHand => {
                if let HandInput::Simulated(h) = &mut self.hand {
                    h.release();
                }
            }
        }
        true
    }

    /// Cursor position in [0, 1] window coordinates.
    pub fn on_cursor(&mut self, x: f32, y: f32) {
        if let HandInput::Simulated(h) = &mut self.hand {
            h.move_palm(x, y);
        }
    }

    pub fn on_dropped_file(&mut self, path: PathBuf) {
        match &self.loader {
            Some(loader) => loader.load_now(path),
            None => log::warn!("[photos] loader unavailable, ignoring {}", path.display()),
        }
    }

    pub fn add_photo(&mut self, asset: &PhotoAsset) {
        match self.scene.add_photo(asset) {
            Ok(_) => {}
            Err(Error::PhotoCapacity { max }) => {
                if !self.capacity_warned {
                    log::warn!("[photos] limit of {max} photos reached, ignoring the rest");
                    self.capacity_warned = true;
                }
            }
            Err(e) => log::warn!("[photos] {e}"),
        }
    }

    /// One frame: drain finished photos, poll the hand, advance the scene.
    /// Returns the new mode if a gesture changed it.
    pub fn frame(&mut self, dt: f32) -> Option<Mode> {
        let finished = self.loader.as_ref().map(PhotoLoader::drain).unwrap_or_default();
        for asset in &finished {
            self.add_photo(asset);
        }

        let mut changed = None;
        let polled = self.hand.tracker().map(|t| t.poll());
        match polled {
            Some(Ok(Some(frame))) => {
                changed = self.scene.on_hand_frame(frame.timestamp, frame.hand.as_ref());
            }
            Some(Ok(None)) | None => {}
            Some(Err(e)) => {
                log::error!("[tracker] {e}; gesture control disabled");
                self.hand = HandInput::Disabled;
            }
        }
        self.scene.tick(dt);
        changed
    }

    pub fn title(&self) -> String {
        if !self.hud_visible {
            return "ornament".to_string();
        }
        let help = match self.hand {
            HandInput::Simulated(_) => "F fist  O open  P pinch  Space release  H hide",
            HandInput::Process(_) => "H hide",
            HandInput::Disabled => "gestures off  H hide",
        };
        format!(
            "ornament | {} | {} photos | {}",
            self.scene.mode().label(),
            self.scene.photo_ids().len(),
            help
        )
    }
}
