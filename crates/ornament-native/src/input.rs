// Keyboard shortcuts for the desktop window.
use winit::keyboard::{Key, NamedKey};

/// Hand pose produced by the keyboard simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    Fist,
    Open,
    Pinch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Pose(SimPose),
    ReleaseHand,
    ToggleHud,
    Quit,
}

pub fn action_for_key(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(NamedKey::Space) => Some(KeyAction::ReleaseHand),
        Key::Named(NamedKey::Escape) => Some(KeyAction::Quit),
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "f" => Some(KeyAction::Pose(SimPose::Fist)),
            "o" => Some(KeyAction::Pose(SimPose::Open)),
            "p" => Some(KeyAction::Pose(SimPose::Pinch)),
            "h" => Some(KeyAction::ToggleHud),
            _ => None,
        },
        _ => None,
    }
}
