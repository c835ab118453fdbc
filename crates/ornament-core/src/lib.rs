pub mod config;
pub mod constants;
pub mod error;
pub mod gesture;
pub mod particle;
pub mod photos;
pub mod scene;
pub mod state;
pub mod tracker;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use config::*;
pub use constants::*;
pub use error::{Error, Result};
pub use gesture::*;
pub use particle::*;
pub use photos::*;
pub use scene::*;
pub use state::*;
pub use tracker::*;
