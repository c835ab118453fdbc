//! Desktop front-end: window, GPU renderer and the background workers that
//! feed photos and hand frames into an [`ornament_core::Scene`].

pub mod app;
pub mod assets;
pub mod cli;
pub mod input;
pub mod photos;
pub mod render;
pub mod tracker;
