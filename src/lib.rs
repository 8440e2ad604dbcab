// NOTE: Allow these for the whole project.
#![allow(clippy::collapsible_if)]
#![allow(clippy::new_without_default)]

pub mod log;
pub mod app;
pub mod engine;
pub mod render;
pub mod tile;
pub mod utils;
pub mod view;
pub mod viewer;

pub use viewer::Viewer;
