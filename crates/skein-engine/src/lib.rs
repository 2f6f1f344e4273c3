//! Skein engine crate.
//!
//! Renders declarative scene trees (rectangles, circles, paths, text, images,
//! groups, blur and color-matrix layers) through a pluggable drawing backend,
//! and hosts the window/GPU runtime that presents the result.

pub mod backend;
pub mod coords;
pub mod image;
pub mod paint;
pub mod path;
pub mod render;
pub mod scene;
pub mod text;

pub mod core;
pub mod device;
pub mod time;
pub mod window;

pub mod logging;
