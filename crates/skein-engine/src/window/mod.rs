//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and windows, and wires each window to a GPU
//! surface that presents rendered frames.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
