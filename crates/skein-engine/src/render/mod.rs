//! Scene rendering.
//!
//! The scene renderer walks a [`Node`](crate::scene::Node) tree and hands each
//! element to the renderer registered for its tag. Renderers draw through the
//! [`Backend`](crate::backend::Backend) traits only.
//!
//! Convention:
//! - geometry is in logical pixels (top-left origin, +Y down)
//! - every paint, shader, filter and path is created, used and dropped inside
//!   one renderer call; only images outlive a frame (image cache)

pub mod config;
mod ctx;
mod error;
pub mod factory;
pub mod gradient;
mod registry;
pub mod renderers;
mod scene_renderer;

pub use config::{ImageConfig, RenderConfig, TextConfig};
pub use ctx::RenderContext;
pub use error::RenderError;
pub use registry::RendererRegistry;
pub use renderers::{Renderer, Scope};
pub use scene_renderer::{load_fonts, SceneRenderer};
