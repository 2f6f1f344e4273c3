//! Core engine-facing contracts.
//!
//! The interface between the platform loop and applications (the studio, or
//! any host presenting scenes): the `App` callbacks and the per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
