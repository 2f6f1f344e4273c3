//! GPU device, surface and frame presentation.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - uploading CPU-rendered frames and presenting them

mod gpu;
mod present;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
pub use present::Presenter;
