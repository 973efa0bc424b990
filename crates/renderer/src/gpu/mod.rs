//! GPU side of the renderer.
//!
//! - `context` owns wgpu instance/device/surface wiring and reconfigures the
//!   swapchain when the window resizes.
//! - `pipeline` builds one render pipeline per effect, each with its own
//!   uniform buffer behind a single bind group.
//! - `uniforms` holds the `#[repr(C)]` mirrors of the GLSL uniform blocks.
//! - `state` glues everything together and encodes the two passes of a frame.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
pub use uniforms::{CurtainsUniforms, FrameUniforms, HaloUniforms};
