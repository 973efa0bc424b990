//! Renderer crate for the curtains preview.
//!
//! Two full-screen procedural effects are drawn every display refresh: an
//! animated gradient "curtain" background that cross-fades between palettes
//! and follows the pointer with a soft glow, and a pulsing rounded-rectangle
//! halo composited on top. The overall flow is:
//!
//! ```text
//!   settings UI ──SettingsPublisher──▶ SettingsFeed
//!                                          │ latest snapshot per frame
//!                                          ▼
//!   Renderer::run ──▶ WindowState ──▶ CurtainsEffect / HaloEffect
//!                                          │ FrameUniforms
//!                                          ▼
//!                                      GpuState::present ──▶ surface
//! ```
//!
//! Everything above the `gpu` module is plain data and arithmetic and can be
//! exercised without a GPU.

mod compile;
pub mod effects;
pub mod fps;
mod gpu;
pub mod palette;
pub mod pointer;
pub mod runtime;
pub mod transition;
mod types;
mod window;

use anyhow::Result;
use personalization::ViewPersonalizationSettings;

pub use effects::curtains::{CurtainsEffect, CurtainsFrame};
pub use effects::halo::HaloEffect;
pub use fps::{FrameRateMeter, FPS_WINDOW};
pub use gpu::{CurtainsUniforms, FrameUniforms, HaloUniforms};
pub use palette::{Palette, PaletteSource, Rgba};
pub use pointer::SmoothedPointer;
pub use runtime::{SettingsFeed, SettingsPublisher};
pub use transition::{PaletteTransition, PALETTE_TRANSITION};
pub use types::{AdapterProfile, GpuPowerPreference, RenderError, RendererConfig};

/// Entry point that owns the preview window for its whole lifetime.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Blocks until the window closes and returns the final settings so the
    /// caller can persist them. GPU set-up failures surface as
    /// [`RenderError::ResourceUnavailable`] inside the returned error.
    pub fn run(self) -> Result<ViewPersonalizationSettings> {
        window::run_window(self.config)
    }
}
