use crossbeam_channel::Sender;
use personalization::ViewPersonalizationSettings;
use thiserror::Error;

use crate::runtime::SettingsFeed;

/// Adapter selection hint forwarded to wgpu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    #[default]
    Low,
    High,
}

/// What we learned about the adapter wgpu picked, kept for logging.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub max_texture_dimension: u32,
}

impl AdapterProfile {
    pub fn from_wgpu(info: &wgpu::AdapterInfo, limits: &wgpu::Limits) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
            max_texture_dimension: limits.max_texture_dimension_2d,
        }
    }

    /// llvmpipe, lavapipe, WARP and friends.
    pub fn is_software(&self) -> bool {
        self.device_type == wgpu::DeviceType::Cpu
    }
}

/// Failures at the GPU boundary. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Device, surface or pipeline could not be created.
    #[error("GPU resources unavailable: {0}")]
    ResourceUnavailable(String),
    /// The swapchain could not hand out a texture this frame.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl RenderError {
    pub(crate) fn unavailable(err: impl std::fmt::Display) -> Self {
        RenderError::ResourceUnavailable(err.to_string())
    }
}

/// Start-up configuration for the preview window.
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    /// Settings used until the feed publishes something newer.
    pub initial_settings: ViewPersonalizationSettings,
    /// Snapshots published by the settings UI.
    pub settings: SettingsFeed,
    /// Receives averaged frame rates, at most every half second.
    pub fps_listener: Option<Sender<f64>>,
    pub power_preference: GpuPowerPreference,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 800),
            title: String::from("curtains"),
            initial_settings: ViewPersonalizationSettings::default(),
            settings: SettingsFeed::detached(),
            fps_listener: None,
            power_preference: GpuPowerPreference::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_errors_render_their_cause() {
        let err = RenderError::unavailable("no adapter");
        assert_eq!(err.to_string(), "GPU resources unavailable: no adapter");
    }

    #[test]
    fn adapter_profile_carries_texture_limit() {
        let info = wgpu::AdapterInfo {
            name: String::from("llvmpipe"),
            vendor: 0,
            device: 0,
            device_type: wgpu::DeviceType::Cpu,
            driver: String::new(),
            driver_info: String::new(),
            backend: wgpu::Backend::Vulkan,
        };
        let limits = wgpu::Limits {
            max_texture_dimension_2d: 4096,
            ..wgpu::Limits::downlevel_defaults()
        };

        let profile = AdapterProfile::from_wgpu(&info, &limits);
        assert_eq!(profile.max_texture_dimension, 4096);
        assert_eq!(profile.name, "llvmpipe");
        assert!(profile.is_software());
    }
}
