use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use personalization::{BackgroundStyle, ViewPersonalizationSettings};
use tracing::{debug, info, warn};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::effects::curtains::CurtainsEffect;
use crate::effects::halo::HaloEffect;
use crate::gpu::{FrameUniforms, GpuState};
use crate::runtime::{SettingsFeed, SettingsPublisher};
use crate::types::RendererConfig;

/// Preview-window actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    CycleStyle,
    ToggleHalo,
    CustomColor,
}

impl KeyAction {
    fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Space) => Some(KeyAction::CycleStyle),
            Key::Character(value) => match value.as_str() {
                " " => Some(KeyAction::CycleStyle),
                "h" | "H" => Some(KeyAction::ToggleHalo),
                "c" | "C" => Some(KeyAction::CustomColor),
                _ => None,
            },
            _ => None,
        }
    }

    fn apply(self, settings: &mut ViewPersonalizationSettings) {
        match self {
            KeyAction::CycleStyle => {
                let next = settings
                    .background
                    .style
                    .map_or(BackgroundStyle::DeepBlue, BackgroundStyle::next);
                settings.background.style = Some(next);
            }
            KeyAction::ToggleHalo => settings.halo.is_visible = !settings.halo.is_visible,
            KeyAction::CustomColor => settings.background.style = None,
        }
    }
}

#[derive(Default)]
struct MouseState {
    position: Option<PhysicalPosition<f64>>,
    is_pressed: bool,
}

impl MouseState {
    /// Returns the point the glow should chase, if the move should steer it.
    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<[f32; 2]> {
        self.position = Some(position);
        self.is_pressed.then(|| to_point(position))
    }

    fn handle_button(&mut self, state: ElementState) -> Option<[f32; 2]> {
        self.is_pressed = state == ElementState::Pressed;
        if self.is_pressed {
            self.position.map(to_point)
        } else {
            None
        }
    }
}

fn to_point(position: PhysicalPosition<f64>) -> [f32; 2] {
    [position.x as f32, position.y as f32]
}

/// Folds any snapshot still queued in `feed` into `current`, then returns the
/// settings `action` should publish. A key press must never republish
/// settings older than the newest queued edit.
fn settings_after_key(
    current: &mut ViewPersonalizationSettings,
    feed: &SettingsFeed,
    action: KeyAction,
) -> ViewPersonalizationSettings {
    if let Some(latest) = feed.latest() {
        *current = latest;
    }
    let mut next = current.clone();
    action.apply(&mut next);
    next
}

/// Both effects, stepped together once per presented frame.
struct FrameEffects {
    curtains: CurtainsEffect,
    halo: HaloEffect,
}

impl FrameEffects {
    fn new(settings: &ViewPersonalizationSettings, now: Instant) -> Self {
        Self {
            curtains: CurtainsEffect::new(&settings.background, now),
            halo: HaloEffect::new(now),
        }
    }

    /// Acquires the frame target before stepping any effect state, so a
    /// skipped frame leaves the glow and the cross-fade where they were.
    fn prepare<T>(
        &mut self,
        acquire: impl FnOnce() -> Result<T, wgpu::SurfaceError>,
        now: Instant,
        settings: &ViewPersonalizationSettings,
        size: PhysicalSize<u32>,
    ) -> Result<(T, FrameUniforms), wgpu::SurfaceError> {
        let target = acquire()?;

        let curtains = self
            .curtains
            .compute_frame_uniforms(now, &settings.background);
        if curtains.transition_started {
            debug!(source = ?self.curtains.palette_source(), "palette transition started");
        }
        let halo = self
            .halo
            .frame(now, &settings.halo, (size.width, size.height));

        let frame = FrameUniforms {
            curtains: curtains.uniforms,
            clear_color: curtains.clear_color.to_array(),
            halo,
        };
        Ok((target, frame))
    }
}

/// Aggregates GPU state and both effects for the preview window.
pub(crate) struct WindowState {
    // Declared before `window` so the surface is dropped first.
    gpu: GpuState,
    window: Arc<Window>,
    mouse: MouseState,
    settings: ViewPersonalizationSettings,
    feed: SettingsFeed,
    publisher: SettingsPublisher,
    effects: FrameEffects,
    fps_listener: Option<Sender<f64>>,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(
            window.as_ref(),
            window.inner_size(),
            config.power_preference,
        )?;
        let profile = gpu.adapter_profile();
        if profile.is_software() {
            warn!(
                adapter = %profile.name,
                backend = ?profile.backend,
                "software rasterizer detected; expect a low frame rate"
            );
        }

        let settings = config.initial_settings;
        let publisher = config.settings.publisher();
        Ok(Self {
            gpu,
            window,
            mouse: MouseState::default(),
            effects: FrameEffects::new(&settings, Instant::now()),
            settings,
            feed: config.settings,
            publisher,
            fps_listener: config.fps_listener,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub(crate) fn into_settings(self) -> ViewPersonalizationSettings {
        self.settings
    }

    fn set_pointer_target(&mut self, point: [f32; 2]) {
        let size = self.size();
        self.effects
            .curtains
            .set_pointer_target(point, [size.width as f32, size.height as f32]);
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let Some(action) = KeyAction::from_key(&event.logical_key) else {
            return;
        };
        let next = settings_after_key(&mut self.settings, &self.feed, action);
        debug!(?action, style = ?next.background.style, halo = next.halo.is_visible, "key action");
        self.publisher.publish(next);
    }

    fn handle_touch(&mut self, touch: Touch) {
        if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
            self.set_pointer_target(to_point(touch.location));
        }
    }

    pub(crate) fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        if let Some(latest) = self.feed.latest() {
            self.settings = latest;
        }

        let now = Instant::now();
        let size = self.size();
        let gpu = &self.gpu;
        let (output, frame) = self
            .effects
            .prepare(|| gpu.acquire(), now, &self.settings, size)?;
        gpu.present(output, &frame);

        if let Some(fps) = self.effects.curtains.frame_presented(now) {
            debug!(
                fps = fps.round(),
                transitioning = self.effects.curtains.is_transitioning(),
                halo = self.settings.halo.is_visible,
                "render stats"
            );
            if let Some(listener) = self.fps_listener.as_ref() {
                if listener.send(fps).is_err() {
                    self.fps_listener = None;
                }
            }
        }
        Ok(())
    }
}

/// Runs the preview window on the calling thread until it is closed and
/// returns the settings in effect at that point.
pub(crate) fn run_window(config: RendererConfig) -> Result<ViewPersonalizationSettings> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, config)?;
    info!(
        width = state.size().width,
        height = state.size().height,
        "preview window ready"
    );
    state.window().request_redraw();

    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if matches!(event.logical_key, Key::Named(NamedKey::Escape)) {
                        elwt.exit();
                    } else {
                        state.handle_key(&event);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if let Some(point) = state.mouse.handle_cursor_moved(position) {
                        state.set_pointer_target(point);
                    }
                }
                WindowEvent::MouseInput {
                    state: button_state,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Some(point) = state.mouse.handle_button(button_state) {
                        state.set_pointer_target(point);
                    }
                }
                WindowEvent::Touch(touch) => state.handle_touch(touch),
                WindowEvent::Resized(new_size) => state.resize(new_size),
                WindowEvent::ScaleFactorChanged {
                    mut inner_size_writer,
                    ..
                } => {
                    let _ = inner_size_writer.request_inner_size(state.size());
                }
                WindowEvent::RedrawRequested => match state.render_frame() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        debug!("surface lost or outdated; reconfiguring");
                        state.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        warn!("surface out of memory; exiting preview");
                        elwt.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        debug!("surface timeout; skipping frame");
                    }
                    Err(other) => {
                        warn!(error = ?other, "surface error; skipping frame");
                    }
                },
                _ => {}
            }
        }
        Event::AboutToWait => {
            state.window().request_redraw();
            elwt.set_control_flow(ControlFlow::Wait);
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))?;
    Ok(state.into_settings())
}
