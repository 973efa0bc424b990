use std::time::Instant;

use personalization::BackgroundEffectSettings;

use super::{length, mix3, rgb, smoothstep, DIVISOR_EPSILON};
use crate::fps::FrameRateMeter;
use crate::gpu::CurtainsUniforms;
use crate::palette::{PaletteSource, Rgba};
use crate::pointer::SmoothedPointer;
use crate::transition::PaletteTransition;

/// Output of one curtains frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurtainsFrame {
    pub uniforms: CurtainsUniforms,
    /// Clear colour of the palette actually on screen this frame.
    pub clear_color: Rgba,
    /// Whether this call started a new palette cross-fade.
    pub transition_started: bool,
}

/// Animated gradient background with a pointer-following glow.
pub struct CurtainsEffect {
    start: Instant,
    source: PaletteSource,
    transition: PaletteTransition,
    pointer: SmoothedPointer,
    meter: FrameRateMeter,
}

impl CurtainsEffect {
    pub fn new(settings: &BackgroundEffectSettings, now: Instant) -> Self {
        let source = PaletteSource::from_settings(settings);
        Self {
            start: now,
            source,
            transition: PaletteTransition::new(source.resolve()),
            pointer: SmoothedPointer::default(),
            meter: FrameRateMeter::new(now),
        }
    }

    pub fn palette_source(&self) -> PaletteSource {
        self.source
    }

    pub fn pointer(&self) -> &SmoothedPointer {
        &self.pointer
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    /// Moves the glow target. `point` is in surface pixels, origin top-left.
    pub fn set_pointer_target(&mut self, point: [f32; 2], surface: [f32; 2]) {
        self.pointer.set_target(point, surface);
    }

    /// Assembles the uniform block for the frame displayed at `now`.
    pub fn compute_frame_uniforms(
        &mut self,
        now: Instant,
        settings: &BackgroundEffectSettings,
    ) -> CurtainsFrame {
        let source = PaletteSource::from_settings(settings);
        let mut transition_started = false;
        if source != self.source {
            self.source = source;
            transition_started = self.transition.begin(source.resolve(), now);
        }

        self.pointer.advance(settings.touch_follow_speed as f32);

        let (from, to, progress) = self.transition.endpoints(now);
        let time = now.saturating_duration_since(self.start).as_secs_f32();

        let uniforms = CurtainsUniforms {
            from_top: from.top.to_array(),
            from_bottom: from.bottom.to_array(),
            from_glow: from.glow.to_array(),
            to_top: to.top.to_array(),
            to_bottom: to.bottom.to_array(),
            to_glow: to.glow.to_array(),
            touch: self.pointer.current(),
            time,
            progress,
            wave_amplitude: settings.wave_amplitude as f32,
            wave_frequency: settings.wave_frequency as f32,
            wave_speed: settings.wave_speed as f32,
            touch_glow_radius: settings.touch_glow_radius as f32,
            touch_glow_intensity: settings.touch_glow_intensity as f32,
            soft_glow_enabled: if settings.soft_glow_enabled { 1.0 } else { 0.0 },
            padding: [0.0; 2],
        };

        CurtainsFrame {
            uniforms,
            clear_color: from.clear.lerp(to.clear, progress),
            transition_started,
        }
    }

    /// Counts a presented frame; returns the averaged rate when a window closes.
    pub fn frame_presented(&mut self, now: Instant) -> Option<f64> {
        self.meter.tick(now)
    }
}

/// CPU rendition of the curtains fragment program. Returns linear RGB before
/// output clamping, like the GPU path.
pub fn shade(uv: [f32; 2], uniforms: &CurtainsUniforms) -> [f32; 3] {
    let p = uniforms.progress;
    let top = mix3(rgb(uniforms.from_top), rgb(uniforms.to_top), p);
    let bottom = mix3(rgb(uniforms.from_bottom), rgb(uniforms.to_bottom), p);
    let glow_color = mix3(rgb(uniforms.from_glow), rgb(uniforms.to_glow), p);

    let wave = uniforms.wave_amplitude
        * ((uv[0] + uniforms.time * uniforms.wave_speed) * uniforms.wave_frequency).sin();
    let t = (uv[1] + wave).clamp(0.0, 1.0);
    let base = mix3(bottom, top, t);

    let offset = [uv[0] - uniforms.touch[0], uv[1] - uniforms.touch[1]];
    let radius = uniforms.touch_glow_radius.max(DIVISOR_EPSILON);
    let glow = smoothstep(radius, 0.0, length(offset))
        * uniforms.touch_glow_intensity
        * uniforms.soft_glow_enabled;

    [
        base[0] + glow_color[0] * glow,
        base[1] + glow_color[1] * glow,
        base[2] + glow_color[2] * glow,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::transition::PALETTE_TRANSITION;
    use personalization::{BackgroundStyle, RgbaColor};
    use std::time::Duration;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn settled_frame_carries_identical_endpoints() {
        let settings = BackgroundEffectSettings::default();
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        let frame = effect.compute_frame_uniforms(start + Duration::from_millis(16), &settings);

        assert!(!frame.transition_started);
        assert_eq!(frame.uniforms.progress, 1.0);
        assert_eq!(frame.uniforms.from_top, frame.uniforms.to_top);
        assert!((frame.uniforms.time - 0.016).abs() < 1e-4);
        assert_eq!(frame.uniforms.soft_glow_enabled, 1.0);

        let expected = Palette::from_base_color(settings.custom_color.into());
        assert_eq!(frame.clear_color, expected.clear);
    }

    #[test]
    fn style_change_starts_one_transition_and_clear_tracks_it() {
        let mut settings = BackgroundEffectSettings {
            style: Some(BackgroundStyle::DeepBlue),
            ..BackgroundEffectSettings::default()
        };
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        let blue = Palette::from_style(BackgroundStyle::DeepBlue);
        let red = Palette::from_style(BackgroundStyle::DeepRed);

        settings.style = Some(BackgroundStyle::DeepRed);
        let first = effect.compute_frame_uniforms(start, &settings);
        assert!(first.transition_started);
        assert_eq!(first.uniforms.progress, 0.0);
        assert_eq!(first.clear_color, blue.clear);

        let mid = effect.compute_frame_uniforms(start + PALETTE_TRANSITION / 2, &settings);
        assert!(!mid.transition_started);
        assert!((mid.uniforms.progress - 0.5).abs() < 1e-3);
        assert!((mid.clear_color.r - (blue.clear.r + red.clear.r) * 0.5).abs() < 1e-3);
        assert_eq!(mid.uniforms.from_top, blue.top.to_array());
        assert_eq!(mid.uniforms.to_top, red.top.to_array());

        let done = effect.compute_frame_uniforms(start + PALETTE_TRANSITION, &settings);
        assert_eq!(done.uniforms.progress, 1.0);
        assert_eq!(done.clear_color, red.clear);
        assert!(!effect.is_transitioning());
    }

    #[test]
    fn custom_color_changes_fade_too() {
        let mut settings = BackgroundEffectSettings::default();
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);

        settings.custom_color = RgbaColor::new(0.9, 0.2, 0.1, 1.0);
        let frame = effect.compute_frame_uniforms(start, &settings);
        assert!(frame.transition_started);
        assert!(effect.is_transitioning());
    }

    #[test]
    fn pointer_advances_by_follow_speed() {
        let settings = BackgroundEffectSettings::default();
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        effect.set_pointer_target([100.0, 200.0], [400.0, 800.0]);

        let frame = effect.compute_frame_uniforms(start, &settings);
        assert!((frame.uniforms.touch[0] - 0.4875).abs() < 1e-6);
        assert!((frame.uniforms.touch[1] - 0.5125).abs() < 1e-6);
    }

    #[test]
    fn shade_mixes_bottom_to_top_without_wave_or_glow() {
        let settings = BackgroundEffectSettings {
            wave_amplitude: 0.0,
            soft_glow_enabled: false,
            ..BackgroundEffectSettings::default()
        };
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        let uniforms = effect.compute_frame_uniforms(start, &settings).uniforms;

        let palette = Palette::from_base_color(settings.custom_color.into());
        let bottom = rgb(palette.bottom.to_array());
        let top = rgb(palette.top.to_array());
        assert!(close(shade([0.3, 0.0], &uniforms), bottom));
        assert!(close(shade([0.3, 1.0], &uniforms), top));
        assert!(close(shade([0.7, 0.5], &uniforms), mix3(bottom, top, 0.5)));
    }

    #[test]
    fn glow_peaks_at_pointer_and_vanishes_outside_radius() {
        let settings = BackgroundEffectSettings {
            wave_amplitude: 0.0,
            ..BackgroundEffectSettings::default()
        };
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        let uniforms = effect.compute_frame_uniforms(start, &settings).uniforms;

        let palette = Palette::from_base_color(settings.custom_color.into());
        let base = mix3(
            rgb(palette.bottom.to_array()),
            rgb(palette.top.to_array()),
            0.5,
        );
        let at_pointer = shade([0.5, 0.5], &uniforms);
        let glow = rgb(palette.glow.to_array());
        let expected = [base[0] + glow[0], base[1] + glow[1], base[2] + glow[2]];
        assert!(close(at_pointer, expected));

        let far = shade([0.5 + 0.36, 0.5], &uniforms);
        let far_base = mix3(
            rgb(palette.bottom.to_array()),
            rgb(palette.top.to_array()),
            0.5,
        );
        assert!(close(far, far_base));
    }

    #[test]
    fn degenerate_tunables_stay_finite() {
        let settings = BackgroundEffectSettings {
            wave_amplitude: -3.0,
            wave_frequency: 0.0,
            wave_speed: -1.0,
            touch_glow_radius: 0.0,
            touch_glow_intensity: -2.0,
            touch_follow_speed: 7.0,
            ..BackgroundEffectSettings::default()
        };
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        let uniforms = effect
            .compute_frame_uniforms(start + Duration::from_secs(3), &settings)
            .uniforms;
        for y in 0..=4 {
            for x in 0..=4 {
                let color = shade([x as f32 / 4.0, y as f32 / 4.0], &uniforms);
                assert!(color.iter().all(|c| c.is_finite()));
            }
        }
    }

    #[test]
    fn frame_presented_reports_after_window() {
        let settings = BackgroundEffectSettings::default();
        let start = Instant::now();
        let mut effect = CurtainsEffect::new(&settings, start);
        assert_eq!(effect.frame_presented(start + Duration::from_millis(100)), None);
        let fps = effect
            .frame_presented(start + Duration::from_millis(500))
            .expect("report");
        assert!((fps - 4.0).abs() < 1e-9);
    }
}
