use std::f32::consts::TAU;
use std::time::Instant;

use personalization::HaloEffectSettings;

use super::{length, mix3, smoothstep, DIVISOR_EPSILON};
use crate::gpu::HaloUniforms;

/// Stops of the colour cycle, walked once per revolution.
pub const SPECTRUM: [[f32; 3]; 6] = [
    [0.18, 0.88, 1.00],
    [0.13, 0.53, 1.00],
    [0.70, 0.33, 1.00],
    [1.00, 0.40, 0.72],
    [1.00, 0.63, 0.36],
    [0.22, 0.92, 0.98],
];

const CORE_GAIN: f32 = 0.28;
const GLOW_GAIN: f32 = 0.26;
const MIST_GAIN: f32 = 0.16;

/// Pulsing, colour-cycling rounded-rectangle border.
///
/// Holds nothing but its epoch; all shape parameters come from the settings
/// snapshot handed to each frame.
pub struct HaloEffect {
    start: Instant,
}

impl HaloEffect {
    pub fn new(now: Instant) -> Self {
        Self { start: now }
    }

    /// A hidden halo is skipped entirely rather than drawn transparent.
    pub fn is_visible(settings: &HaloEffectSettings) -> bool {
        settings.is_visible
    }

    /// Uniforms for `now`, or `None` when the layer should not be drawn.
    pub fn frame(
        &self,
        now: Instant,
        settings: &HaloEffectSettings,
        surface: (u32, u32),
    ) -> Option<HaloUniforms> {
        Self::is_visible(settings).then(|| self.compute_frame_uniforms(now, settings, surface))
    }

    /// Normalises point-unit geometry by the smaller surface dimension and
    /// passes the shading scalars through.
    pub fn compute_frame_uniforms(
        &self,
        now: Instant,
        settings: &HaloEffectSettings,
        surface: (u32, u32),
    ) -> HaloUniforms {
        let (width, height) = surface;
        let unit = (width.min(height) as f32).max(1.0);
        let norm = |points: f64| points as f32 / unit;

        HaloUniforms {
            time: now.saturating_duration_since(self.start).as_secs_f32(),
            padding0: 0.0,
            view_size: [width as f32, height as f32],
            corner_radius: norm(settings.corner_radius),
            edge_inset: norm(settings.edge_inset),
            core_width: norm(settings.core_width),
            glow_width: norm(settings.glow_width),
            mist_width: norm(settings.mist_width),
            halo_strength: settings.halo_strength as f32,
            pulse_base: settings.pulse_base as f32,
            pulse_amount: settings.pulse_amount as f32,
            pulse_speed: settings.pulse_speed as f32,
            color_shift_speed: settings.color_shift_speed as f32,
            wave_inset: norm(settings.wave_inset_pixels),
            wave_amplitude: norm(settings.wave_amplitude_pixels),
            wave_count: settings.wave_count as f32,
            wave_speed_multiplier: settings.wave_speed_multiplier as f32,
            wave_speed_offset: settings.wave_speed_offset as f32,
            padding1: 0.0,
        }
    }
}

/// Signed distance from `p` to a rounded box centred on the origin.
pub fn rounded_box_sdf(p: [f32; 2], half_size: [f32; 2], radius: f32) -> f32 {
    let qx = p[0].abs() - (half_size[0] - radius);
    let qy = p[1].abs() - (half_size[1] - radius);
    length([qx.max(0.0), qy.max(0.0)]) + qx.max(qy).min(0.0) - radius
}

/// Piecewise-linear walk through [`SPECTRUM`]; only `fract(t)` matters.
pub fn spectrum(t: f32) -> [f32; 3] {
    let u = t.rem_euclid(1.0) * 5.0;
    let segment = (u.floor() as usize).min(4);
    let f = u - segment as f32;
    mix3(SPECTRUM[segment], SPECTRUM[segment + 1], f)
}

fn band(distance: f32, width: f32) -> f32 {
    let x = distance / width.max(DIVISOR_EPSILON);
    (-(x * x)).exp()
}

/// CPU rendition of the halo fragment program. Returns premultiplied RGBA.
pub fn shade(uv: [f32; 2], uniforms: &HaloUniforms) -> [f32; 4] {
    let aspect = (uniforms.view_size[0] / uniforms.view_size[1].max(1.0)).max(0.001);
    let p = [(uv[0] - 0.5) * aspect, uv[1] - 0.5];
    let angle = p[1].atan2(p[0]);

    let wave_phase = angle * uniforms.wave_count
        - uniforms.time
            * (uniforms.pulse_speed * uniforms.wave_speed_multiplier + uniforms.wave_speed_offset);
    let inset = uniforms.edge_inset
        + uniforms.wave_inset
        + uniforms.wave_amplitude * (0.5 + 0.5 * wave_phase.sin());
    let half_size = [0.5 * aspect - inset, 0.5 - inset];
    let d = rounded_box_sdf(p, half_size, uniforms.corner_radius);

    let hue = spectrum(angle / TAU + 0.5 + uniforms.time * uniforms.color_shift_speed);

    let pulse = uniforms.pulse_base + uniforms.pulse_amount * (uniforms.time * uniforms.pulse_speed).sin();
    let core = band(d, uniforms.core_width) * CORE_GAIN;
    let mid = band(d, uniforms.glow_width) * GLOW_GAIN * pulse;
    let mist = band(d, uniforms.mist_width) * MIST_GAIN * pulse;

    let inner_fade = if d >= 0.0 {
        1.0
    } else {
        smoothstep(-uniforms.mist_width, 0.0, d)
    };
    let alpha = ((core + mid + mist) * inner_fade * uniforms.halo_strength).clamp(0.0, 1.0);

    [hue[0] * alpha, hue[1] * alpha, hue[2] * alpha, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_settings() -> HaloEffectSettings {
        HaloEffectSettings {
            wave_inset_pixels: 0.0,
            wave_amplitude_pixels: 0.0,
            ..HaloEffectSettings::default()
        }
    }

    #[test]
    fn geometry_is_normalised_by_smaller_dimension() {
        let settings = HaloEffectSettings {
            corner_radius: 88.0,
            edge_inset: 2.0,
            ..HaloEffectSettings::default()
        };
        let start = Instant::now();
        let halo = HaloEffect::new(start);

        let small = halo.compute_frame_uniforms(start, &settings, (1000, 1000));
        assert!((small.corner_radius - 0.088).abs() < 1e-6);
        assert!((small.edge_inset - 0.002).abs() < 1e-6);

        let large = halo.compute_frame_uniforms(start, &settings, (2000, 2000));
        assert!((large.corner_radius - small.corner_radius * 0.5).abs() < 1e-6);
        assert!((large.edge_inset - small.edge_inset * 0.5).abs() < 1e-6);

        let wide = halo.compute_frame_uniforms(start, &settings, (3000, 1000));
        assert_eq!(wide.corner_radius, small.corner_radius);
        assert_eq!(wide.view_size, [3000.0, 1000.0]);
    }

    #[test]
    fn zero_surface_is_guarded() {
        let start = Instant::now();
        let halo = HaloEffect::new(start);
        let uniforms = halo.compute_frame_uniforms(start, &HaloEffectSettings::default(), (0, 0));
        assert_eq!(uniforms.corner_radius, 88.0);
        let color = shade([0.5, 0.5], &uniforms);
        assert!(color.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn hidden_halo_yields_no_frame() {
        let start = Instant::now();
        let halo = HaloEffect::new(start);
        let mut settings = HaloEffectSettings::default();
        assert!(halo.frame(start, &settings, (800, 600)).is_some());
        settings.is_visible = false;
        assert!(!HaloEffect::is_visible(&settings));
        assert!(halo.frame(start, &settings, (800, 600)).is_none());
    }

    #[test]
    fn rounded_box_sdf_signs() {
        let half = [0.5, 0.5];
        assert!((rounded_box_sdf([0.0, 0.0], half, 0.1) + 0.5).abs() < 1e-6);
        assert!(rounded_box_sdf([0.5, 0.0], half, 0.1).abs() < 1e-6);
        assert!((rounded_box_sdf([0.7, 0.0], half, 0.1) - 0.2).abs() < 1e-6);

        // The corner is rounded: the box corner point lies outside the path.
        let corner = rounded_box_sdf([0.5, 0.5], half, 0.1);
        assert!((corner - (0.1 * std::f32::consts::SQRT_2 - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn spectrum_hits_stops_and_wraps() {
        assert_eq!(spectrum(0.0), SPECTRUM[0]);
        assert_eq!(spectrum(1.0), SPECTRUM[0]);
        assert_eq!(spectrum(-1.0), SPECTRUM[0]);
        let second = spectrum(0.2);
        for (got, want) in second.iter().zip(SPECTRUM[1].iter()) {
            assert!((got - want).abs() < 1e-5);
        }
        let between = spectrum(0.1);
        assert!((between[0] - (SPECTRUM[0][0] + SPECTRUM[1][0]) * 0.5).abs() < 1e-5);
        let end = spectrum(0.9999);
        assert!((end[2] - SPECTRUM[5][2]).abs() < 1e-2);
    }

    #[test]
    fn output_is_premultiplied_and_bright_on_the_border() {
        let start = Instant::now();
        let halo = HaloEffect::new(start);
        let uniforms = halo.compute_frame_uniforms(start, &flat_settings(), (1000, 1000));

        let border_x = 1.0 - uniforms.edge_inset;
        let on_border = shade([border_x, 0.5], &uniforms);
        let centre = shade([0.5, 0.5], &uniforms);

        assert!(on_border[3] > 0.5);
        assert!(centre[3] < 1e-3);
        for channel in &on_border[..3] {
            assert!(*channel <= on_border[3] + 1e-6);
        }
    }

    #[test]
    fn alpha_is_clamped_for_large_strength() {
        let settings = HaloEffectSettings {
            halo_strength: 50.0,
            ..flat_settings()
        };
        let start = Instant::now();
        let halo = HaloEffect::new(start);
        let uniforms = halo.compute_frame_uniforms(start, &settings, (1000, 1000));
        let color = shade([1.0 - uniforms.edge_inset, 0.5], &uniforms);
        assert_eq!(color[3], 1.0);
    }

    #[test]
    fn zero_widths_do_not_produce_nan() {
        let settings = HaloEffectSettings {
            core_width: 0.0,
            glow_width: 0.0,
            mist_width: 0.0,
            corner_radius: 0.0,
            ..HaloEffectSettings::default()
        };
        let start = Instant::now();
        let halo = HaloEffect::new(start);
        let uniforms = halo.compute_frame_uniforms(start, &settings, (640, 480));
        for y in 0..=8 {
            for x in 0..=8 {
                let color = shade([x as f32 / 8.0, y as f32 / 8.0], &uniforms);
                assert!(color.iter().all(|c| c.is_finite()));
            }
        }
    }

    #[test]
    fn wave_pulls_border_inward() {
        let start = Instant::now();
        let halo = HaloEffect::new(start);
        let flat = halo.compute_frame_uniforms(start, &flat_settings(), (1000, 1000));
        let waved = halo.compute_frame_uniforms(start, &HaloEffectSettings::default(), (1000, 1000));

        let probe = [1.0 - flat.edge_inset, 0.5];
        assert!(shade(probe, &waved)[3] < shade(probe, &flat)[3]);
    }
}
