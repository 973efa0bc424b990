use bytemuck::{Pod, Zeroable};

/// CPU mirror of the curtains uniform block (`CurtainsParams` in the GLSL
/// prelude). Field order and padding follow std140.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurtainsUniforms {
    pub from_top: [f32; 4],
    pub from_bottom: [f32; 4],
    pub from_glow: [f32; 4],
    pub to_top: [f32; 4],
    pub to_bottom: [f32; 4],
    pub to_glow: [f32; 4],
    pub touch: [f32; 2],
    pub time: f32,
    pub progress: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub wave_speed: f32,
    pub touch_glow_radius: f32,
    pub touch_glow_intensity: f32,
    pub soft_glow_enabled: f32,
    pub padding: [f32; 2],
}

unsafe impl Zeroable for CurtainsUniforms {}
unsafe impl Pod for CurtainsUniforms {}

/// CPU mirror of the halo uniform block (`HaloParams`). Geometry is in units
/// of the smaller surface dimension.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloUniforms {
    pub time: f32,
    pub padding0: f32,
    pub view_size: [f32; 2],
    pub corner_radius: f32,
    pub edge_inset: f32,
    pub core_width: f32,
    pub glow_width: f32,
    pub mist_width: f32,
    pub halo_strength: f32,
    pub pulse_base: f32,
    pub pulse_amount: f32,
    pub pulse_speed: f32,
    pub color_shift_speed: f32,
    pub wave_inset: f32,
    pub wave_amplitude: f32,
    pub wave_count: f32,
    pub wave_speed_multiplier: f32,
    pub wave_speed_offset: f32,
    pub padding1: f32,
}

unsafe impl Zeroable for HaloUniforms {}
unsafe impl Pod for HaloUniforms {}

/// Everything the GPU side needs for one displayed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub curtains: CurtainsUniforms,
    /// Surface clear colour, tracking the sampled palette.
    pub clear_color: [f32; 4],
    /// `None` when the halo layer is hidden and must not be drawn.
    pub halo: Option<HaloUniforms>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    /// Sanity-checks that the CPU mirrors match the layouts baked into the
    /// GLSL uniform blocks.
    #[test]
    fn curtains_uniforms_follow_std140_layout() {
        let uniforms = CurtainsUniforms::zeroed();
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<CurtainsUniforms>(), 16);
        assert_eq!(size_of::<CurtainsUniforms>(), 144);
        assert_eq!((&uniforms.from_top as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.to_glow as *const _ as usize) - base, 80);
        assert_eq!((&uniforms.touch as *const _ as usize) - base, 96);
        assert_eq!((&uniforms.time as *const _ as usize) - base, 104);
        assert_eq!((&uniforms.progress as *const _ as usize) - base, 108);
        assert_eq!((&uniforms.wave_amplitude as *const _ as usize) - base, 112);
        assert_eq!(
            (&uniforms.touch_glow_intensity as *const _ as usize) - base,
            128
        );
        assert_eq!((&uniforms.soft_glow_enabled as *const _ as usize) - base, 132);
    }

    #[test]
    fn halo_uniforms_follow_std140_layout() {
        let uniforms = HaloUniforms::zeroed();
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<HaloUniforms>(), 16);
        assert_eq!(size_of::<HaloUniforms>(), 80);
        assert_eq!((&uniforms.view_size as *const _ as usize) - base, 8);
        assert_eq!((&uniforms.corner_radius as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.mist_width as *const _ as usize) - base, 32);
        assert_eq!((&uniforms.pulse_speed as *const _ as usize) - base, 48);
        assert_eq!((&uniforms.wave_inset as *const _ as usize) - base, 56);
        assert_eq!((&uniforms.wave_count as *const _ as usize) - base, 64);
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 80);
    }
}
