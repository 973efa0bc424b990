//! Per-frame parameter assembly for the two screen-space effects.
//!
//! Each effect turns wall-clock time plus the latest settings snapshot into
//! the uniform block its fragment program consumes. The `shade` functions in
//! the submodules are CPU mirrors of those programs and exist so the shading
//! models can be exercised without a GPU.

pub mod curtains;
pub mod halo;

/// Smallest divisor the shading math will use.
pub(crate) const DIVISOR_EPSILON: f32 = 0.0001;

/// GLSL `smoothstep` that tolerates coincident edges (and reversed ones).
pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() < DIVISOR_EPSILON {
        return if x < edge1 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub(crate) fn mix3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

pub(crate) fn rgb(color: [f32; 4]) -> [f32; 3] {
    [color[0], color[1], color[2]]
}

pub(crate) fn length(v: [f32; 2]) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}
