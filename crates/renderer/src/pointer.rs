/// Exponentially smoothed pointer position in UV space (origin bottom-left).
///
/// Input events only move the target; [`SmoothedPointer::advance`] walks the
/// current position a fixed fraction of the remaining distance each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPointer {
    current: [f32; 2],
    target: [f32; 2],
}

impl Default for SmoothedPointer {
    fn default() -> Self {
        Self::new([0.5, 0.5])
    }
}

impl SmoothedPointer {
    pub fn new(initial: [f32; 2]) -> Self {
        Self {
            current: initial,
            target: initial,
        }
    }

    pub fn current(&self) -> [f32; 2] {
        self.current
    }

    pub fn target(&self) -> [f32; 2] {
        self.target
    }

    /// Converts a surface point (origin top-left) into the UV target.
    ///
    /// Updates against an empty or negative surface are dropped.
    pub fn set_target(&mut self, point: [f32; 2], surface: [f32; 2]) {
        let [width, height] = surface;
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let u = (point[0] / width).clamp(0.0, 1.0);
        let v = (1.0 - point[1] / height).clamp(0.0, 1.0);
        if u.is_finite() && v.is_finite() {
            self.target = [u, v];
        }
    }

    /// Moves `factor` of the remaining distance toward the target.
    ///
    /// The factor is clamped to `[0, 1]` so the glow can never overshoot.
    pub fn advance(&mut self, factor: f32) {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            0.0
        };
        for axis in 0..2 {
            self.current[axis] += (self.target[axis] - self.current[axis]) * factor;
        }
    }
}
