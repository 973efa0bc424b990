use std::time::{Duration, Instant};

use crate::palette::Palette;

/// Length of a palette cross-fade.
pub const PALETTE_TRANSITION: Duration = Duration::from_millis(450);

/// Smoothstep easing of linear progress, clamped to `[0, 1]`.
fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Cross-fades between two palettes.
///
/// `start == None` means the transition has settled and `from == to`.
#[derive(Debug, Clone)]
pub struct PaletteTransition {
    from: Palette,
    to: Palette,
    start: Option<Instant>,
    duration: Duration,
}

impl PaletteTransition {
    pub fn new(initial: Palette) -> Self {
        Self {
            from: initial,
            to: initial,
            start: None,
            duration: PALETTE_TRANSITION,
        }
    }

    pub fn destination(&self) -> &Palette {
        &self.to
    }

    pub fn origin(&self) -> &Palette {
        &self.from
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Starts fading toward `to` unless it already is the destination.
    ///
    /// The new fade starts from whatever is on screen at `now`, so retargeting
    /// mid-flight never pops. Returns whether a new fade was started.
    pub fn begin(&mut self, to: Palette, now: Instant) -> bool {
        if to == self.to {
            return false;
        }
        let (current, _) = self.sample(now);
        self.from = current;
        self.to = to;
        self.start = Some(now);
        true
    }

    /// Returns the blended palette and eased progress at `now`.
    ///
    /// Once the fade has run its course the state collapses to the settled
    /// form; repeated calls after that are pure reads.
    pub fn sample(&mut self, now: Instant) -> (Palette, f32) {
        let (linear, eased) = self.progress(now);
        if linear >= 1.0 {
            self.settle();
            return (self.to, 1.0);
        }
        (self.from.blend(&self.to, eased), eased)
    }

    /// Endpoints plus eased progress, for shaders that do the final mix
    /// themselves. Collapses the state the same way [`Self::sample`] does.
    pub fn endpoints(&mut self, now: Instant) -> (Palette, Palette, f32) {
        let (linear, eased) = self.progress(now);
        if linear >= 1.0 {
            self.settle();
            return (self.to, self.to, 1.0);
        }
        (self.from, self.to, eased)
    }

    fn progress(&self, now: Instant) -> (f32, f32) {
        let Some(start) = self.start else {
            return (1.0, 1.0);
        };
        let elapsed = now.saturating_duration_since(start);
        let linear = (elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON))
            .clamp(0.0, 1.0);
        (linear, ease(linear))
    }

    fn settle(&mut self) {
        self.from = self.to;
        self.start = None;
    }
}
