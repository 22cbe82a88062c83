//! Camera scroll and screenshake
//!
//! The scroll chases the player's screen-center target by a constant
//! fraction of the remaining distance per frame - a single-pole filter
//! that never quite reaches the target, by design, for smooth follow.
//! Screenshake is a decaying scalar whose only effect is a fresh random
//! pixel offset on the final composite each frame.

use macroquad::prelude::{vec2, Vec2};
use macroquad::rand::gen_range;

/// Fraction of the remaining distance covered per frame.
pub const FOLLOW_RATE: f32 = 1.0 / 30.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub scroll: Vec2,
    pub screenshake: i32,
}

impl Camera {
    pub fn new() -> Self {
        Self { scroll: Vec2::ZERO, screenshake: 0 }
    }

    /// Decay the shake scalar; call once at the top of every frame.
    pub fn decay_screenshake(&mut self) {
        self.screenshake = (self.screenshake - 1).max(0);
    }

    /// Raise the shake scalar to at least `floor`. Never additive.
    pub fn raise_screenshake(&mut self, floor: i32) {
        self.screenshake = self.screenshake.max(floor);
    }

    /// Move the scroll toward centering `target` in a viewport of `view`.
    pub fn follow(&mut self, target: Vec2, view: Vec2) {
        self.scroll += (target - view / 2.0 - self.scroll) * FOLLOW_RATE;
    }

    /// Scroll truncated to integer pixels; all render calls use this so
    /// parallax layers stay stable against sub-pixel jitter.
    pub fn render_scroll(&self) -> Vec2 {
        vec2(self.scroll.x.trunc(), self.scroll.y.trunc())
    }

    /// Fresh random offset bounded by the current shake scalar,
    /// recomputed every frame rather than integrated.
    pub fn shake_offset(&self) -> Vec2 {
        if self.screenshake <= 0 {
            return Vec2::ZERO;
        }
        let s = self.screenshake as f32;
        vec2(gen_range(0.0, s) - s / 2.0, gen_range(0.0, s) - s / 2.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
