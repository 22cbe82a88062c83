//! Spark particles
//!
//! Short-lived radial bursts spawned on kills and deaths. A spark is a
//! pure value: position, heading, speed. Speed decays by a fixed factor
//! per frame and the spark dies once it drops below epsilon. Palette
//! choice at render time is cosmetic only and has no bearing on physics.

use macroquad::prelude::{draw_triangle, Color, Vec2};
use macroquad::rand::gen_range;

use super::physics::polar;

/// Multiplicative speed decay per frame.
pub const SPARK_DECAY: f32 = 0.95;
/// A spark below this speed is removed.
pub const SPARK_EPSILON: f32 = 0.1;

/// Colors sampled (with replacement) per spark per frame while the
/// player is alive...
pub const ALIVE_PALETTE: [Color; 3] = [
    Color::new(1.0, 1.0, 1.0, 1.0),
    Color::new(1.0, 0.85, 0.45, 1.0),
    Color::new(1.0, 0.55, 0.20, 1.0),
];
/// ...and while the death transition is running.
pub const DEAD_PALETTE: [Color; 3] = [
    Color::new(0.85, 0.15, 0.15, 1.0),
    Color::new(0.55, 0.05, 0.10, 1.0),
    Color::new(0.30, 0.30, 0.35, 1.0),
];

#[derive(Debug, Clone, Copy)]
pub struct Spark {
    pub pos: Vec2,
    /// Heading in radians.
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Advance one frame. Returns whether the spark is still alive.
    pub fn update(&mut self) -> bool {
        self.pos += polar(self.angle, self.speed);
        self.speed *= SPARK_DECAY;
        self.speed >= SPARK_EPSILON
    }

    /// Frames until a spark of the given speed dies (deterministic from
    /// the decay constants).
    pub fn lifetime(speed: f32) -> i32 {
        let mut s = speed;
        let mut frames = 0;
        while s >= SPARK_EPSILON {
            s *= SPARK_DECAY;
            frames += 1;
        }
        frames
    }

    /// Draw a small diamond oriented along the heading, scaled by the
    /// remaining speed.
    pub fn render(&self, render_scroll: Vec2, palette: &[Color]) {
        let p = self.pos - render_scroll;
        let nose = p + polar(self.angle, self.speed * 3.0);
        let tail = p - polar(self.angle, self.speed * 3.0);
        let wing_a = p + polar(self.angle + std::f32::consts::FRAC_PI_2, self.speed * 0.5);
        let wing_b = p - polar(self.angle + std::f32::consts::FRAC_PI_2, self.speed * 0.5);
        let color = palette[gen_range(0, palette.len())];
        draw_triangle(nose, wing_a, tail, color);
        draw_triangle(tail, wing_b, nose, color);
    }
}

/// Spawn a radial burst of sparks at a position.
pub fn spawn_burst(sparks: &mut Vec<Spark>, pos: Vec2, count: usize) {
    for _ in 0..count {
        let angle = gen_range(0.0, std::f32::consts::TAU);
        let speed = 2.0 + gen_range(0.0, 1.0);
        sparks.push(Spark::new(pos, angle, speed));
    }
}
