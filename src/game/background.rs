//! Parallax background - stars and dust
//!
//! Depth-layered drifting sprites in an unbounded coordinate space.
//! Render position is the drifter position minus the camera scroll
//! scaled by depth, wrapped so each layer tiles infinitely. Spawned once
//! at game start, never destroyed.

use macroquad::prelude::{vec2, Vec2};
use macroquad::rand::gen_range;

/// One background sprite in unbounded scrolling space.
#[derive(Debug, Clone, Copy)]
pub struct Drifter {
    pub pos: Vec2,
    /// Which sprite image in the layer's set.
    pub image: usize,
    /// Per-frame drift applied to the position.
    pub drift: Vec2,
    /// Parallax factor in (0,1): smaller = farther away.
    pub depth: f32,
}

impl Drifter {
    pub fn update(&mut self) {
        self.pos += self.drift;
    }

    /// Screen position for a given camera scroll and wrap extents
    /// (view size plus sprite size), offset back by the sprite size so
    /// sprites slide in from every edge.
    pub fn wrapped_pos(&self, render_scroll: Vec2, view: Vec2, sprite: Vec2) -> Vec2 {
        let raw = self.pos - render_scroll * self.depth;
        vec2(
            raw.x.rem_euclid(view.x + sprite.x) - sprite.x,
            raw.y.rem_euclid(view.y + sprite.y) - sprite.y,
        )
    }
}

/// A parallax layer: a set of drifters sharing a sprite pool.
pub struct Layer {
    pub drifters: Vec<Drifter>,
}

impl Layer {
    /// Stars drift sideways only.
    pub fn stars(count: usize, image_count: usize) -> Self {
        Self::spawn(count, image_count, |speed| vec2(speed, 0.0))
    }

    /// Dust drifts slowly down-right.
    pub fn dust(count: usize, image_count: usize) -> Self {
        Self::spawn(count, image_count, |speed| vec2(speed, speed))
    }

    fn spawn(count: usize, image_count: usize, drift_of: impl Fn(f32) -> Vec2) -> Self {
        let mut drifters: Vec<Drifter> = (0..count)
            .map(|_| {
                let speed = gen_range(0.05, 0.1);
                Drifter {
                    pos: vec2(gen_range(0.0, 99999.0), gen_range(0.0, 99999.0)),
                    image: if image_count > 0 { gen_range(0, image_count) } else { 0 },
                    drift: drift_of(speed),
                    depth: gen_range(0.2, 0.8),
                }
            })
            .collect();
        // Far layers draw first
        drifters.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { drifters }
    }

    pub fn update(&mut self) {
        for drifter in &mut self.drifters {
            drifter.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_spawn_sorted_by_depth() {
        let layer = Layer::stars(32, 3);
        assert_eq!(layer.drifters.len(), 32);
        assert!(layer
            .drifters
            .windows(2)
            .all(|w| w[0].depth <= w[1].depth));
        assert!(layer.drifters.iter().all(|d| d.depth > 0.0 && d.depth < 1.0));
    }

    #[test]
    fn test_stars_drift_sideways_dust_drifts_both() {
        let mut stars = Layer::stars(4, 1);
        let before: Vec<Vec2> = stars.drifters.iter().map(|d| d.pos).collect();
        stars.update();
        for (b, d) in before.iter().zip(&stars.drifters) {
            assert!(d.pos.x > b.x);
            assert_eq!(d.pos.y, b.y);
        }

        let mut dust = Layer::dust(4, 1);
        let before = dust.drifters[0].pos;
        dust.update();
        let after = dust.drifters[0].pos;
        assert!(after.x > before.x && after.y > before.y);
    }

    #[test]
    fn test_wrapped_pos_stays_in_band() {
        let drifter = Drifter {
            pos: vec2(12345.0, -6789.0),
            image: 0,
            drift: Vec2::ZERO,
            depth: 0.5,
        };
        let view = vec2(320.0, 240.0);
        let sprite = vec2(8.0, 8.0);
        for scroll in [vec2(0.0, 0.0), vec2(5000.0, -300.0), vec2(-42.5, 9000.0)] {
            let p = drifter.wrapped_pos(scroll, view, sprite);
            assert!(p.x >= -sprite.x && p.x < view.x);
            assert!(p.y >= -sprite.y && p.y < view.y);
        }
    }

    #[test]
    fn test_deeper_drifters_parallax_more() {
        let near = Drifter { pos: vec2(100.0, 0.0), image: 0, drift: Vec2::ZERO, depth: 0.8 };
        let far = Drifter { pos: vec2(100.0, 0.0), image: 0, drift: Vec2::ZERO, depth: 0.2 };
        let view = vec2(320.0, 240.0);
        let sprite = vec2(8.0, 8.0);

        let at_rest_near = near.wrapped_pos(Vec2::ZERO, view, sprite);
        let at_rest_far = far.wrapped_pos(Vec2::ZERO, view, sprite);
        let moved_near = near.wrapped_pos(vec2(50.0, 0.0), view, sprite);
        let moved_far = far.wrapped_pos(vec2(50.0, 0.0), view, sprite);

        let shift_near = at_rest_near.x - moved_near.x;
        let shift_far = at_rest_far.x - moved_far.x;
        assert!((shift_near - 40.0).abs() < 1e-4);
        assert!((shift_far - 10.0).abs() < 1e-4);
    }
}
