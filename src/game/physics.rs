//! Physics body - axis-separated movement and collision resolution
//!
//! The shared physics state composed into both the player and enemies.
//! Resolution is deliberately axis-separated: the horizontal component is
//! applied and resolved fully before the vertical one. That ordering (X
//! before Y) avoids tunneling through corners and keeps tie-breaks
//! trivial, and must not change.

use macroquad::prelude::{vec2, Rect, Vec2};

use super::animation::{ActionState, AnimState, AnimationSet, EntityKind};
use super::tilemap::Tilemap;

/// Downward acceleration per frame (fixed-timestep units).
pub const GRAVITY: f32 = 0.1;
/// Terminal fall speed in pixels per frame.
pub const TERMINAL_VELOCITY: f32 = 5.0;

/// Strict AABB overlap: touching edges do not collide. A body resting
/// flush on the floor must not register in the horizontal pass.
pub fn rects_collide(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Which sides touched a solid tile this frame. Recomputed from scratch
/// every update, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Position, velocity and animation state shared by every physics entity.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: EntityKind,
    /// Top-left corner, sub-pixel precision for fractional velocities.
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub collisions: Touching,
    /// Facing: true = left.
    pub flip: bool,
    pub action: ActionState,
    pub anim: AnimState,
    /// Per-frame sprite offset relative to the physics rect.
    pub anim_offset: Vec2,
}

impl Body {
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2, animations: &AnimationSet) -> Self {
        Self {
            kind,
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: Touching::default(),
            flip: false,
            action: ActionState::Idle,
            anim: AnimState::new(animations.get(kind, ActionState::Idle)),
            anim_offset: Vec2::ZERO,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Switch action state. Re-selecting the current state is a no-op so
    /// repeated idle frames don't restart the animation.
    pub fn set_action(&mut self, action: ActionState, animations: &AnimationSet) {
        if action != self.action {
            self.action = action;
            self.anim = AnimState::new(animations.get(self.kind, action));
        }
    }

    /// Advance one frame: apply the requested movement plus internal
    /// velocity, resolve tile collisions per axis, integrate gravity,
    /// tick the animation.
    pub fn update(&mut self, tilemap: &Tilemap, movement: Vec2) {
        self.collisions = Touching::default();

        let frame_movement = movement + self.velocity;

        // Horizontal pass
        self.pos.x += frame_movement.x;
        let mut entity_rect = self.rect();
        for tile_rect in tilemap.physics_rects_around(self.pos) {
            if rects_collide(&entity_rect, &tile_rect) {
                if frame_movement.x > 0.0 {
                    entity_rect.x = tile_rect.x - entity_rect.w;
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    entity_rect.x = tile_rect.x + tile_rect.w;
                    self.collisions.left = true;
                }
                self.pos.x = entity_rect.x;
            }
        }

        // Vertical pass
        self.pos.y += frame_movement.y;
        let mut entity_rect = self.rect();
        for tile_rect in tilemap.physics_rects_around(self.pos) {
            if rects_collide(&entity_rect, &tile_rect) {
                if frame_movement.y > 0.0 {
                    entity_rect.y = tile_rect.y - entity_rect.h;
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    entity_rect.y = tile_rect.y + tile_rect.h;
                    self.collisions.up = true;
                }
                self.pos.y = entity_rect.y;
            }
        }

        // Facing follows the requested movement only, not total velocity
        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }

        self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
        if self.collisions.down || self.collisions.up {
            self.velocity.y = 0.0;
        }

        self.anim.tick();
    }

    /// Where the current sprite frame should be drawn for a given camera
    /// scroll.
    pub fn draw_pos(&self, render_scroll: Vec2) -> Vec2 {
        self.pos - render_scroll + self.anim_offset
    }
}

pub fn polar(angle: f32, magnitude: f32) -> Vec2 {
    vec2(angle.cos() * magnitude, angle.sin() * magnitude)
}
