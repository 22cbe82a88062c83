//! Player controller
//!
//! A state machine layered on the shared physics body: jump/double-jump,
//! rope climbing (gravity override), shooting with a forward-projected
//! hitbox, and the airborne death condition. Death sequencing (counter,
//! wipe, reload) lives in the scene; the player only raises the event.

use macroquad::prelude::{vec2, Rect, Vec2};

use super::animation::{ActionState, AnimationSet, EntityKind};
use super::enemy::Enemy;
use super::events::{FrameEvents, SoundId};
use super::physics::{rects_collide, Body};
use super::tilemap::{Tile, TileKind, Tilemap};

/// Frames airborne before the fall kills the player.
pub const FALL_DEATH_FRAMES: i32 = 200;
/// Frames airborne before the camera starts warning-shaking.
pub const FALL_WARNING_FRAMES: i32 = 120;
/// Frames airborne before the jump animation takes over.
pub const AIRBORNE_FRAMES: i32 = 4;
/// Vertical impulse applied by a jump.
pub const JUMP_IMPULSE: f32 = -3.0;
/// `air_time` sentinel set by a successful jump, past `AIRBORNE_FRAMES`
/// so the jump animation starts immediately.
pub const JUST_JUMPED: i32 = 5;

pub const PLAYER_SIZE: Vec2 = vec2(6.0, 11.0);

/// The forward-facing attack hitbox. Recomputed from the player every
/// frame; no independent lifecycle.
#[derive(Debug, Clone, Copy)]
pub struct Weapon {
    pub hitbox_size: Vec2,
}

impl Weapon {
    pub fn new() -> Self {
        // Deliberately much wider than the player: the attack acts as a
        // forward beam, not a melee swing.
        Self { hitbox_size: vec2(100.0, 10.0) }
    }

    /// The hitbox with its near edge touching the given body's facing
    /// side.
    pub fn hitbox(&self, body: &Body) -> Rect {
        let x = if body.flip {
            body.pos.x - self.hitbox_size.x
        } else {
            body.pos.x + body.size.x
        };
        Rect::new(x, body.pos.y, self.hitbox_size.x, self.hitbox_size.y)
    }
}

pub struct Player {
    pub body: Body,
    pub weapon: Weapon,
    /// Frames since last ground contact.
    pub air_time: i32,
    /// Extra jumps left; refilled on landing.
    pub jumps: u8,
    /// Attack intent, held between attack-down and attack-up.
    pub shooting: bool,
    /// Gravity override: false only while attached to a rope.
    pub gravity: bool,
    /// Raised while the body center overlaps a rope tile; cleared the
    /// frame it no longer does.
    pub on_rope: bool,
    pub rope_anchor: Option<Tile>,
}

impl Player {
    pub fn new(pos: Vec2, animations: &AnimationSet) -> Self {
        Self {
            body: Body::new(EntityKind::Player, pos, PLAYER_SIZE, animations),
            weapon: Weapon::new(),
            air_time: 0,
            jumps: 1,
            shooting: false,
            gravity: true,
            on_rope: false,
            rope_anchor: None,
        }
    }

    /// Is the attack hitbox live this frame?
    pub fn is_attacking(&self) -> bool {
        self.body.action == ActionState::Shoot
    }

    /// Current attack hitbox (valid whenever `is_attacking`).
    pub fn attack_hitbox(&self) -> Rect {
        self.weapon.hitbox(&self.body)
    }

    /// Attempt a jump. Returns whether one happened so the caller knows
    /// whether to play a jump effect. Never raises on exhausted jumps.
    pub fn jump(&mut self) -> bool {
        if !self.gravity {
            // Jumping off a rope restores gravity
            self.gravity = true;
            self.body.velocity.y = JUMP_IMPULSE;
            self.air_time = JUST_JUMPED;
            return true;
        }
        if self.jumps > 0 {
            self.jumps -= 1;
            self.body.velocity.y = JUMP_IMPULSE;
            self.air_time = JUST_JUMPED;
            return true;
        }
        false
    }

    pub fn set_shooting(&mut self, value: bool) {
        self.shooting = value;
    }

    /// Advance one frame. `movement` is the intent vector the scene
    /// built (horizontal normally, vertical while rope-climbing);
    /// `enemies` is read for the contact-death test only.
    pub fn update(
        &mut self,
        tilemap: &Tilemap,
        movement: Vec2,
        enemies: &[Enemy],
        animations: &AnimationSet,
        events: &mut FrameEvents,
    ) {
        self.body.anim_offset = Vec2::ZERO;

        // Muzzle feedback is keyed to specific ticks of the shoot
        // animation, before the tick advances below.
        if self.body.action == ActionState::Shoot
            && matches!(self.body.anim.ticks(), 2 | 10)
        {
            events.raise_screenshake(10);
            events.play_sound(SoundId::Shoot);
        }

        self.body.update(tilemap, movement);

        self.air_time += 1;

        if self.gravity {
            if self.air_time > FALL_DEATH_FRAMES {
                events.raise_screenshake(32);
                events.kill_player();
            } else if self.air_time > FALL_WARNING_FRAMES {
                events.raise_screenshake(16);
            }
        }

        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = 1;
        }

        // State selection, highest priority first
        if !self.gravity {
            self.body.velocity.y = 0.0;
            self.air_time = 0;
            self.body.set_action(ActionState::Climb, animations);
        } else if self.air_time > AIRBORNE_FRAMES {
            self.body.set_action(ActionState::Jump, animations);
        } else if self.shooting {
            self.body.set_action(ActionState::Shoot, animations);
            self.body.anim_offset = if self.body.flip {
                vec2(-9.0, -1.0)
            } else {
                vec2(-3.0, -1.0)
            };
        } else if movement.x != 0.0 {
            self.body.set_action(ActionState::Run, animations);
        } else {
            self.body.set_action(ActionState::Idle, animations);
        }

        // Horizontal knockback decays toward zero
        if self.body.velocity.x > 0.0 {
            self.body.velocity.x = (self.body.velocity.x - 0.1).max(0.0);
        } else {
            self.body.velocity.x = (self.body.velocity.x + 0.1).min(0.0);
        }

        // Rope detection at the body center. Losing the rope clears the
        // flag (idempotently) and snaps gravity back on - no grace
        // frames.
        self.rope_anchor = tilemap.entity_check(self.body.center(), TileKind::Rope);
        if self.rope_anchor.is_some() {
            self.on_rope = true;
        } else {
            self.on_rope = false;
            self.gravity = true;
        }

        // Contact with a live enemy is lethal
        let player_rect = self.body.rect();
        if enemies.iter().any(|e| rects_collide(&player_rect, &e.body.rect())) {
            events.raise_screenshake(32);
            events.kill_player();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tilemap::{grid_tile, TILE_SIZE};

    fn floor_map() -> Tilemap {
        let mut map = Tilemap::new(TILE_SIZE);
        for x in -2..20 {
            map.place(grid_tile(TileKind::Grass, 0, x, 4));
        }
        map
    }

    fn grounded_player(map: &Tilemap, animations: &AnimationSet) -> Player {
        let mut player = Player::new(vec2(16.0, 0.0), animations);
        let mut events = FrameEvents::new();
        for _ in 0..80 {
            player.update(map, Vec2::ZERO, &[], animations, &mut events);
            if player.body.collisions.down {
                break;
            }
        }
        assert!(player.body.collisions.down, "player should settle on the floor");
        player
    }

    #[test]
    fn test_jump_exhaustion_and_ground_reset() {
        let animations = AnimationSet::standard();
        let map = floor_map();
        let mut player = grounded_player(&map, &animations);
        let mut events = FrameEvents::new();

        assert!(player.jump());
        assert!(!player.jump(), "no double jump with a single jump budget");

        // Let the player land again
        for _ in 0..200 {
            player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
            if player.air_time == 0 {
                break;
            }
        }
        assert_eq!(player.jumps, 1, "landing refills the jump");
        assert!(player.jump());
    }

    #[test]
    fn test_jump_off_rope_restores_gravity() {
        let animations = AnimationSet::standard();
        let mut player = Player::new(vec2(0.0, 0.0), &animations);
        player.gravity = false;
        player.jumps = 0;

        assert!(player.jump(), "rope jump works even with no jumps left");
        assert!(player.gravity);
        assert_eq!(player.body.velocity.y, JUMP_IMPULSE);
        assert_eq!(player.air_time, JUST_JUMPED);
    }

    #[test]
    fn test_grounded_player_never_fall_dies() {
        let animations = AnimationSet::standard();
        let map = floor_map();
        let mut player = grounded_player(&map, &animations);

        let mut events = FrameEvents::new();
        for _ in 0..260 {
            events.clear_all();
            player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
            assert!(!events.player_died);
        }
        // Ground contact keeps resetting the counter, so it never gets
        // anywhere near the warning threshold
        assert!(player.air_time <= 1);
    }

    #[test]
    fn test_fall_death_past_threshold() {
        let animations = AnimationSet::standard();
        let map = Tilemap::new(TILE_SIZE); // no ground anywhere
        let mut player = Player::new(vec2(0.0, 0.0), &animations);
        let mut events = FrameEvents::new();

        let mut died_at = None;
        for frame in 1..=260 {
            events.clear_all();
            player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
            if events.player_died && died_at.is_none() {
                died_at = Some(frame);
                assert_eq!(events.screenshake_floor(), 32);
            }
        }
        // air_time increments once per update, so the first frame past
        // the threshold is frame 201
        assert_eq!(died_at, Some(FALL_DEATH_FRAMES + 1));
    }

    #[test]
    fn test_fall_warning_raises_smaller_floor() {
        let animations = AnimationSet::standard();
        let map = Tilemap::new(TILE_SIZE);
        let mut player = Player::new(vec2(0.0, 0.0), &animations);
        let mut events = FrameEvents::new();

        for _ in 0..(FALL_WARNING_FRAMES + 1) {
            events.clear_all();
            player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
        }
        assert_eq!(events.screenshake_floor(), 16);
        assert!(!events.player_died);
    }

    #[test]
    fn test_rope_signal_never_goes_stale() {
        let animations = AnimationSet::standard();
        let mut map = floor_map();
        map.place(grid_tile(TileKind::Rope, 0, 1, 2));
        let mut events = FrameEvents::new();

        // Park the player's center inside the rope cell
        let mut player = Player::new(vec2(21.0, 34.0), &animations);
        player.gravity = false; // attached, so position holds
        player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
        assert!(player.on_rope);
        assert!(player.rope_anchor.is_some());

        // Teleport away from the rope: flag clears the same frame and
        // gravity snaps back on
        player.body.pos = vec2(100.0, 0.0);
        player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
        assert!(!player.on_rope);
        assert!(player.rope_anchor.is_none());
        assert!(player.gravity);
    }

    #[test]
    fn test_climb_state_overrides_all() {
        let animations = AnimationSet::standard();
        let mut map = floor_map();
        map.place(grid_tile(TileKind::Rope, 0, 1, 2));
        let mut events = FrameEvents::new();

        let mut player = Player::new(vec2(21.0, 34.0), &animations);
        player.gravity = false;
        player.shooting = true;
        player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
        assert_eq!(player.body.action, ActionState::Climb);
        assert_eq!(player.body.velocity.y, 0.0);
        assert_eq!(player.air_time, 0);
    }

    #[test]
    fn test_attack_hitbox_faces_forward() {
        let animations = AnimationSet::standard();
        let mut player = Player::new(vec2(50.0, 50.0), &animations);

        player.body.flip = false;
        let right = player.attack_hitbox();
        assert_eq!(right.x, 50.0 + PLAYER_SIZE.x);
        assert_eq!(right.w, 100.0);

        player.body.flip = true;
        let left = player.attack_hitbox();
        assert_eq!(left.x, 50.0 - 100.0);
        // Near edge touches the player on either side
        assert_eq!(left.x + left.w, 50.0);
    }

    #[test]
    fn test_enemy_contact_is_lethal() {
        let animations = AnimationSet::standard();
        let map = floor_map();
        let mut player = grounded_player(&map, &animations);
        let mut events = FrameEvents::new();

        let enemy = Enemy::new(player.body.pos - vec2(2.0, 0.0), &animations);
        player.update(&map, Vec2::ZERO, &[enemy], &animations, &mut events);
        assert!(events.player_died);
        assert_eq!(events.screenshake_floor(), 32);
    }

    #[test]
    fn test_shoot_feedback_on_animation_ticks() {
        let animations = AnimationSet::standard();
        let map = floor_map();
        let mut player = grounded_player(&map, &animations);
        let mut events = FrameEvents::new();
        player.set_shooting(true);

        let mut shots = 0;
        for _ in 0..20 {
            events.clear_all();
            player.update(&map, Vec2::ZERO, &[], &animations, &mut events);
            if !events.sounds.is_empty() {
                shots += 1;
                assert_eq!(events.screenshake_floor(), 10);
            }
        }
        // The shoot animation fires on ticks 2 and 10, then clamps at
        // its last tick without firing again
        assert_eq!(shots, 2);
        assert_eq!(player.body.action, ActionState::Shoot);
    }
}
