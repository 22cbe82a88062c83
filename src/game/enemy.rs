//! Enemy controller
//!
//! A wander/patrol AI on top of the shared physics body. Enemies have no
//! health model: overlapping the player's live attack hitbox destroys
//! them outright and raises a kill event for the scene to dress up.

use macroquad::prelude::{vec2, Vec2};
use macroquad::rand::gen_range;

use super::animation::{ActionState, AnimationSet, EntityKind};
use super::events::FrameEvents;
use super::physics::{rects_collide, Body};
use super::player::Player;
use super::tilemap::Tilemap;

pub const ENEMY_SIZE: Vec2 = vec2(8.0, 15.0);
/// Walk speed in pixels per frame while patrolling.
pub const PATROL_SPEED: f32 = 0.5;
/// Sparks spawned when an enemy is destroyed.
pub const KILL_BURST: usize = 20;

// Forward ground-probe offsets. The horizontal +-7 does not exactly
// mirror the sprite's facing edge and the vertical +23 reaches a full
// tile below the feet; both are kept verbatim from the tuned original.
const PROBE_AHEAD: f32 = 7.0;
const PROBE_BELOW: f32 = 23.0;

pub struct Enemy {
    pub body: Body,
    /// Remaining frames of the current patrol burst; 0 = standing idle.
    pub walking: i32,
}

impl Enemy {
    pub fn new(pos: Vec2, animations: &AnimationSet) -> Self {
        Self {
            body: Body::new(EntityKind::Enemy, pos, ENEMY_SIZE, animations),
            walking: 0,
        }
    }

    /// Advance one frame. Returns false if the enemy was destroyed by
    /// the player's attack this frame. The player reference is the state
    /// left by the previous frame - enemies update strictly before the
    /// player within a frame.
    pub fn update(
        &mut self,
        tilemap: &Tilemap,
        player: &Player,
        animations: &AnimationSet,
        events: &mut FrameEvents,
    ) -> bool {
        let mut movement = Vec2::ZERO;
        let patrolling = self.walking > 0;

        if patrolling {
            let probe = vec2(
                self.body.rect().center().x + if self.body.flip { -PROBE_AHEAD } else { PROBE_AHEAD },
                self.body.pos.y + PROBE_BELOW,
            );
            if tilemap.solid_check(probe) {
                // Footing ahead: walk unless a wall stopped us last frame
                if self.body.collisions.right || self.body.collisions.left {
                    self.body.flip = !self.body.flip;
                } else {
                    movement.x = if self.body.flip { -PATROL_SPEED } else { PATROL_SPEED };
                }
            } else {
                // Ledge ahead: turn around, burst keeps its remainder
                self.body.flip = !self.body.flip;
            }
            self.walking = (self.walking - 1).max(0);
        } else if gen_range(0, 100) == 0 {
            self.walking = gen_range(30, 120);
        }

        self.body.update(tilemap, movement);

        // Keyed to the burst, not this frame's movement, so a turn
        // frame does not flicker the sprite back to idle
        if patrolling {
            self.body.set_action(ActionState::Run, animations);
        } else {
            self.body.set_action(ActionState::Idle, animations);
        }

        // One-shot elimination against the player's live attack hitbox;
        // the scene turns the kill event into sparks and screenshake
        if player.is_attacking()
            && rects_collide(&player.attack_hitbox(), &self.body.rect())
        {
            events.kill_enemy(self.body.center());
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tilemap::{grid_tile, TileKind, Tilemap, TILE_SIZE};

    fn platform_map() -> Tilemap {
        // Floor at y=4 spanning cells 0..10, with walls at both ends
        let mut map = Tilemap::new(TILE_SIZE);
        for x in 0..10 {
            map.place(grid_tile(TileKind::Grass, 0, x, 4));
        }
        map.place(grid_tile(TileKind::Default, 0, 0, 3));
        map.place(grid_tile(TileKind::Default, 0, 9, 3));
        map
    }

    fn idle_player(animations: &AnimationSet) -> Player {
        // Parked far away so contact and attack tests don't interfere
        Player::new(vec2(-1000.0, -1000.0), animations)
    }

    fn settled_enemy(map: &Tilemap, pos: Vec2, animations: &AnimationSet) -> Enemy {
        let mut enemy = Enemy::new(pos, animations);
        let player = idle_player(animations);
        let mut events = FrameEvents::new();
        for _ in 0..40 {
            enemy.update(map, &player, animations, &mut events);
            if enemy.body.collisions.down {
                break;
            }
        }
        enemy
    }

    #[test]
    fn test_wall_collision_flips_and_burst_continues() {
        let animations = AnimationSet::standard();
        let map = platform_map();
        let player = idle_player(&animations);
        let mut events = FrameEvents::new();

        let mut enemy = settled_enemy(&map, vec2(7.0 * 16.0, 48.0), &animations);
        enemy.body.flip = false; // walk right, toward the wall at x=9
        enemy.walking = 200;

        let mut flipped_at = None;
        for frame in 0..200 {
            let walking_before = enemy.walking;
            let was_flipped = enemy.body.flip;
            assert!(enemy.update(&map, &player, &animations, &mut events));
            if enemy.body.flip != was_flipped && flipped_at.is_none() {
                flipped_at = Some(frame);
                // The burst keeps counting down through the turn and
                // the run animation holds on the turn frame
                assert_eq!(enemy.walking, walking_before - 1);
                assert_eq!(enemy.body.action, ActionState::Run);
            }
        }
        assert!(flipped_at.is_some(), "enemy should turn at the wall");
        assert!(enemy.body.flip, "enemy walks left after the turn");
    }

    #[test]
    fn test_ledge_probe_turns_enemy_around() {
        let animations = AnimationSet::standard();
        // Floor spanning cells 3..10 only: a ledge at x=48
        let mut map = Tilemap::new(TILE_SIZE);
        for x in 3..10 {
            map.place(grid_tile(TileKind::Grass, 0, x, 4));
        }
        let player = idle_player(&animations);
        let mut events = FrameEvents::new();

        let mut enemy = settled_enemy(&map, vec2(60.0, 48.0), &animations);
        enemy.body.flip = true; // walk left, toward the ledge
        enemy.walking = 60;

        let mut turned = false;
        for _ in 0..40 {
            let was = enemy.body.flip;
            enemy.update(&map, &player, &animations, &mut events);
            if enemy.body.flip != was {
                turned = true;
                break;
            }
        }
        assert!(turned, "probe past the ledge must reverse facing");
        assert!(!enemy.body.flip);
        assert!(enemy.walking > 0, "burst survives the turn");
    }

    #[test]
    fn test_idle_enemy_stays_put_without_burst() {
        let animations = AnimationSet::standard();
        let map = platform_map();
        let player = idle_player(&animations);
        let mut events = FrameEvents::new();

        let mut enemy = settled_enemy(&map, vec2(64.0, 48.0), &animations);
        enemy.walking = 0;
        let x = enemy.body.pos.x;
        // A burst may randomly start, but a walking=0 frame never moves
        let was_walking = enemy.walking;
        enemy.update(&map, &player, &animations, &mut events);
        if was_walking == 0 && enemy.walking == 0 {
            assert_eq!(enemy.body.pos.x, x);
        }
    }

    #[test]
    fn test_attack_hitbox_destroys_enemy() {
        let animations = AnimationSet::standard();
        let map = platform_map();
        let mut events = FrameEvents::new();

        let mut enemy = settled_enemy(&map, vec2(64.0, 48.0), &animations);

        // Player standing just left of the enemy, shooting right
        let mut player = Player::new(vec2(40.0, 48.0), &animations);
        player.set_shooting(true);
        player.body.flip = false;
        player.body.set_action(ActionState::Shoot, &animations);
        assert!(player.is_attacking());

        let center = enemy.body.center();
        let alive = enemy.update(&map, &player, &animations, &mut events);
        assert!(!alive);
        let kills: Vec<_> = events.kills.drain().collect();
        assert_eq!(kills.len(), 1);
        assert!((kills[0].pos - center).length() < 2.0);
    }

    #[test]
    fn test_hitbox_without_attack_state_is_harmless() {
        let animations = AnimationSet::standard();
        let map = platform_map();
        let mut events = FrameEvents::new();

        let mut enemy = settled_enemy(&map, vec2(64.0, 48.0), &animations);
        // Adjacent player who is NOT in the shoot state
        let player = Player::new(vec2(40.0, 48.0), &animations);
        assert!(!player.is_attacking());

        assert!(enemy.update(&map, &player, &animations, &mut events));
        assert!(events.kills.is_empty());
    }
}
