//! Frame orchestrator
//!
//! Owns the whole simulation state and advances it in a fixed order each
//! frame: screenshake decay, camera follow, background, enemies, player,
//! event drain, sparks, death sequencing. Enemies update strictly before
//! the player so the player's same-frame collision test sees this
//! frame's enemy positions. Rendering is a separate pass over the
//! resulting state (see `render`).

use macroquad::prelude::{vec2, Vec2};

use crate::input::Intents;
use crate::level::LevelData;

use super::animation::AnimationSet;
use super::background::Layer;
use super::camera::Camera;
use super::enemy::{Enemy, KILL_BURST};
use super::events::{FrameEvents, SoundId};
use super::player::Player;
use super::spark::{spawn_burst, Spark};
use super::tilemap::{TileKind, Tilemap};

/// Virtual display size in pixels; the window scales this up.
pub const DISPLAY_WIDTH: f32 = 320.0;
pub const DISPLAY_HEIGHT: f32 = 240.0;

/// Frames after death before the transition wipe starts growing.
pub const WIPE_DELAY: i32 = 10;
/// Wipe radius growth per frame once it starts.
pub const WIPE_SPEED: f32 = 12.0;
/// Frames after death before the level reloads (the sole respawn path).
pub const RESPAWN_FRAMES: i32 = 40;

/// Sparks spawned at the player's center on death.
const DEATH_BURST: usize = 30;

/// Background drifter population per layer.
const LAYER_COUNT: usize = 32;

pub struct Scene {
    /// The level as loaded; kept so death can reload it wholesale.
    level: LevelData,
    pub animations: AnimationSet,

    pub tilemap: Tilemap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub sparks: Vec<Spark>,
    pub stars: Layer,
    pub dust: Layer,
    pub camera: Camera,

    /// 0 = alive; counts frames since death once set.
    pub dead: i32,

    /// Sounds raised this frame, drained by the main loop.
    pending_sounds: Vec<SoundId>,
}

impl Scene {
    pub fn new(level: LevelData) -> Self {
        let animations = AnimationSet::standard();
        let (tilemap, player, enemies) = Self::build_level(&level, &animations);
        Self {
            level,
            animations,
            tilemap,
            player,
            enemies,
            sparks: Vec::new(),
            stars: Layer::stars(LAYER_COUNT, crate::assets::STAR_IMAGES),
            dust: Layer::dust(LAYER_COUNT, crate::assets::DUST_IMAGES),
            camera: Camera::new(),
            dead: 0,
            pending_sounds: Vec::new(),
        }
    }

    /// Build the tilemap and harvest the spawner markers - the one
    /// destructive pass over the level data, run once per (re)load.
    fn build_level(
        level: &LevelData,
        animations: &AnimationSet,
    ) -> (Tilemap, Player, Vec<Enemy>) {
        let mut tilemap = level.build_tilemap();
        let mut player = Player::new(Vec2::ZERO, animations);
        let mut enemies = Vec::new();

        for spawner in
            tilemap.extract(&[(TileKind::Spawner, 0), (TileKind::Spawner, 1)], false)
        {
            let pos = vec2(spawner.pos.0 as f32, spawner.pos.1 as f32);
            if spawner.variant == 0 {
                player.body.pos = pos;
                player.air_time = 0;
            } else {
                enemies.push(Enemy::new(pos, animations));
            }
        }

        (tilemap, player, enemies)
    }

    /// Full state reset by rebuilding from the stored level data.
    pub fn reload(&mut self) {
        let (tilemap, player, enemies) = Self::build_level(&self.level, &self.animations);
        self.tilemap = tilemap;
        self.player = player;
        self.enemies = enemies;
        self.sparks.clear();
        self.camera.scroll = Vec2::ZERO;
        self.dead = 0;
    }

    pub fn view_size(&self) -> Vec2 {
        vec2(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    /// Radius of the death transition wipe, if it is running.
    pub fn wipe_radius(&self) -> Option<f32> {
        if self.dead > WIPE_DELAY {
            Some((self.dead - WIPE_DELAY) as f32 * WIPE_SPEED)
        } else {
            None
        }
    }

    /// Sounds raised since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundId> {
        std::mem::take(&mut self.pending_sounds)
    }

    /// Advance the simulation by one frame.
    pub fn simulate(&mut self, intents: &Intents) {
        // Death sequencing runs even while the player is frozen
        if self.dead > 0 {
            self.dead += 1;
            if self.dead > RESPAWN_FRAMES {
                self.reload();
                return;
            }
        }

        self.camera.decay_screenshake();
        self.camera
            .follow(self.player.body.rect().center(), self.view_size());

        self.stars.update();
        self.dust.update();

        // Intent edges
        if intents.attack_down {
            self.player.set_shooting(true);
        }
        if intents.attack_up {
            self.player.set_shooting(false);
        }
        if intents.jump && self.dead == 0 {
            self.player.jump();
        }

        let mut events = FrameEvents::new();

        // Enemies strictly before the player; they keep patrolling
        // through the death transition while only the player freezes
        {
            let tilemap = &self.tilemap;
            let player = &self.player;
            let animations = &self.animations;
            let events = &mut events;
            self.enemies
                .retain_mut(|enemy| enemy.update(tilemap, player, animations, events));
        }

        if self.dead == 0 {
            // Rope attachment: the rope signal from last frame plus a
            // held climb key disables gravity and snaps the player onto
            // the rope's column
            let climb_held = intents.climb_up || intents.climb_down;
            if self.player.on_rope && climb_held {
                self.player.gravity = false;
                if let Some(anchor) = self.player.rope_anchor {
                    self.player.body.pos.x =
                        self.tilemap.tile_center_x(&anchor) - self.player.body.size.x / 2.0;
                }
            }

            let movement = if !self.player.gravity {
                // Attached: vertical-only movement
                vec2(
                    0.0,
                    (intents.climb_down as i32 - intents.climb_up as i32) as f32,
                )
            } else {
                vec2((intents.right as i32 - intents.left as i32) as f32, 0.0)
            };

            self.player.update(
                &self.tilemap,
                movement,
                &self.enemies,
                &self.animations,
                &mut events,
            );
        }

        // Drain the frame's events at a fixed point
        let kills: Vec<_> = events.kills.drain().collect();
        for kill in kills {
            events.raise_screenshake(16);
            events.spawn_burst(kill.pos, KILL_BURST);
        }
        self.camera.raise_screenshake(events.screenshake_floor());
        for burst in events.bursts.drain() {
            spawn_burst(&mut self.sparks, burst.pos, burst.count);
        }
        self.pending_sounds.extend(events.sounds.drain());
        if events.player_died && self.dead == 0 {
            self.dead = 1;
            spawn_burst(&mut self.sparks, self.player.body.center(), DEATH_BURST);
        }

        self.sparks.retain_mut(|spark| spark.update());
    }
}
