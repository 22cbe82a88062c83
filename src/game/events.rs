//! Frame event sink
//!
//! Entities never reach back into the scene; their update calls receive
//! a `FrameEvents` sink and raise what happened this frame. The scene
//! drains the sink at a fixed point in the frame:
//! 1. Combat detects a kill -> enemy kill event
//! 2. Audio plays the queued sounds
//! 3. VFX spawns the queued spark bursts
//! 4. Camera folds the screenshake floors
//! Each consumer handles its own concern without knowing the others.

use macroquad::prelude::Vec2;

/// A queue for events of a single type, collected during the frame and
/// drained at a fixed point.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot sound effects the core can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    Shoot,
}

/// A radial burst of sparks to spawn at a position.
#[derive(Debug, Clone, Copy)]
pub struct SparkBurst {
    pub pos: Vec2,
    pub count: usize,
}

/// An enemy was destroyed by the player's attack.
#[derive(Debug, Clone, Copy)]
pub struct EnemyKill {
    pub pos: Vec2,
}

/// Everything raised during one frame's updates.
pub struct FrameEvents {
    /// Highest screenshake floor requested this frame. Floors fold by
    /// max, never sum, so repeated events cannot accumulate runaway
    /// shake.
    screenshake_floor: i32,

    /// Sounds to play this frame.
    pub sounds: EventQueue<SoundId>,

    /// Spark bursts to spawn this frame.
    pub bursts: EventQueue<SparkBurst>,

    /// Enemies destroyed this frame.
    pub kills: EventQueue<EnemyKill>,

    /// The player met a death condition this frame.
    pub player_died: bool,
}

impl FrameEvents {
    pub fn new() -> Self {
        Self {
            screenshake_floor: 0,
            sounds: EventQueue::new(),
            bursts: EventQueue::new(),
            kills: EventQueue::new(),
            player_died: false,
        }
    }

    /// Raise the screenshake floor for this frame.
    pub fn raise_screenshake(&mut self, floor: i32) {
        self.screenshake_floor = self.screenshake_floor.max(floor);
    }

    pub fn screenshake_floor(&self) -> i32 {
        self.screenshake_floor
    }

    pub fn play_sound(&mut self, sound: SoundId) {
        self.sounds.send(sound);
    }

    pub fn spawn_burst(&mut self, pos: Vec2, count: usize) {
        self.bursts.send(SparkBurst { pos, count });
    }

    pub fn kill_enemy(&mut self, pos: Vec2) {
        self.kills.send(EnemyKill { pos });
    }

    pub fn kill_player(&mut self) {
        self.player_died = true;
    }

    /// Reset for the next frame.
    pub fn clear_all(&mut self) {
        self.screenshake_floor = 0;
        self.sounds.clear();
        self.bursts.clear();
        self.kills.clear();
        self.player_died = false;
    }
}

impl Default for FrameEvents {
    fn default() -> Self {
        Self::new()
    }
}
