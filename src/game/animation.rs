//! Animation state tracking
//!
//! Animations are pure frame-timing data; the textures themselves live in
//! the asset layer and are only touched at render time. Entities look up
//! their current animation by `(EntityKind, ActionState)` through a table
//! resolved once at load - no string keys, no per-frame hash lookups.

/// The kinds of physics-driven entities in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
}

impl EntityKind {
    pub const COUNT: usize = 2;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The action states an entity can animate through.
///
/// Selected by priority in the controllers (climb overrides everything,
/// then airborne, then attacking, then running, else idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionState {
    Idle,
    Run,
    Jump,
    Shoot,
    Climb,
}

impl ActionState {
    pub const COUNT: usize = 5;

    pub const ALL: [ActionState; Self::COUNT] = [
        ActionState::Idle,
        ActionState::Run,
        ActionState::Jump,
        ActionState::Shoot,
        ActionState::Climb,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Frame-timing data for one animation: how many frames, how many ticks
/// each frame is held, and whether it loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frames: usize,
    pub frame_duration: i32,
    pub looped: bool,
}

impl Animation {
    pub fn looping(frames: usize, frame_duration: i32) -> Self {
        Self { frames, frame_duration, looped: true }
    }

    pub fn once(frames: usize, frame_duration: i32) -> Self {
        Self { frames, frame_duration, looped: false }
    }

    /// Total duration in ticks.
    fn total_ticks(&self) -> i32 {
        self.frames as i32 * self.frame_duration
    }
}

/// Playback state for one entity's active animation.
///
/// Carries a copy of the timing data so advancing it needs no table
/// lookup. Re-created whenever the entity enters a new action state.
#[derive(Debug, Clone, Copy)]
pub struct AnimState {
    pub animation: Animation,
    tick: i32,
}

impl AnimState {
    pub fn new(animation: Animation) -> Self {
        Self { animation, tick: 0 }
    }

    /// Advance playback by one tick.
    pub fn tick(&mut self) {
        if self.animation.looped {
            self.tick = (self.tick + 1) % self.animation.total_ticks();
        } else {
            self.tick = (self.tick + 1).min(self.animation.total_ticks() - 1);
        }
    }

    /// Raw tick counter since the state was entered (wraps for loops).
    pub fn ticks(&self) -> i32 {
        self.tick
    }

    /// Which frame image to show right now.
    pub fn frame_index(&self) -> usize {
        ((self.tick / self.animation.frame_duration) as usize).min(self.animation.frames - 1)
    }

    /// Has a non-looping animation reached its last tick?
    pub fn done(&self) -> bool {
        !self.animation.looped && self.tick >= self.animation.total_ticks() - 1
    }
}

/// The load-time table mapping `(EntityKind, ActionState)` to timing data.
///
/// Every slot is filled at construction, so runtime lookups can never
/// miss - a missing animation is the asset layer's startup failure, not
/// a per-frame concern.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    table: [[Animation; ActionState::COUNT]; EntityKind::COUNT],
}

impl AnimationSet {
    pub fn new(table: [[Animation; ActionState::COUNT]; EntityKind::COUNT]) -> Self {
        Self { table }
    }

    /// The standard timing table matching the shipped sprite sets.
    /// Enemies reuse their idle timing for states they never enter.
    pub fn standard() -> Self {
        let player_idle = Animation::looping(4, 6);
        let enemy_idle = Animation::looping(4, 8);
        let mut table = [[player_idle; ActionState::COUNT]; EntityKind::COUNT];

        let p = EntityKind::Player.index();
        table[p][ActionState::Idle.index()] = player_idle;
        table[p][ActionState::Run.index()] = Animation::looping(8, 5);
        table[p][ActionState::Jump.index()] = Animation::once(1, 5);
        table[p][ActionState::Shoot.index()] = Animation::once(3, 6);
        table[p][ActionState::Climb.index()] = Animation::looping(4, 6);

        let e = EntityKind::Enemy.index();
        table[e] = [enemy_idle; ActionState::COUNT];
        table[e][ActionState::Run.index()] = Animation::looping(6, 5);

        Self { table }
    }

    pub fn get(&self, kind: EntityKind, action: ActionState) -> Animation {
        self.table[kind.index()][action.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_animation_wraps() {
        let mut state = AnimState::new(Animation::looping(2, 3));
        for _ in 0..6 {
            state.tick();
        }
        // 2 frames * 3 ticks = 6 ticks total, so we are back at the start
        assert_eq!(state.frame_index(), 0);
        assert!(!state.done());
    }

    #[test]
    fn test_once_animation_clamps_and_finishes() {
        let mut state = AnimState::new(Animation::once(3, 2));
        for _ in 0..20 {
            state.tick();
        }
        assert_eq!(state.frame_index(), 2);
        assert!(state.done());
    }

    #[test]
    fn test_frame_index_advances_by_duration() {
        let mut state = AnimState::new(Animation::once(3, 6));
        assert_eq!(state.frame_index(), 0);
        for _ in 0..6 {
            state.tick();
        }
        assert_eq!(state.frame_index(), 1);
    }

    #[test]
    fn test_standard_table_covers_all_slots() {
        let set = AnimationSet::standard();
        for kind in [EntityKind::Player, EntityKind::Enemy] {
            for action in ActionState::ALL {
                assert!(set.get(kind, action).frames > 0);
            }
        }
    }
}
