//! Input state management
//!
//! Polls keyboard and mouse input (macroquad) and maps it to a small
//! action vocabulary, then folds one frame's worth of actions into an
//! `Intents` snapshot the simulation consumes. The simulation never
//! touches device state directly, which keeps it headless-testable.

use macroquad::prelude::*;

/// All actions the game responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement (A/D or arrows)
    MoveLeft,
    MoveRight,

    // Rope climbing (W/S or arrows)
    ClimbUp,
    ClimbDown,

    Jump,   // Space
    Attack, // left mouse button

    Quit, // Escape
}

/// Unified input polling, one instance for the whole app.
pub struct InputState;

impl InputState {
    pub fn new() -> Self {
        Self
    }

    /// Check if an action is currently held down.
    pub fn action_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            Action::MoveRight => is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            Action::ClimbUp => is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            Action::ClimbDown => is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            Action::Jump => is_key_down(KeyCode::Space),
            Action::Attack => is_mouse_button_down(MouseButton::Left),
            Action::Quit => is_key_down(KeyCode::Escape),
        }
    }

    /// Check if an action was pressed this frame.
    pub fn action_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => is_key_pressed(KeyCode::Space),
            Action::Attack => is_mouse_button_pressed(MouseButton::Left),
            Action::Quit => is_key_pressed(KeyCode::Escape),
            _ => false,
        }
    }

    /// Check if an action was released this frame.
    pub fn action_released(&self, action: Action) -> bool {
        match action {
            Action::Attack => is_mouse_button_released(MouseButton::Left),
            _ => false,
        }
    }

    /// Snapshot this frame's input for the simulation.
    pub fn intents(&self) -> Intents {
        Intents {
            left: self.action_down(Action::MoveLeft),
            right: self.action_down(Action::MoveRight),
            climb_up: self.action_down(Action::ClimbUp),
            climb_down: self.action_down(Action::ClimbDown),
            jump: self.action_pressed(Action::Jump),
            attack_down: self.action_pressed(Action::Attack),
            attack_up: self.action_released(Action::Attack),
            quit: self.action_pressed(Action::Quit),
        }
    }
}

/// One frame's input, decoupled from the device layer. Held actions are
/// level-triggered; jump and the attack transitions are edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    pub climb_up: bool,
    pub climb_down: bool,
    pub jump: bool,
    pub attack_down: bool,
    pub attack_up: bool,
    pub quit: bool,
}
