//! Maps raw key state to logical control intents and match commands.

use macroquad::prelude::{is_key_down, KeyCode};
use shared::Intent;

/// Physical keys bound to one player's controls.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
}

impl KeyBindings {
    /// Player 1 layout: A/D to move, W to jump.
    pub fn wasd() -> Self {
        KeyBindings {
            left: KeyCode::A,
            right: KeyCode::D,
            jump: KeyCode::W,
        }
    }

    /// Player 2 layout: arrow keys.
    pub fn arrows() -> Self {
        KeyBindings {
            left: KeyCode::Left,
            right: KeyCode::Right,
            jump: KeyCode::Up,
        }
    }

    fn sample(&self) -> Intent {
        Intent {
            move_left: is_key_down(self.left),
            move_right: is_key_down(self.right),
            jump: is_key_down(self.jump),
        }
    }
}

/// One frame's worth of logical input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub p1: Intent,
    pub p2: Intent,
    /// Edge-triggered match commands.
    pub start: bool,
    pub reset: bool,
}

impl FrameInput {
    /// Union of both binding sets, used for the single local player in
    /// online mode so either layout works.
    pub fn merged_intent(&self) -> Intent {
        Intent {
            move_left: self.p1.move_left || self.p2.move_left,
            move_right: self.p1.move_right || self.p2.move_right,
            jump: self.p1.jump || self.p2.jump,
        }
    }
}

/// Samples the keyboard once per frame, edge-detecting command keys.
pub struct InputRouter {
    p1: KeyBindings,
    p2: KeyBindings,
    prev_start: bool,
    prev_reset: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        InputRouter {
            p1: KeyBindings::wasd(),
            p2: KeyBindings::arrows(),
            prev_start: false,
            prev_reset: false,
        }
    }

    pub fn sample(&mut self) -> FrameInput {
        let start_down = is_key_down(KeyCode::Enter);
        let reset_down = is_key_down(KeyCode::R);

        let frame = FrameInput {
            p1: self.p1.sample(),
            p2: self.p2.sample(),
            start: start_down && !self.prev_start,
            reset: reset_down && !self.prev_reset,
        };

        self.prev_start = start_down;
        self.prev_reset = reset_down;
        frame
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}
