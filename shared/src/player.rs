//! Player actor: intent-driven movement with court and net constraints.

use crate::config::GameConfig;
use serde::{Deserialize, Serialize};

/// Which half of the court a player is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Spawn position for this side, a quarter court in from the near wall.
    pub fn spawn_x(self, config: &GameConfig) -> f32 {
        match self {
            Side::Left => config.court_width / 4.0,
            Side::Right => config.court_width * 3.0 / 4.0,
        }
    }
}

/// Logical control state for one tick, decoupled from physical keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    /// Top of the player's dome; the hit point sits `radius` below.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub on_ground: bool,
    pub intent: Intent,
}

impl Player {
    pub fn new(side: Side, config: &GameConfig) -> Self {
        Player {
            side,
            x: side.spawn_x(config),
            y: config.ground_y - config.player_radius,
            vx: 0.0,
            vy: 0.0,
            radius: config.player_radius,
            on_ground: true,
            intent: Intent::default(),
        }
    }

    /// Center of the collision circle the ball interacts with.
    pub fn hit_point(&self) -> (f32, f32) {
        (self.x, self.y + self.radius)
    }

    /// Moves the player back to its spawn with zero velocity.
    pub fn respawn(&mut self, config: &GameConfig) {
        self.x = self.side.spawn_x(config);
        self.y = config.ground_y - self.radius;
        self.vx = 0.0;
        self.vy = 0.0;
        self.on_ground = true;
        self.intent = Intent::default();
    }

    /// Advances the player one tick from its current intent.
    ///
    /// Operation order is fixed: intent, jump, gravity, integration, wall
    /// clamp, net clamp, ground clamp. Reordering changes trajectories.
    pub fn update(&mut self, config: &GameConfig) {
        if self.intent.move_left && !self.intent.move_right {
            self.vx = -config.player_speed;
        } else if self.intent.move_right && !self.intent.move_left {
            self.vx = config.player_speed;
        } else {
            self.vx *= config.player_damping;
        }

        if self.intent.jump && self.on_ground {
            self.vy = -config.jump_power;
            self.on_ground = false;
        }

        self.vy += config.player_gravity;

        self.x += self.vx;
        self.y += self.vy;

        if self.x - self.radius < 0.0 {
            self.x = self.radius;
        }
        if self.x + self.radius > config.court_width {
            self.x = config.court_width - self.radius;
        }

        // Positional clamp: a player never enters the net span, regardless
        // of velocity.
        match self.side {
            Side::Left => {
                if self.x + self.radius > config.net_left() {
                    self.x = config.net_left() - self.radius;
                }
            }
            Side::Right => {
                if self.x - self.radius < config.net_right() {
                    self.x = config.net_right() + self.radius;
                }
            }
        }

        if self.y + self.radius > config.ground_y {
            self.y = config.ground_y - self.radius;
            self.vy = 0.0;
            self.on_ground = true;
        }
    }
}
