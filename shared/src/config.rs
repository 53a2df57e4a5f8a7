//! Tunable game constants, grouped into one structure consumed at match
//! construction. Different "feel" variants of the game are alternate
//! `GameConfig` values, not code changes.

use serde::{Deserialize, Serialize};

/// Every tunable constant of the simulation.
///
/// Coordinates follow screen convention: x grows rightward, y grows downward,
/// so gravity is positive and a jump sets a negative vertical velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // Court geometry
    pub court_width: f32,
    pub court_height: f32,
    /// Distance from the top of the screen to the ground line.
    pub ground_y: f32,
    pub net_width: f32,
    pub net_height: f32,

    // Player movement
    pub player_radius: f32,
    pub player_gravity: f32,
    pub player_speed: f32,
    pub jump_power: f32,
    /// Multiplicative horizontal decay applied each tick without input.
    pub player_damping: f32,

    // Ball flight
    pub ball_radius: f32,
    pub ball_gravity: f32,
    /// Cap on the ball's speed magnitude, enforced after every integration
    /// and every collision response.
    pub ball_max_speed: f32,
    pub ball_damping: f32,
    pub wall_restitution: f32,
    pub ground_restitution: f32,
    /// Extra horizontal friction applied on ground contact.
    pub ground_friction: f32,
    /// Rebound speeds below this snap to zero to stop micro-bouncing.
    pub rest_epsilon: f32,

    // Ball spin
    pub spin_transfer: f32,
    pub spin_decay: f32,
    pub spin_force: f32,

    // Hit response
    pub hit_base_force: f32,
    /// Constant upward bias added to every non-spike hit.
    pub hit_lift: f32,
    pub momentum_transfer: f32,
    /// Player velocity components below this contribute no momentum.
    pub momentum_threshold: f32,
    pub rising_hit_threshold: f32,
    pub rising_hit_bonus: f32,
    pub fast_player_threshold: f32,
    pub fast_player_bonus: f32,
    pub airborne_bonus: f32,
    /// Half-width of the band around the player's center that grants the
    /// sweet-spot bonus.
    pub sweet_spot_half_width: f32,
    pub sweet_spot_bonus: f32,
    pub spike_margin: f32,
    pub spike_force: f32,
    /// Fraction of spike force applied outward (the rest points down).
    pub spike_outward: f32,
    /// Separation margin added when pushing the ball out of a contact.
    pub separation_epsilon: f32,

    // Match rules
    pub match_seconds: u32,
    /// Where the ball respawns horizontally, measured from the near wall.
    pub serve_offset: f32,
    pub serve_height: f32,

    // Networking cadence
    /// Host broadcasts a full snapshot every this many simulation ticks.
    pub snapshot_interval: u32,
    pub heartbeat_secs: f32,
    /// Heartbeat silence longer than this counts as a dead link.
    pub heartbeat_timeout_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            court_width: 800.0,
            court_height: 400.0,
            ground_y: 350.0,
            net_width: 10.0,
            net_height: 100.0,

            player_radius: 40.0,
            player_gravity: 0.25,
            player_speed: 2.0,
            jump_power: 6.0,
            player_damping: 0.8,

            ball_radius: 15.0,
            ball_gravity: 0.016,
            ball_max_speed: 4.0,
            ball_damping: 0.995,
            wall_restitution: 0.8,
            ground_restitution: 0.7,
            ground_friction: 0.9,
            rest_epsilon: 0.05,

            spin_transfer: 0.15,
            spin_decay: 0.98,
            spin_force: 0.01,

            hit_base_force: 2.5,
            hit_lift: 0.8,
            momentum_transfer: 0.6,
            momentum_threshold: 0.3,
            rising_hit_threshold: 3.0,
            rising_hit_bonus: 1.3,
            fast_player_threshold: 2.5,
            fast_player_bonus: 1.2,
            airborne_bonus: 1.15,
            sweet_spot_half_width: 12.0,
            sweet_spot_bonus: 1.25,
            spike_margin: 5.0,
            spike_force: 5.0,
            spike_outward: 0.8,
            separation_epsilon: 0.5,

            match_seconds: 180,
            serve_offset: 150.0,
            serve_height: 50.0,

            snapshot_interval: 2,
            heartbeat_secs: 1.0,
            heartbeat_timeout_secs: 10.0,
        }
    }
}

impl GameConfig {
    /// Left edge of the net column.
    pub fn net_left(&self) -> f32 {
        self.court_width / 2.0 - self.net_width / 2.0
    }

    /// Right edge of the net column.
    pub fn net_right(&self) -> f32 {
        self.net_left() + self.net_width
    }

    /// Top of the net column, measured from the top of the screen.
    pub fn net_top(&self) -> f32 {
        self.ground_y - self.net_height
    }
}
