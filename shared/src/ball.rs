//! Ball actor: flight integration, court collisions, and the hit response
//! against a player.

use crate::config::GameConfig;
use crate::player::{Player, Side};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Spin picked up from hits; decays geometrically and curves the flight.
    pub spin: f32,
}

impl Ball {
    pub fn new(config: &GameConfig) -> Self {
        let mut ball = Ball {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: config.ball_radius,
            spin: 0.0,
        };
        ball.reset_to(Side::Left, config);
        ball
    }

    /// Repositions the ball for a new serve on a random side.
    pub fn reset<R: Rng>(&mut self, rng: &mut R, config: &GameConfig) {
        let side = if rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        self.reset_to(side, config);
    }

    /// Repositions the ball for a new serve on the given side, dropping it
    /// from rest well inside that half of the court.
    pub fn reset_to(&mut self, side: Side, config: &GameConfig) {
        self.x = match side {
            Side::Left => config.serve_offset,
            Side::Right => config.court_width - config.serve_offset,
        };
        self.y = config.serve_height;
        self.vx = 0.0;
        self.vy = 0.0;
        self.spin = 0.0;
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    fn clamp_speed(&mut self, config: &GameConfig) {
        let speed = self.speed();
        if speed > config.ball_max_speed {
            let scale = config.ball_max_speed / speed;
            self.vx *= scale;
            self.vy *= scale;
        }
    }

    /// Advances the ball one tick.
    ///
    /// Fixed order: gravity and spin force, speed clamp, damping,
    /// integration, then wall, ground, and net collision.
    pub fn update(&mut self, config: &GameConfig) {
        self.vy += config.ball_gravity;
        self.vx += self.spin * config.spin_force;
        self.spin *= config.spin_decay;

        self.clamp_speed(config);

        self.vx *= config.ball_damping;
        self.vy *= config.ball_damping;

        self.x += self.vx;
        self.y += self.vy;

        if self.x - self.radius < 0.0 || self.x + self.radius > config.court_width {
            self.vx = -self.vx * config.wall_restitution;
            self.x = if self.x - self.radius < 0.0 {
                self.radius
            } else {
                config.court_width - self.radius
            };
        }

        if self.y + self.radius > config.ground_y {
            self.vy = -self.vy * config.ground_restitution;
            self.y = config.ground_y - self.radius;
            self.vx *= config.ground_friction;

            if self.vy.abs() < config.rest_epsilon {
                self.vy = 0.0;
            }
        }

        if self.x + self.radius > config.net_left() && self.x - self.radius < config.net_right() {
            if self.y + self.radius > config.net_top() {
                self.vx = -self.vx;
                if self.x < config.court_width / 2.0 {
                    self.x = config.net_left() - self.radius;
                } else {
                    self.x = config.net_right() + self.radius;
                }
            }
        }
    }

    /// Resolves a contact between the ball and a player's dome.
    ///
    /// Called once per player per tick, left player first. A hit that pushes
    /// the ball into the other player's contact radius is resolved by that
    /// player's check in the same tick; the cascade is intended.
    pub fn check_player_collision(&mut self, player: &Player, config: &GameConfig) {
        let (hx, hy) = player.hit_point();
        let dx = self.x - hx;
        let dy = self.y - hy;
        let distance = (dx * dx + dy * dy).sqrt();
        let contact_radius = self.radius + player.radius;

        if distance >= contact_radius {
            return;
        }

        let angle = dy.atan2(dx);

        // Spike: ball above an airborne, still-rising player gets slammed
        // down and outward instead of reflected along the contact angle.
        let spike = dy < -config.spike_margin && player.vy < 0.0 && !player.on_ground;

        if spike {
            let outward = if dx >= 0.0 { 1.0 } else { -1.0 };
            self.vx = outward * config.spike_force * config.spike_outward;
            self.vy = config.spike_force;
        } else {
            let mut force = config.hit_base_force;
            if player.vy < -config.rising_hit_threshold {
                force *= config.rising_hit_bonus;
            }
            if (player.vx * player.vx + player.vy * player.vy).sqrt() > config.fast_player_threshold
            {
                force *= config.fast_player_bonus;
            }
            if !player.on_ground {
                force *= config.airborne_bonus;
            }
            if dx.abs() < config.sweet_spot_half_width {
                force *= config.sweet_spot_bonus;
            }

            self.vx = angle.cos() * force;
            self.vy = angle.sin() * force - config.hit_lift;

            // Momentum transfer from the player, ignoring near-rest drift.
            if player.vx.abs() > config.momentum_threshold {
                self.vx += player.vx * config.momentum_transfer;
            }
            if player.vy < -config.momentum_threshold {
                self.vy += player.vy * config.momentum_transfer;
            }
        }

        self.spin = player.vx * config.spin_transfer;

        // Push the ball out along the contact angle so the same contact
        // cannot re-trigger next tick.
        let separation = contact_radius + config.separation_epsilon;
        self.x = hx + angle.cos() * separation;
        self.y = hy + angle.sin() * separation;

        self.clamp_speed(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_gravity_integration_from_rest() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.x = 400.0;
        ball.y = 50.0;
        ball.vx = 0.0;
        ball.vy = 0.0;
        ball.spin = 0.0;

        ball.update(&config);

        // One gravity step, damped, then integrated by the new velocity.
        assert_approx_eq!(ball.vy, config.ball_gravity * config.ball_damping, 1e-6);
        assert_approx_eq!(ball.y, 50.0 + ball.vy, 1e-6);
        assert_eq!(ball.vx, 0.0);
    }

    #[test]
    fn test_speed_never_exceeds_cap_after_update() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.vx = 40.0;
        ball.vy = -40.0;
        for _ in 0..10 {
            ball.update(&config);
            assert!(ball.speed() <= config.ball_max_speed + 1e-4);
        }
    }

    #[test]
    fn test_wall_bounce_loses_energy() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.x = config.ball_radius + 1.0;
        ball.y = 100.0;
        ball.vx = -3.0;
        ball.vy = 0.0;

        ball.update(&config);

        assert_eq!(ball.x, config.ball_radius);
        assert!(ball.vx > 0.0);
        assert!(ball.vx < 3.0);
    }

    #[test]
    fn test_ground_bounce_reflects_and_rubs_off_speed() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.x = 200.0;
        ball.y = config.ground_y - config.ball_radius - 0.5;
        ball.vx = 1.0;
        ball.vy = 2.0;

        ball.update(&config);

        assert_eq!(ball.y, config.ground_y - config.ball_radius);
        assert!(ball.vy < 0.0);
        assert!(ball.vy.abs() < 2.0);
        assert!(ball.vx.abs() < 1.0);
    }

    #[test]
    fn test_tiny_rebound_snaps_to_rest() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.x = 200.0;
        ball.y = config.ground_y - config.ball_radius;
        ball.vx = 0.0;
        ball.vy = 0.04;

        ball.update(&config);

        assert_eq!(ball.vy, 0.0);
    }

    #[test]
    fn test_net_deflects_ball_to_nearest_side() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.x = config.net_left() - config.ball_radius + 1.0;
        ball.y = config.ground_y - 20.0;
        ball.vx = 2.0;
        ball.vy = 0.0;

        ball.update(&config);

        assert!(ball.x <= config.net_left() - config.ball_radius);
        assert!(ball.vx < 0.0);
    }

    #[test]
    fn test_ball_above_net_passes_over() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.x = config.court_width / 2.0;
        ball.y = config.net_top() - config.ball_radius - 10.0;
        ball.vx = 2.0;
        ball.vy = 0.0;

        ball.update(&config);

        assert!(ball.vx > 0.0);
    }

    #[test]
    fn test_reset_serves_from_rest_on_each_side() {
        let config = config();
        let mut ball = Ball::new(&config);
        ball.vx = 3.0;
        ball.vy = 3.0;
        ball.spin = 1.0;

        ball.reset_to(Side::Left, &config);
        assert_approx_eq!(ball.x, config.serve_offset);
        assert_approx_eq!(ball.y, config.serve_height);
        assert_eq!((ball.vx, ball.vy, ball.spin), (0.0, 0.0, 0.0));

        ball.reset_to(Side::Right, &config);
        assert_approx_eq!(ball.x, config.court_width - config.serve_offset);
    }

    #[test]
    fn test_hit_on_grounded_player_pushes_ball_away() {
        let config = config();
        let player = Player::new(Side::Left, &config);
        let (hx, hy) = player.hit_point();

        let mut ball = Ball::new(&config);
        ball.x = hx + 20.0;
        ball.y = hy - 20.0;
        ball.vx = 0.0;
        ball.vy = 0.0;

        ball.check_player_collision(&player, &config);

        // Ball ends up outside the combined radius, to the player's right.
        assert!(ball.vx > 0.0);
        let dx = ball.x - hx;
        let dy = ball.y - hy;
        let distance = (dx * dx + dy * dy).sqrt();
        assert!(distance >= ball.radius + player.radius);
        assert!(ball.speed() <= config.ball_max_speed + 1e-4);
    }

    #[test]
    fn test_miss_leaves_ball_untouched() {
        let config = config();
        let player = Player::new(Side::Left, &config);
        let mut ball = Ball::new(&config);
        ball.x = 700.0;
        ball.y = 100.0;
        ball.vx = 1.0;
        ball.vy = 1.0;

        ball.check_player_collision(&player, &config);

        assert_approx_eq!(ball.vx, 1.0);
        assert_approx_eq!(ball.vy, 1.0);
    }

    #[test]
    fn test_collision_does_not_retrigger_next_tick() {
        let config = config();
        let player = Player::new(Side::Left, &config);
        let (hx, hy) = player.hit_point();

        let mut ball = Ball::new(&config);
        ball.x = hx + 10.0;
        ball.y = hy - 10.0;

        ball.check_player_collision(&player, &config);
        let vx = ball.vx;
        let vy = ball.vy;
        ball.check_player_collision(&player, &config);

        assert_approx_eq!(ball.vx, vx);
        assert_approx_eq!(ball.vy, vy);
    }

    #[test]
    fn test_spike_slams_ball_downward() {
        let config = config();
        let mut player = Player::new(Side::Left, &config);
        player.on_ground = false;
        player.vy = -4.0;
        player.y = 200.0;
        let (hx, hy) = player.hit_point();

        let mut ball = Ball::new(&config);
        ball.x = hx + 5.0;
        ball.y = hy - 30.0;

        ball.check_player_collision(&player, &config);

        assert!(ball.vy > 0.0, "spike must send the ball downward");
        assert!(ball.vx > 0.0, "spike must send the ball outward");
    }

    #[test]
    fn test_grounded_player_never_spikes() {
        let config = config();
        let player = Player::new(Side::Left, &config);
        let (hx, hy) = player.hit_point();

        let mut ball = Ball::new(&config);
        ball.x = hx;
        ball.y = hy - 30.0;

        ball.check_player_collision(&player, &config);

        // Normal hit from below the contact sends the ball upward.
        assert!(ball.vy < 0.0);
    }

    #[test]
    fn test_sweet_spot_hits_harder_than_edge_hits() {
        let config = config();
        let player = Player::new(Side::Left, &config);
        let (hx, hy) = player.hit_point();

        let mut center = Ball::new(&config);
        center.x = hx + 2.0;
        center.y = hy - 40.0;
        center.check_player_collision(&player, &config);

        let mut edge = Ball::new(&config);
        edge.x = hx + 30.0;
        edge.y = hy - 30.0;
        edge.check_player_collision(&player, &config);

        assert!(center.speed() > edge.speed());
    }

    #[test]
    fn test_moving_player_transfers_momentum() {
        let config = config();
        let mut player = Player::new(Side::Left, &config);
        player.vx = config.player_speed;
        let (hx, hy) = player.hit_point();

        let mut moving_hit = Ball::new(&config);
        moving_hit.x = hx + 20.0;
        moving_hit.y = hy - 20.0;
        moving_hit.check_player_collision(&player, &config);

        player.vx = 0.0;
        let mut still_hit = Ball::new(&config);
        still_hit.x = hx + 20.0;
        still_hit.y = hy - 20.0;
        still_hit.check_player_collision(&player, &config);

        assert!(moving_hit.vx > still_hit.vx);
    }

    #[test]
    fn test_hit_imparts_spin_from_player_velocity() {
        let config = config();
        let mut player = Player::new(Side::Left, &config);
        player.vx = 2.0;
        let (hx, hy) = player.hit_point();

        let mut ball = Ball::new(&config);
        ball.x = hx + 20.0;
        ball.y = hy - 20.0;
        ball.check_player_collision(&player, &config);

        assert_approx_eq!(ball.spin, 2.0 * config.spin_transfer);

        let spin_before = ball.spin;
        ball.update(&config);
        assert!(ball.spin.abs() < spin_before.abs());
    }
}
