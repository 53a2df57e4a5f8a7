//! Match state machine: owns both players and the ball, runs the scoring
//! and countdown rules on top of the actor simulation.

use crate::ball::Ball;
use crate::config::GameConfig;
use crate::player::{Player, Side};
use log::info;
use rand::Rng;

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scores and timer are reset, simulation is not advancing.
    Idle,
    Running,
    /// Timer reached zero; simulation stopped, banner shown.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub config: GameConfig,
    /// Indexed by `Side::index()`: left first.
    pub players: [Player; 2],
    pub ball: Ball,
    pub scores: [u32; 2],
    /// Whole seconds left on the clock.
    pub time_remaining: u32,
    pub phase: Phase,
    time_accumulator: f32,
}

impl Match {
    pub fn new(config: GameConfig) -> Self {
        let players = [
            Player::new(Side::Left, &config),
            Player::new(Side::Right, &config),
        ];
        let ball = Ball::new(&config);
        let time_remaining = config.match_seconds;
        Match {
            config,
            players,
            ball,
            scores: [0, 0],
            time_remaining,
            phase: Phase::Idle,
            time_accumulator: 0.0,
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Begins play. Only an idle match can start; an ended one must be
    /// reset first.
    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            info!("Match started");
            self.phase = Phase::Running;
            self.time_accumulator = 0.0;
        }
    }

    /// Forces the match back to `Idle`: zero scores, full clock, both
    /// players on their spawn points, fresh serve.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        info!("Match reset");
        self.phase = Phase::Idle;
        self.scores = [0, 0];
        self.time_remaining = self.config.match_seconds;
        self.time_accumulator = 0.0;
        let config = self.config.clone();
        for player in &mut self.players {
            player.respawn(&config);
        }
        self.ball.reset(rng, &config);
    }

    /// Stops a running match without touching scores, used on link loss.
    pub fn abort(&mut self) {
        if self.phase == Phase::Running {
            info!("Match aborted");
            self.phase = Phase::Idle;
        }
    }

    /// Accumulates real elapsed time and counts the clock down at 1 Hz.
    /// Transitions to `Ended` when the clock runs out.
    pub fn advance_timer(&mut self, dt: f32) {
        if self.phase != Phase::Running {
            return;
        }
        self.time_accumulator += dt;
        if self.time_accumulator >= 1.0 {
            self.time_accumulator = 0.0;
            self.time_remaining = self.time_remaining.saturating_sub(1);
            if self.time_remaining == 0 {
                info!(
                    "Match ended {} - {}",
                    self.scores[0], self.scores[1]
                );
                self.phase = Phase::Ended;
            }
        }
    }

    /// Advances both players one tick from their current intents.
    pub fn step_players(&mut self) {
        let config = self.config.clone();
        for player in &mut self.players {
            player.update(&config);
        }
    }

    /// Advances only one side's player, used by the guest for its own actor.
    pub fn step_player(&mut self, side: Side) {
        let config = self.config.clone();
        self.players[side.index()].update(&config);
    }

    /// Advances the ball, resolves contacts against both players in fixed
    /// left-then-right order, and applies goal scoring.
    pub fn step_ball<R: Rng>(&mut self, rng: &mut R) {
        let config = self.config.clone();
        self.ball.update(&config);
        self.ball
            .check_player_collision(&self.players[Side::Left.index()], &config);
        self.ball
            .check_player_collision(&self.players[Side::Right.index()], &config);
        self.check_goal(rng);
    }

    /// One full authoritative tick: timer, players, ball, scoring.
    pub fn step<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if self.phase != Phase::Running {
            return;
        }
        self.advance_timer(dt);
        if self.phase != Phase::Running {
            return;
        }
        self.step_players();
        self.step_ball(rng);
    }

    /// Scores exactly one side when the ball touches down strictly on one
    /// half of the court, then serves again from a random side.
    fn check_goal<R: Rng>(&mut self, rng: &mut R) {
        if self.ball.y + self.ball.radius < self.config.ground_y {
            return;
        }
        let scorer = if self.ball.x < self.config.net_left() {
            Some(Side::Right)
        } else if self.ball.x > self.config.net_right() {
            Some(Side::Left)
        } else {
            None
        };
        if let Some(side) = scorer {
            self.scores[side.index()] += 1;
            info!(
                "Goal for {:?}: {} - {}",
                side, self.scores[0], self.scores[1]
            );
            let config = self.config.clone();
            self.ball.reset(rng, &config);
        }
    }

    /// Final result, meaningful once the match has ended.
    pub fn outcome(&self) -> Outcome {
        if self.scores[0] > self.scores[1] {
            Outcome::Winner(Side::Left)
        } else if self.scores[1] > self.scores[0] {
            Outcome::Winner(Side::Right)
        } else {
            Outcome::Draw
        }
    }
}
