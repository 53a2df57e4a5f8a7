//! Wire protocol between the two peers: serde records encoded with bincode.
//!
//! The channel is assumed ordered and reliable; snapshots carry no sequence
//! numbers and are applied last-write-wins.

use crate::ball::Ball;
use crate::game::Match;
use crate::player::{Intent, Player, Side};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Position and velocity of one moving body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl BodyState {
    pub fn of_player(player: &Player) -> Self {
        BodyState {
            x: player.x,
            y: player.y,
            vx: player.vx,
            vy: player.vy,
        }
    }

    pub fn of_ball(ball: &Ball) -> Self {
        BodyState {
            x: ball.x,
            y: ball.y,
            vx: ball.vx,
            vy: ball.vy,
        }
    }

    pub fn apply_to_player(&self, player: &mut Player) {
        player.x = self.x;
        player.y = self.y;
        player.vx = self.vx;
        player.vy = self.vy;
    }

    pub fn apply_to_ball(&self, ball: &mut Ball) {
        ball.x = self.x;
        ball.y = self.y;
        ball.vx = self.vx;
        ball.vy = self.vy;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Packet {
    /// Remote player's control intents, forwarded on every change.
    Input { intent: Intent },
    /// Authoritative host broadcast, emitted every second host tick.
    HostState {
        ball: BodyState,
        host_player: BodyState,
        score_left: u32,
        score_right: u32,
        time_remaining: u32,
    },
    /// Guest's self-simulated player, emitted every guest tick.
    GuestState { guest_player: BodyState },
    /// Match control, relayed verbatim and applied as if issued locally.
    Start,
    Reset,
    /// Heartbeat; the receiver echoes the timestamp back as `Pong`.
    Ping { time: u64 },
    Pong { time: u64 },
}

/// Captures the host's authoritative view of a match.
pub fn host_snapshot(game: &Match) -> Packet {
    Packet::HostState {
        ball: BodyState::of_ball(&game.ball),
        host_player: BodyState::of_player(game.player(Side::Left)),
        score_left: game.score(Side::Left),
        score_right: game.score(Side::Right),
        time_remaining: game.time_remaining,
    }
}

/// Captures the guest's view of its own player.
pub fn guest_snapshot(game: &Match) -> Packet {
    Packet::GuestState {
        guest_player: BodyState::of_player(game.player(Side::Right)),
    }
}

/// Current wall-clock time in milliseconds, used for heartbeat timestamps.
pub fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}
