//! Simulation core and wire protocol shared by every play mode.
//!
//! Holds the deterministic pieces both peers must agree on: the tunable
//! constant set, the player and ball actors, the match state machine, and
//! the packet definitions exchanged over the peer link. Nothing in here
//! touches a socket or a display surface.

pub mod ball;
pub mod config;
pub mod game;
pub mod player;
pub mod protocol;

pub use ball::Ball;
pub use config::GameConfig;
pub use game::{Match, Outcome, Phase};
pub use player::{Intent, Player, Side};
pub use protocol::{guest_snapshot, host_snapshot, timestamp_ms, BodyState, Packet};
