//! # Volleyball Client
//!
//! The playable program for the two-player arcade volleyball game, covering
//! all three play modes on top of the `shared` simulation core:
//!
//! - **Local**: both players on one keyboard, full simulation locally.
//! - **Host**: runs the authoritative simulation (both players, ball,
//!   scoring, clock) and broadcasts a full snapshot every second tick.
//! - **Guest**: simulates only its own player for responsiveness, sends
//!   that state every tick, and mirrors everything else from the host's
//!   snapshots, last write wins.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The frame driver. Pumps network events between ticks, routes control
//! intents to the right actor (or onto the wire), advances the match for
//! the active mode, and keeps the heartbeat alive. Link loss aborts the
//! running match and returns to the pre-match state.
//!
//! ### Input Module (`input`)
//! Per-player key-binding tables sampled once per frame into fixed-shape
//! intent records, with edge-detected start/reset command keys. In online
//! mode both binding sets drive the single local player.
//!
//! ### Net Module (`net`)
//! The peer link: one TCP connection carrying length-prefixed bincode
//! frames. A dedicated network thread owns the socket and a tokio runtime;
//! the game loop exchanges packets with it over channels and never blocks.
//!
//! ### Rendering Module (`rendering`)
//! macroquad drawing of the court, net, both players, ball, and HUD
//! (scores, clock, ping, end-of-match banner). Consumes state, never
//! mutates it.
//!
//! ## Synchronization Model
//!
//! The host is authoritative for ball physics, scoring, and the clock.
//! The guest's own movement is self-authoritative so input feels
//! immediate; its view of everything else jumps to each received snapshot.
//! Control messages (`start`, `reset`) are relayed verbatim and applied
//! identically on both sides, keeping the two match state machines in
//! lockstep for discrete transitions. Snapshots carry no sequence numbers;
//! the ordered TCP link stands in for causal ordering.

pub mod game;
pub mod input;
pub mod net;
pub mod rendering;
