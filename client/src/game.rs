//! Per-frame game driver: routes input, advances the simulation for the
//! active play mode, and keeps the peer session in sync.

use crate::input::FrameInput;
use crate::net::{NetEvent, Transport};
use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use shared::{
    guest_snapshot, host_snapshot, timestamp_ms, GameConfig, Intent, Match, Packet, Side,
};

/// Which end of the peer link this client is. Fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Runs the authoritative simulation and plays the left side.
    Host,
    /// Simulates only its own player and plays the right side.
    Guest,
}

impl Role {
    pub fn local_side(self) -> Side {
        match self {
            Role::Host => Side::Left,
            Role::Guest => Side::Right,
        }
    }

    pub fn remote_side(self) -> Side {
        self.local_side().opposite()
    }
}

/// An open (or opening) peer link plus its liveness bookkeeping.
pub struct Session {
    pub role: Role,
    pub transport: Transport,
    pub connected: bool,
    pub rtt_ms: Option<u64>,
    ping_timer: f32,
    pong_age: f32,
}

impl Session {
    pub fn new(role: Role, transport: Transport) -> Self {
        Session {
            role,
            transport,
            connected: false,
            rtt_ms: None,
            ping_timer: 0.0,
            pong_age: 0.0,
        }
    }
}

/// The playable application: one match, optionally one peer session.
pub struct App {
    pub game: Match,
    pub session: Option<Session>,
    /// Connection status line for the HUD, if any.
    pub status: Option<String>,
    sync_counter: u32,
    last_sent_intent: Intent,
    rng: ThreadRng,
}

impl App {
    pub fn new(config: GameConfig, session: Option<Session>) -> Self {
        App {
            game: Match::new(config),
            session,
            status: None,
            sync_counter: 0,
            last_sent_intent: Intent::default(),
            rng: rand::thread_rng(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    pub fn rtt_ms(&self) -> Option<u64> {
        self.session.as_ref().and_then(|s| s.rtt_ms)
    }

    /// Runs one frame: inbound network events, commands, input routing,
    /// simulation tick, outbound sync, heartbeat.
    pub fn handle_frame(&mut self, dt: f32, frame: FrameInput) {
        self.pump_network();
        self.handle_commands(&frame);
        self.route_input(&frame);
        self.tick_simulation(dt);
        self.tick_heartbeat(dt);
    }

    /// Applies every event the network thread delivered since last frame.
    /// Inbound state lands between ticks, never inside one.
    fn pump_network(&mut self) {
        loop {
            let event = match self.session.as_ref().and_then(|s| s.transport.poll()) {
                Some(event) => event,
                None => return,
            };
            match event {
                NetEvent::Listening(addr) => {
                    self.status = Some(format!("Waiting for peer on {}", addr));
                }
                NetEvent::Connected => {
                    info!("Peer link open");
                    if let Some(session) = self.session.as_mut() {
                        session.connected = true;
                        session.pong_age = 0.0;
                    }
                    self.status = None;
                }
                NetEvent::Packet(packet) => self.handle_packet(packet),
                NetEvent::Disconnected(reason) => {
                    self.drop_session(&reason);
                    return;
                }
            }
        }
    }

    fn handle_packet(&mut self, packet: Packet) {
        let role = match self.session.as_ref() {
            Some(session) => session.role,
            None => return,
        };
        match packet {
            Packet::Input { intent } => {
                self.game.player_mut(role.remote_side()).intent = intent;
            }
            Packet::HostState {
                ball,
                host_player,
                score_left,
                score_right,
                time_remaining,
            } => {
                // Last write wins; the guest mirrors whatever the host says.
                if role == Role::Guest {
                    ball.apply_to_ball(&mut self.game.ball);
                    host_player.apply_to_player(self.game.player_mut(Side::Left));
                    self.game.scores = [score_left, score_right];
                    self.game.time_remaining = time_remaining;
                }
            }
            Packet::GuestState { guest_player } => {
                if role == Role::Host {
                    guest_player.apply_to_player(self.game.player_mut(Side::Right));
                }
            }
            Packet::Start => self.game.start(),
            Packet::Reset => self.game.reset(&mut self.rng),
            Packet::Ping { time } => self.send(Packet::Pong { time }),
            Packet::Pong { time } => {
                if let Some(session) = self.session.as_mut() {
                    session.rtt_ms = Some(timestamp_ms().saturating_sub(time));
                    session.pong_age = 0.0;
                    debug!("RTT {:?} ms", session.rtt_ms);
                }
            }
        }
    }

    /// Start/reset are applied locally and relayed verbatim so both match
    /// state machines take the transition.
    fn handle_commands(&mut self, frame: &FrameInput) {
        if frame.start {
            self.game.start();
            self.send(Packet::Start);
        }
        if frame.reset {
            self.game.reset(&mut self.rng);
            self.send(Packet::Reset);
        }
    }

    fn route_input(&mut self, frame: &FrameInput) {
        match self.role() {
            None => {
                self.game.player_mut(Side::Left).intent = frame.p1;
                self.game.player_mut(Side::Right).intent = frame.p2;
            }
            Some(role) => {
                let intent = frame.merged_intent();
                self.game.player_mut(role.local_side()).intent = intent;
                if intent != self.last_sent_intent {
                    self.send(Packet::Input { intent });
                    self.last_sent_intent = intent;
                }
            }
        }
    }

    fn tick_simulation(&mut self, dt: f32) {
        if !self.game.is_running() {
            return;
        }
        match self.role() {
            // Local play and host both run the full authoritative tick.
            None => self.game.step(dt, &mut self.rng),
            Some(Role::Host) => {
                self.game.step(dt, &mut self.rng);
                self.sync_counter += 1;
                if self.sync_counter >= self.game.config.snapshot_interval {
                    self.sync_counter = 0;
                    self.send(host_snapshot(&self.game));
                }
            }
            Some(Role::Guest) => {
                // Self-authoritative movement only; ball and host player
                // stay wherever the last snapshot put them.
                self.game.advance_timer(dt);
                self.game.step_player(Role::Guest.local_side());
                self.send(guest_snapshot(&self.game));
            }
        }
    }

    fn tick_heartbeat(&mut self, dt: f32) {
        let timed_out = match self.session.as_mut() {
            Some(session) if session.connected => {
                session.ping_timer += dt;
                session.pong_age += dt;
                if session.ping_timer >= self.game.config.heartbeat_secs {
                    session.ping_timer = 0.0;
                    let time = timestamp_ms();
                    session.transport.send(Packet::Ping { time });
                }
                session.pong_age > self.game.config.heartbeat_timeout_secs
            }
            _ => false,
        };
        if timed_out {
            self.drop_session("heartbeat timed out");
        }
    }

    fn send(&self, packet: Packet) {
        if let Some(session) = self.session.as_ref() {
            if session.connected {
                session.transport.send(packet);
            }
        }
    }

    /// Link loss is fatal to the match: stop play, tear the session down,
    /// surface the reason on the HUD.
    fn drop_session(&mut self, reason: &str) {
        warn!("Peer link lost: {}", reason);
        self.game.abort();
        self.session = None;
        self.status = Some(format!("Connection lost: {}", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetEvent;
    use assert_approx_eq::assert_approx_eq;
    use shared::{BodyState, Phase};
    use std::sync::mpsc as std_mpsc;
    use tokio::sync::mpsc;

    const DT: f32 = 1.0 / 60.0;

    struct Harness {
        app: App,
        outbound: mpsc::UnboundedReceiver<Packet>,
        inbound: std_mpsc::Sender<NetEvent>,
    }

    /// Builds an app wired to in-memory channels instead of a socket.
    fn online_app(role: Role) -> Harness {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = std_mpsc::channel();
        let transport = Transport::from_parts(out_tx, in_rx);
        let mut session = Session::new(role, transport);
        session.connected = true;
        let app = App::new(GameConfig::default(), Some(session));
        Harness {
            app,
            outbound: out_rx,
            inbound: in_tx,
        }
    }

    fn sent_packets(harness: &mut Harness) -> Vec<Packet> {
        let mut packets = Vec::new();
        while let Ok(packet) = harness.outbound.try_recv() {
            packets.push(packet);
        }
        packets
    }

    #[test]
    fn test_local_mode_routes_both_intent_sets() {
        let mut app = App::new(GameConfig::default(), None);
        let frame = FrameInput {
            p1: Intent {
                move_right: true,
                ..Intent::default()
            },
            p2: Intent {
                move_left: true,
                ..Intent::default()
            },
            start: false,
            reset: false,
        };
        app.handle_frame(DT, frame);
        assert!(app.game.player(Side::Left).intent.move_right);
        assert!(app.game.player(Side::Right).intent.move_left);
    }

    #[test]
    fn test_start_command_begins_local_match() {
        let mut app = App::new(GameConfig::default(), None);
        let frame = FrameInput {
            start: true,
            ..FrameInput::default()
        };
        app.handle_frame(DT, frame);
        assert_eq!(app.game.phase, Phase::Running);
    }

    #[test]
    fn test_intent_changes_are_relayed_once() {
        let mut harness = online_app(Role::Host);
        let moving = FrameInput {
            p1: Intent {
                move_right: true,
                ..Intent::default()
            },
            ..FrameInput::default()
        };

        harness.app.handle_frame(DT, moving);
        harness.app.handle_frame(DT, moving);

        let inputs: Vec<_> = sent_packets(&mut harness)
            .into_iter()
            .filter(|p| matches!(p, Packet::Input { .. }))
            .collect();
        assert_eq!(inputs.len(), 1, "unchanged intent must not be re-sent");

        harness.app.handle_frame(DT, FrameInput::default());
        let inputs: Vec<_> = sent_packets(&mut harness)
            .into_iter()
            .filter(|p| matches!(p, Packet::Input { .. }))
            .collect();
        assert_eq!(inputs.len(), 1, "releasing the key sends the new intent");
    }

    #[test]
    fn test_host_snapshots_every_second_tick() {
        let mut harness = online_app(Role::Host);
        harness.app.handle_frame(
            DT,
            FrameInput {
                start: true,
                ..FrameInput::default()
            },
        );
        for _ in 0..4 {
            harness.app.handle_frame(DT, FrameInput::default());
        }

        let snapshots = sent_packets(&mut harness)
            .into_iter()
            .filter(|p| matches!(p, Packet::HostState { .. }))
            .count();
        assert_eq!(snapshots, 2);
    }

    #[test]
    fn test_guest_sends_its_player_every_tick() {
        let mut harness = online_app(Role::Guest);
        harness.inbound.send(NetEvent::Packet(Packet::Start)).unwrap();
        harness.app.handle_frame(DT, FrameInput::default());
        for _ in 0..3 {
            harness.app.handle_frame(DT, FrameInput::default());
        }

        let snapshots = sent_packets(&mut harness)
            .into_iter()
            .filter(|p| matches!(p, Packet::GuestState { .. }))
            .count();
        assert_eq!(snapshots, 4);
    }

    #[test]
    fn test_guest_moves_locally_while_rest_stays_frozen() {
        let mut harness = online_app(Role::Guest);
        harness.inbound.send(NetEvent::Packet(Packet::Start)).unwrap();

        let frame = FrameInput {
            p2: Intent {
                move_right: true,
                ..Intent::default()
            },
            ..FrameInput::default()
        };
        let ball_before = harness.app.game.ball.clone();
        let host_x = harness.app.game.player(Side::Left).x;
        let guest_x = harness.app.game.player(Side::Right).x;

        for _ in 0..5 {
            harness.app.handle_frame(DT, frame);
        }

        assert!(harness.app.game.player(Side::Right).x > guest_x);
        assert_eq!(harness.app.game.player(Side::Left).x, host_x);
        assert_eq!(harness.app.game.ball.x, ball_before.x);
        assert_eq!(harness.app.game.ball.y, ball_before.y);
    }

    #[test]
    fn test_guest_applies_host_snapshot_wholesale() {
        let mut harness = online_app(Role::Guest);
        let snapshot = Packet::HostState {
            ball: BodyState {
                x: 321.0,
                y: 77.0,
                vx: 1.5,
                vy: -0.5,
            },
            host_player: BodyState {
                x: 250.0,
                y: 280.0,
                vx: 2.0,
                vy: 0.0,
            },
            score_left: 3,
            score_right: 4,
            time_remaining: 99,
        };
        harness.inbound.send(NetEvent::Packet(snapshot)).unwrap();
        harness.app.handle_frame(DT, FrameInput::default());

        let game = &harness.app.game;
        assert_approx_eq!(game.ball.x, 321.0);
        assert_approx_eq!(game.player(Side::Left).x, 250.0);
        assert_eq!(game.scores, [3, 4]);
        assert_eq!(game.time_remaining, 99);
    }

    #[test]
    fn test_host_applies_guest_snapshot_to_right_player_only() {
        let mut harness = online_app(Role::Host);
        let left_before = harness.app.game.player(Side::Left).clone();
        harness
            .inbound
            .send(NetEvent::Packet(Packet::GuestState {
                guest_player: BodyState {
                    x: 710.0,
                    y: 300.0,
                    vx: -2.0,
                    vy: 0.0,
                },
            }))
            .unwrap();
        harness.app.handle_frame(DT, FrameInput::default());

        assert_approx_eq!(harness.app.game.player(Side::Right).x, 710.0);
        assert_eq!(harness.app.game.player(Side::Left).x, left_before.x);
        assert_eq!(harness.app.game.scores, [0, 0]);
    }

    #[test]
    fn test_remote_intent_mirrors_onto_remote_player() {
        let mut harness = online_app(Role::Host);
        harness
            .inbound
            .send(NetEvent::Packet(Packet::Input {
                intent: Intent {
                    jump: true,
                    ..Intent::default()
                },
            }))
            .unwrap();
        harness.app.handle_frame(DT, FrameInput::default());
        assert!(harness.app.game.player(Side::Right).intent.jump);
    }

    #[test]
    fn test_ping_is_echoed_as_pong() {
        let mut harness = online_app(Role::Host);
        harness
            .inbound
            .send(NetEvent::Packet(Packet::Ping { time: 42 }))
            .unwrap();
        harness.app.handle_frame(DT, FrameInput::default());

        let pongs: Vec<_> = sent_packets(&mut harness)
            .into_iter()
            .filter(|p| matches!(p, Packet::Pong { time: 42 }))
            .collect();
        assert_eq!(pongs.len(), 1);
    }

    #[test]
    fn test_disconnect_aborts_running_match() {
        let mut harness = online_app(Role::Host);
        harness.app.handle_frame(
            DT,
            FrameInput {
                start: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(harness.app.game.phase, Phase::Running);

        harness
            .inbound
            .send(NetEvent::Disconnected("peer closed the connection".into()))
            .unwrap();
        harness.app.handle_frame(DT, FrameInput::default());

        assert_eq!(harness.app.game.phase, Phase::Idle);
        assert!(harness.app.session.is_none());
        assert!(harness.app.status.as_deref().unwrap_or("").contains("lost"));
    }

    #[test]
    fn test_heartbeat_silence_drops_the_session() {
        let mut harness = online_app(Role::Host);
        let timeout = harness.app.game.config.heartbeat_timeout_secs;
        // No pongs ever arrive; walk past the timeout in one-second steps.
        let steps = timeout as usize + 2;
        for _ in 0..steps {
            harness.app.handle_frame(1.0, FrameInput::default());
        }
        assert!(harness.app.session.is_none());
    }

    #[test]
    fn test_remote_reset_matches_local_reset() {
        let mut harness = online_app(Role::Guest);
        harness.inbound.send(NetEvent::Packet(Packet::Start)).unwrap();
        harness.app.handle_frame(DT, FrameInput::default());
        harness.app.game.scores = [2, 2];

        harness.inbound.send(NetEvent::Packet(Packet::Reset)).unwrap();
        harness.app.handle_frame(DT, FrameInput::default());

        assert_eq!(harness.app.game.phase, Phase::Idle);
        assert_eq!(harness.app.game.scores, [0, 0]);
        assert_eq!(
            harness.app.game.time_remaining,
            harness.app.game.config.match_seconds
        );
    }
}
