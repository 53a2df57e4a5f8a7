mod game;
mod input;
mod net;
mod rendering;

use clap::Parser;
use game::{App, Role, Session};
use input::InputRouter;
use log::info;
use macroquad::prelude::*;
use net::Transport;
use rendering::{HudInfo, Renderer};
use shared::GameConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host a match: listen for the peer on this port
    #[arg(short = 'l', long, conflicts_with = "connect")]
    listen: Option<u16>,

    /// Join a hosted match at this address (e.g. 192.168.1.10:7777)
    #[arg(short = 'c', long)]
    connect: Option<String>,
}

fn window_conf() -> Conf {
    let config = GameConfig::default();
    Conf {
        window_title: "Volley".to_string(),
        window_width: config.court_width as i32,
        window_height: config.court_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let session = if let Some(port) = args.listen {
        info!("Hosting on port {}", port);
        Some(Session::new(Role::Host, Transport::host(port)))
    } else if let Some(addr) = args.connect {
        info!("Joining {}", addr);
        Some(Session::new(Role::Guest, Transport::connect(addr)))
    } else {
        info!("Local play: P1 A/D/W, P2 arrows, Enter to start, R to reset");
        None
    };

    let mut app = App::new(GameConfig::default(), session);
    let mut router = InputRouter::new();
    let renderer = Renderer::new();

    loop {
        if is_key_down(KeyCode::Escape) {
            break;
        }

        let frame = router.sample();
        app.handle_frame(get_frame_time(), frame);

        let hud = HudInfo {
            mode_label: match app.role() {
                Some(Role::Host) => "Host (Blue)".to_string(),
                Some(Role::Guest) => "Guest (Red)".to_string(),
                None => "Local Play".to_string(),
            },
            local_side: app.role().map(Role::local_side),
            rtt_ms: app.rtt_ms(),
            status: app.status.clone(),
        };
        renderer.draw(&app.game, &hud);

        next_frame().await;
    }
}
