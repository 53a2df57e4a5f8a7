//! Draws court, actors, and HUD from simulation state. Read-only: nothing
//! here mutates the match.

use macroquad::prelude::*;
use shared::{Ball, Match, Outcome, Phase, Player, Side};

/// HUD context that lives outside the match itself.
#[derive(Debug, Clone, Default)]
pub struct HudInfo {
    pub mode_label: String,
    /// Which side this client controls online; `None` in local play.
    pub local_side: Option<Side>,
    pub rtt_ms: Option<u64>,
    pub status: Option<String>,
}

const SKY: Color = Color::new(0.53, 0.81, 0.92, 1.0);
const GRASS: Color = Color::new(0.56, 0.93, 0.56, 1.0);
const NET_BROWN: Color = Color::new(0.40, 0.26, 0.13, 1.0);
const LEFT_BLUE: Color = Color::new(0.25, 0.41, 0.88, 1.0);
const RIGHT_RED: Color = Color::new(0.86, 0.08, 0.24, 1.0);
const BALL_GOLD: Color = Color::new(1.0, 0.84, 0.0, 1.0);

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Renderer
    }

    pub fn draw(&self, game: &Match, hud: &HudInfo) {
        self.draw_court(game);
        self.draw_player(game.player(Side::Left), LEFT_BLUE);
        self.draw_player(game.player(Side::Right), RIGHT_RED);
        self.draw_ball(&game.ball);
        self.draw_hud(game, hud);

        if game.phase == Phase::Ended {
            self.draw_game_over(game, hud);
        }
        if let Some(status) = &hud.status {
            self.draw_status(status);
        }
    }

    fn draw_court(&self, game: &Match) {
        let config = &game.config;
        clear_background(SKY);
        draw_rectangle(
            0.0,
            config.ground_y,
            config.court_width,
            config.court_height - config.ground_y,
            GRASS,
        );
        draw_rectangle(
            config.net_left(),
            config.net_top(),
            config.net_width,
            config.net_height,
            NET_BROWN,
        );
    }

    /// A player is a solid half-disc sitting on its flat edge, drawn as a
    /// triangle fan around the hit point.
    fn draw_player(&self, player: &Player, color: Color) {
        let (cx, cy) = player.hit_point();
        let segments = 24;
        for i in 0..segments {
            let a0 = std::f32::consts::PI + std::f32::consts::PI * i as f32 / segments as f32;
            let a1 = std::f32::consts::PI + std::f32::consts::PI * (i + 1) as f32 / segments as f32;
            draw_triangle(
                vec2(cx, cy),
                vec2(cx + a0.cos() * player.radius, cy + a0.sin() * player.radius),
                vec2(cx + a1.cos() * player.radius, cy + a1.sin() * player.radius),
                color,
            );
        }

        // Eyes face the net.
        let toward_net = match player.side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        };
        let eye_x = player.x + toward_net * 14.0;
        let eye_y = player.y + 18.0;
        draw_circle(eye_x, eye_y, 5.0, WHITE);
        draw_circle(eye_x + toward_net * 1.5, eye_y, 2.0, BLACK);
    }

    fn draw_ball(&self, ball: &Ball) {
        draw_circle(ball.x, ball.y, ball.radius, BALL_GOLD);
        draw_circle_lines(ball.x, ball.y, ball.radius, 2.0, ORANGE);
    }

    fn draw_hud(&self, game: &Match, hud: &HudInfo) {
        let config = &game.config;

        let score_left = format!("{}", game.score(Side::Left));
        let score_right = format!("{}", game.score(Side::Right));
        draw_text(&score_left, 40.0, 40.0, 48.0, LEFT_BLUE);
        draw_text(&score_right, config.court_width - 60.0, 40.0, 48.0, RIGHT_RED);

        let minutes = game.time_remaining / 60;
        let seconds = game.time_remaining % 60;
        let clock = format!("{}:{:02}", minutes, seconds);
        draw_text(&clock, config.court_width / 2.0 - 30.0, 40.0, 36.0, WHITE);

        draw_text(&hud.mode_label, 10.0, config.court_height - 10.0, 20.0, DARKGRAY);
        if let Some(rtt) = hud.rtt_ms {
            let ping = format!("Ping: {}ms", rtt);
            draw_text(
                &ping,
                config.court_width - 110.0,
                config.court_height - 10.0,
                20.0,
                DARKGRAY,
            );
        }

        if game.phase == Phase::Idle && hud.status.is_none() {
            draw_text(
                "Enter to start, R to reset",
                config.court_width / 2.0 - 120.0,
                config.court_height / 2.0,
                24.0,
                WHITE,
            );
        }
    }

    fn draw_game_over(&self, game: &Match, hud: &HudInfo) {
        let config = &game.config;
        draw_rectangle(
            0.0,
            0.0,
            config.court_width,
            config.court_height,
            Color::new(0.0, 0.0, 0.0, 0.7),
        );
        draw_text(
            "GAME OVER",
            config.court_width / 2.0 - 140.0,
            config.court_height / 2.0 - 30.0,
            56.0,
            WHITE,
        );
        let verdict = match game.outcome() {
            Outcome::Winner(side) => winner_text(side, hud.local_side),
            Outcome::Draw => "It's a draw!".to_string(),
        };
        draw_text(
            &verdict,
            config.court_width / 2.0 - 90.0,
            config.court_height / 2.0 + 20.0,
            36.0,
            WHITE,
        );
    }

    fn draw_status(&self, status: &str) {
        draw_text(status, 10.0, 70.0, 24.0, YELLOW);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn winner_text(side: Side, local_side: Option<Side>) -> String {
    match local_side {
        Some(local) if local == side => "You win!".to_string(),
        Some(_) => "You lose!".to_string(),
        None => match side {
            Side::Left => "Player 1 wins!".to_string(),
            Side::Right => "Player 2 wins!".to_string(),
        },
    }
}
