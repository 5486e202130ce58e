/// Rendering layer — all terminal I/O lives here.
///
/// `compose` turns an immutable view of the game state into a `Canvas`;
/// `render` writes that canvas to the terminal. No game logic is performed.

mod canvas;

pub use canvas::{Canvas, Cell};

use std::io::Write;

use crossterm::style::Color;

use crate::assets::Assets;
use crate::compute::{car_rect, obstacle_rect};
use crate::entities::{GameState, Screen};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::White;
const C_PROMPT: Color = Color::White;
const C_BEST: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_CAR: Color = Color::Yellow;
const C_OBSTACLE: Color = Color::Red;
const C_SCORE: Color = Color::White;
const C_GAME_OVER: Color = Color::Red;

const CONTROLS_HINT: &str = "← → / A D : Steer   Q : Quit";

// ── Public entry points ───────────────────────────────────────────────────────

/// Build one complete frame for the current screen.
pub fn compose(state: &GameState, assets: &Assets, cols: u16, rows: u16) -> Canvas {
    let mut canvas = Canvas::new(cols, rows);
    match state.screen {
        Screen::Start => draw_start(&mut canvas, state),
        Screen::Play => draw_play(&mut canvas, state, assets),
        Screen::GameOver => draw_game_over(&mut canvas, state),
    }
    canvas
}

pub fn render<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    canvas.flush(out)
}

// ── Screens ───────────────────────────────────────────────────────────────────

/// Lines stacked around the vertical middle of the grid.
fn draw_block(canvas: &mut Canvas, lines: &[(String, Color)]) {
    let start_row = (canvas.rows() as i32 - lines.len() as i32) / 2;
    for (i, (msg, color)) in lines.iter().enumerate() {
        canvas.text_centered(start_row.max(0) + i as i32, msg, *color);
    }
}

fn draw_controls_hint(canvas: &mut Canvas) {
    canvas.text(1, canvas.rows() as i32 - 1, CONTROLS_HINT, C_HINT);
}

fn draw_start(canvas: &mut Canvas, state: &GameState) {
    let mut lines = vec![
        ("Car Game".to_string(), C_TITLE),
        (String::new(), C_TITLE),
        ("Press SPACE to Start".to_string(), C_PROMPT),
    ];
    if state.best > 0 {
        lines.push((format!("Best Score: {}", state.best), C_BEST));
    }
    draw_block(canvas, &lines);
    draw_controls_hint(canvas);
}

/// Map under the entities, score on top.
fn draw_play(canvas: &mut Canvas, state: &GameState, assets: &Assets) {
    canvas.draw_map(&assets.map);
    canvas.blit(assets.car.frame(state.car.frame), car_rect(&state.car), C_CAR);
    canvas.blit(&assets.obstacle, obstacle_rect(&state.obstacle), C_OBSTACLE);

    let col = canvas.col_for(10.0);
    let row = canvas.row_for(10.0);
    canvas.text(col, row, &format!("Score: {}", state.score), C_SCORE);
}

fn draw_game_over(canvas: &mut Canvas, state: &GameState) {
    let lines = vec![
        ("Game Over!".to_string(), C_GAME_OVER),
        (String::new(), C_GAME_OVER),
        (format!("Score: {}", state.score), C_PROMPT),
        (format!("Best Score: {}", state.best), C_BEST),
        (String::new(), C_PROMPT),
        ("Press R to Restart".to_string(), C_PROMPT),
    ];
    draw_block(canvas, &lines);
    draw_controls_hint(canvas);
}
