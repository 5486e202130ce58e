/// Compile-time game constants. Everything is measured in pixels of the
/// logical 800×640 canvas and in ticks of the 60 Hz loop.

use std::time::Duration;

// ── Canvas ────────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 640.0;

// ── Clock ─────────────────────────────────────────────────────────────────────

pub const TICK_RATE: u32 = 60;
pub const FRAME: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

// ── Car ───────────────────────────────────────────────────────────────────────

pub const CAR_WIDTH: f32 = 64.0;
pub const CAR_HEIGHT: f32 = 128.0;
pub const CAR_START_X: f32 = 400.0;
pub const CAR_START_Y: f32 = 480.0;
/// Horizontal pixels per tick while a direction key is held.
pub const CAR_SPEED: f32 = 5.0;
/// Ticks between sprite frame flips.
pub const ANIM_PERIOD: u32 = 10;
pub const CAR_FRAMES: usize = 2;

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// Obstacle hit box matches the car's.
pub const OBSTACLE_WIDTH: f32 = CAR_WIDTH;
pub const OBSTACLE_HEIGHT: f32 = CAR_HEIGHT;
pub const OBSTACLE_START_Y: f32 = -100.0;
pub const OBSTACLE_SPAWN_MIN_X: i32 = 100;
pub const OBSTACLE_SPAWN_MAX_X: i32 = 700;
pub const OBSTACLE_BASE_SPEED: f32 = 5.0;
/// Added to the obstacle speed on every recycle. No upper bound.
pub const OBSTACLE_SPEED_STEP: f32 = 0.2;

// ── Input ─────────────────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat arrived within this many
/// ticks. Must outlast the OS delay before key-repeat kicks in (~500 ms);
/// 36 ticks @ 60 Hz = 600 ms.
pub const HOLD_WINDOW: u64 = 36;
