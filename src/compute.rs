/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// value.  Side effects are limited to the injected RNG and log output.

use rand::Rng;
use tracing::{debug, info, trace};

use crate::config::{
    ANIM_PERIOD, CAR_FRAMES, CAR_HEIGHT, CAR_SPEED, CAR_START_X, CAR_START_Y, CAR_WIDTH,
    OBSTACLE_BASE_SPEED, OBSTACLE_HEIGHT, OBSTACLE_SPAWN_MAX_X, OBSTACLE_SPAWN_MIN_X,
    OBSTACLE_SPEED_STEP, OBSTACLE_START_Y, OBSTACLE_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::entities::{Car, Controls, GameState, Obstacle, Rect, Screen, SoundCue, Trigger};
use crate::machine::{transition, Effect, Transition};

/// Result of feeding one trigger or one tick into the game.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub state: GameState,
    pub cue: Option<SoundCue>,
    pub quit: bool,
}

impl Outcome {
    fn unchanged(state: &GameState) -> Self {
        Outcome {
            state: state.clone(),
            cue: None,
            quit: false,
        }
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

fn new_car() -> Car {
    Car {
        x: CAR_START_X,
        y: CAR_START_Y,
        frame: 0,
        anim_timer: 0,
    }
}

fn spawn_obstacle(speed: f32, rng: &mut impl Rng) -> Obstacle {
    Obstacle {
        x: rng.gen_range(OBSTACLE_SPAWN_MIN_X..=OBSTACLE_SPAWN_MAX_X) as f32,
        y: OBSTACLE_START_Y,
        speed,
    }
}

/// Build the state the program starts in: the start menu, with the round
/// entities already at their initial values.
pub fn init_state(rng: &mut impl Rng) -> GameState {
    GameState {
        screen: Screen::Start,
        car: new_car(),
        obstacle: spawn_obstacle(OBSTACLE_BASE_SPEED, rng),
        score: 0,
        best: 0,
    }
}

/// Reset car, obstacle (position and speed) and score in one step.
/// Screen and session best are left alone.
pub fn reset_round(state: &GameState, rng: &mut impl Rng) -> GameState {
    GameState {
        car: new_car(),
        obstacle: spawn_obstacle(OBSTACLE_BASE_SPEED, rng),
        score: 0,
        ..state.clone()
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

pub fn car_rect(car: &Car) -> Rect {
    Rect {
        x: car.x,
        y: car.y,
        w: CAR_WIDTH,
        h: CAR_HEIGHT,
    }
}

pub fn obstacle_rect(obstacle: &Obstacle) -> Rect {
    Rect {
        x: obstacle.x,
        y: obstacle.y,
        w: OBSTACLE_WIDTH,
        h: OBSTACLE_HEIGHT,
    }
}

/// Strict overlap on both axes. Rectangles that only share an edge do not
/// overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

pub fn collides(state: &GameState) -> bool {
    overlaps(&car_rect(&state.car), &obstacle_rect(&state.obstacle))
}

// ── Car ──────────────────────────────────────────────────────────────────────

pub fn move_car_left(state: &GameState) -> GameState {
    if state.car.x <= 0.0 {
        return state.clone();
    }
    GameState {
        car: Car {
            x: (state.car.x - CAR_SPEED).max(0.0),
            ..state.car.clone()
        },
        ..state.clone()
    }
}

pub fn move_car_right(state: &GameState) -> GameState {
    let max_x = SCREEN_WIDTH - CAR_WIDTH;
    if state.car.x >= max_x {
        return state.clone();
    }
    GameState {
        car: Car {
            x: (state.car.x + CAR_SPEED).min(max_x),
            ..state.car.clone()
        },
        ..state.clone()
    }
}

/// Bump the animation timer and flip to the next sprite frame every
/// `ANIM_PERIOD` ticks.
pub fn advance_animation(car: &Car) -> Car {
    let anim_timer = car.anim_timer + 1;
    let frame = if anim_timer % ANIM_PERIOD == 0 {
        (car.frame + 1) % CAR_FRAMES
    } else {
        car.frame
    };
    Car {
        frame,
        anim_timer,
        ..car.clone()
    }
}

// ── Obstacle ─────────────────────────────────────────────────────────────────

/// Move the obstacle down by its speed. Once it is past the bottom edge it
/// is recycled: respawned at the top, one point scored, speed raised.
pub fn advance_obstacle(state: &GameState, rng: &mut impl Rng) -> GameState {
    let y = state.obstacle.y + state.obstacle.speed;
    if y <= SCREEN_HEIGHT {
        return GameState {
            obstacle: Obstacle {
                y,
                ..state.obstacle.clone()
            },
            ..state.clone()
        };
    }

    let obstacle = spawn_obstacle(state.obstacle.speed + OBSTACLE_SPEED_STEP, rng);
    let score = state.score + 1;
    trace!(score, speed = obstacle.speed, x = obstacle.x, "obstacle recycled");
    GameState {
        obstacle,
        score,
        ..state.clone()
    }
}

// ── Per-tick update (nearly pure — RNG is injected) ─────────────────────────

/// Advance one `Play` tick. Outside `Play` the state is returned unchanged.
pub fn tick(state: &GameState, controls: Controls, rng: &mut impl Rng) -> Outcome {
    if state.screen != Screen::Play {
        return Outcome::unchanged(state);
    }

    // ── 1. Animation ─────────────────────────────────────────────────────────
    let mut next = GameState {
        car: advance_animation(&state.car),
        ..state.clone()
    };

    // ── 2. Steering ──────────────────────────────────────────────────────────
    if controls.left {
        next = move_car_left(&next);
    }
    if controls.right {
        next = move_car_right(&next);
    }

    // ── 3 & 4. Obstacle fall and recycle ─────────────────────────────────────
    next = advance_obstacle(&next, rng);

    // ── 5. Collision ─────────────────────────────────────────────────────────
    if collides(&next) {
        return handle(&next, Trigger::Collision, rng);
    }

    Outcome {
        state: next,
        cue: None,
        quit: false,
    }
}

// ── Screen transitions ───────────────────────────────────────────────────────

/// Feed one trigger through the state machine and apply its side effect.
pub fn handle(state: &GameState, trigger: Trigger, rng: &mut impl Rng) -> Outcome {
    match transition(state.screen, trigger) {
        None => Outcome::unchanged(state),
        Some(Transition::Exit) => {
            debug!(from = ?state.screen, "quit requested");
            Outcome {
                state: state.clone(),
                cue: None,
                quit: true,
            }
        }
        Some(Transition::Enter(screen, effect)) => {
            debug!(from = ?state.screen, to = ?screen, ?trigger, "screen transition");
            match effect {
                Effect::ResetRound => Outcome {
                    state: GameState {
                        screen,
                        ..reset_round(state, rng)
                    },
                    cue: None,
                    quit: false,
                },
                Effect::CrashCue => {
                    info!(score = state.score, speed = state.obstacle.speed, "crashed");
                    Outcome {
                        state: GameState {
                            screen,
                            best: state.best.max(state.score),
                            ..state.clone()
                        },
                        cue: Some(SoundCue::Crash),
                        quit: false,
                    }
                }
            }
        }
    }
}
