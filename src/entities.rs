/// All game entity types — pure data, no logic.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Play,
    GameOver,
}

/// Edge-triggered inputs that drive the screen state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Confirm key on the start menu.
    Start,
    /// Restart key on the game-over screen.
    Restart,
    /// The car's box overlapped the obstacle's box this tick.
    Collision,
    /// Window-close equivalent; ends the program from any screen.
    Quit,
}

/// One-shot sounds the shell plays in response to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Crash,
}

/// Instantaneous held-key state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in canvas pixels; (x, y) is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

// ── Car & obstacle ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub x: f32,
    pub y: f32,
    /// Index into the sprite sheet's frames.
    pub frame: usize,
    /// Ticks since the car was created; drives `frame`.
    pub anim_timer: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    /// Pixels per tick, grows on every recycle.
    pub speed: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub screen: Screen,
    pub car: Car,
    pub obstacle: Obstacle,
    pub score: u32,
    /// Best score of this session (memory only).
    pub best: u32,
}
