/// Screen state machine.
///
/// Every legal (screen, trigger) pair and its side effect is listed in
/// `transition`; anything not listed there is ignored by the game.

use crate::entities::{Screen, Trigger};

/// Side effect that accompanies entering a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Put car, obstacle and score back to their initial values.
    ResetRound,
    /// Play the crash sound.
    CrashCue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Enter(Screen, Effect),
    Exit,
}

pub fn transition(from: Screen, trigger: Trigger) -> Option<Transition> {
    match (from, trigger) {
        (_, Trigger::Quit) => Some(Transition::Exit),
        (Screen::Start, Trigger::Start) => {
            Some(Transition::Enter(Screen::Play, Effect::ResetRound))
        }
        (Screen::Play, Trigger::Collision) => {
            Some(Transition::Enter(Screen::GameOver, Effect::CrashCue))
        }
        (Screen::GameOver, Trigger::Restart) => {
            Some(Transition::Enter(Screen::Play, Effect::ResetRound))
        }
        _ => None,
    }
}
