/// Keyboard handling.
///
/// Movement is level-triggered: instead of acting on each key event, the
/// tracker records the tick of the last press/repeat event for every key
/// and treats a key as held while that record is fresh.  Menu commands are
/// edge-triggered and come straight from press events.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, keys drop out on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire after `HOLD_WINDOW` ticks of silence,
///   which spans the initial repeat delay so a held key never drops out.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::HOLD_WINDOW;
use crate::entities::{Controls, Trigger};

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

/// Command a single key press stands for, if any.
pub fn trigger_for(event: &KeyEvent) -> Option<Trigger> {
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Trigger::Quit)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Trigger::Quit),
        KeyCode::Char(' ') => Some(Trigger::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Trigger::Restart),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Each held key → the tick it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one key event observed during tick `frame` into the held set.
    /// Returns the command for a fresh press.
    pub fn record(&mut self, event: &KeyEvent, frame: u64) -> Option<Trigger> {
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(event.code, frame);
                trigger_for(event)
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
                None
            }
        }
    }

    /// True if `key` was seen within the last `HOLD_WINDOW` ticks.
    pub fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn controls(&self, frame: u64) -> Controls {
        Controls {
            left: LEFT_KEYS.iter().any(|k| self.is_held(k, frame)),
            right: RIGHT_KEYS.iter().any(|k| self.is_held(k, frame)),
        }
    }
}
