use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{error, info};

use car_dodge::assets::{self, Assets};
use car_dodge::audio::Audio;
use car_dodge::compute::{handle, init_state, tick};
use car_dodge::config::FRAME;
use car_dodge::display;
use car_dodge::input::KeyTracker;
use car_dodge::logging;

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit command arrives or the input thread goes away.
///
/// Each tick: drain pending events (press → state-machine trigger, every
/// event → held-key tracker), advance the simulation, then draw the screen
/// the state is now on.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    assets: &Assets,
    audio: &Audio,
) -> Result<()> {
    let mut rng = thread_rng();
    let mut keys = KeyTracker::new();
    let mut state = init_state(&mut rng);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(Event::Key(key)) => {
                    if let Some(trigger) = keys.record(&key, frame) {
                        let outcome = handle(&state, trigger, &mut rng);
                        if outcome.quit {
                            info!(best = outcome.state.best, "quitting");
                            return Ok(());
                        }
                        state = outcome.state;
                    }
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    error!("input thread stopped");
                    return Ok(());
                }
            }
        }

        let outcome = tick(&state, keys.controls(frame), &mut rng);
        state = outcome.state;
        if let Some(cue) = outcome.cue {
            audio.play(out, cue)?;
        }

        let (cols, rows) = terminal::size()?;
        display::render(out, &display::compose(&state, assets, cols, rows))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let log_path = logging::init()?;
    info!(log = %log_path.display(), "starting car_dodge");

    let dir = assets::resource_dir();
    let assets = Assets::load(&dir)
        .with_context(|| format!("failed to load game assets from {}", dir.display()))?;

    let audio = Audio::new();
    audio.start_music();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("could not enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                error!(%err, "reading terminal events failed");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx, &assets, &audio);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!(%err, "game loop failed");
    }
    result
}
