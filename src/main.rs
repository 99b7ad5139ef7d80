use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
    ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use platformer::clock::{FrameClock, Timestamps};
use platformer::config::GameConfig;
use platformer::display::{Surface, TerminalSurface};
use platformer::error::Result;
use platformer::input::{Control, InputState};
use platformer::world::World;

/// The terminal owns the screen, so log lines go to a file when one is set.
fn init_logging(config: &GameConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(err) => eprintln!("cannot open log file {}: {err}", path.display()),
        }
    }
    builder.init();
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Each frame: drain input, compute the delta,
/// clear, update, draw, present, then sleep out the rest of the frame budget.
fn game_loop<W: Write>(
    surface: &mut TerminalSurface<W>,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let frame_budget = Duration::from_millis(world.config.input.frame_ms);
    let mut input = InputState::new(world.config.input.hold_window_frames());
    let mut rng = thread_rng();
    let timestamps = Timestamps::start();
    let mut clock = FrameClock::new();

    loop {
        let frame_start = Instant::now();
        let frame = world.frame + 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(Event::Key(key)) => {
                    if input.handle_key(&key, frame, &mut world.player) == Control::Quit {
                        return Ok(());
                    }
                }
                Ok(Event::Resize(cols, rows)) => surface.resize(cols, rows),
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("input thread stopped, exiting");
                    return Ok(());
                }
            }
        }
        input.expire(frame, &mut world.player);

        let dt = clock.tick(timestamps.now_ms()) as f32;
        surface.clear()?;
        world.update(dt, &mut rng);
        world.draw(surface)?;
        surface.present()?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

fn run<W: Write>(out: &mut W, config: GameConfig, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, config.screen.width, config.screen.height, cols, rows);
    // The surface owns the canvas; the world is sized from it once, here.
    let (width, height) = surface.size();
    let mut world = World::new(config.with_canvas(width, height));
    game_loop(&mut surface, &mut world, rx)?;
    info!(
        "left after {} frames, scrolled {:.0} px",
        world.frame, world.scroll_offset
    );
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = GameConfig::from_env()?;
    init_logging(&config);
    info!(
        "starting: canvas {}x{}, {} platforms",
        config.screen.width,
        config.screen.height,
        config.layout.len()
    );

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    info!("keyboard enhancement: {keyboard_enhanced}");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                warn!("reading terminal events failed: {err}");
                break;
            }
        }
    });

    let result = run(&mut out, config, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
