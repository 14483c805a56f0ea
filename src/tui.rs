use std::io::{self, stdout};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::{debug, warn};
use ratatui::prelude::*;

use crate::error::{Error, Result};
use crate::session::{Effect, Session};
use crate::ui::ui;

const TICK: Duration = Duration::from_millis(100);

fn copy_to_clipboard(command: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(command)?;
    Ok(())
}

pub fn run(binary: &str, workdir: &Path, picker_dir: &Path) -> Result<()> {
    setup_terminal()?;

    let result = event_loop(Session::new(binary, workdir, picker_dir));

    // Restore the terminal even when the loop failed.
    let restored = restore_terminal();
    result.and(restored)
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    if let Err(e) = stdout().execute(EnterAlternateScreen) {
        if let Err(raw) = disable_raw_mode() {
            warn!("Couldn't leave raw mode: {}", raw);
        }
        return Err(e.into());
    }
    Ok(())
}

fn restore_terminal() -> Result<()> {
    restore_with(disable_raw_mode, || {
        stdout().execute(LeaveAlternateScreen).map(|_| ())
    })
}

/// Runs both restore steps, then reports the first failure.
fn restore_with(
    disable_raw: impl FnOnce() -> io::Result<()>,
    leave_screen: impl FnOnce() -> io::Result<()>,
) -> Result<()> {
    let raw = disable_raw();
    let screen = leave_screen();
    raw.and(screen).map_err(Error::from)
}

fn event_loop(mut session: Session) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    loop {
        session.tick();
        terminal.draw(|f| ui(f, &session))?;

        if !event::poll(TICK)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match session.handle_key(key) {
            Effect::None => {}
            Effect::Quit => break,
            Effect::Copy(command) => match copy_to_clipboard(&command) {
                Ok(()) => {
                    debug!("Copied `{}` to clipboard", command);
                    session.set_status("Command copied to clipboard");
                }
                Err(e) => {
                    warn!("{}", e);
                    session.set_status(e.to_string());
                }
            },
        }
    }

    if session.is_running() {
        warn!("Quitting while `{}` is still running", session.draft().display());
    }
    Ok(())
}
