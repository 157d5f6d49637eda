//! Terminal lifecycle for the interactive viewer.
//!
//! The book is drawn on the alternate screen in raw mode with mouse capture
//! on. Every way out (normal quit, an error, a panic) leaves through
//! [`restore_terminal`].

use std::io::{self, Write};
use std::panic;

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error};

pub fn initialize_panic_handler() {
    better_panic::install();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        error!("Flipbook panicked: {panic_info}");

        default_hook(panic_info);

        std::process::exit(1);
    }));
}

/// Undo everything [`TerminalSession::enter`] switched on. Safe to call more
/// than once; failures are ignored since the terminal may already be gone.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
    let _ = io::stdout().flush();
}

/// Raw mode, alternate screen and mouse capture for as long as it lives
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // From here on a failure must still unwind the raw mode
        let session = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        debug!("Entered flipbook screen");
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        debug!("Terminal restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restoring_without_a_session_is_harmless() {
        restore_terminal();
        restore_terminal();
    }

}
