use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::Event;
use log::debug;

use super::key_binding::{KeyBindings, NavCommand};
use crate::flip_controller::FlipController;

static ACTIVE_LISTENERS: AtomicUsize = AtomicUsize::new(0);

/// Keyboard listener that turns pages while it is alive.
///
/// Installed when a book becomes active; dropping it removes the binding.
#[derive(Debug)]
pub struct KeyboardListener {
    bindings: KeyBindings,
}

impl KeyboardListener {
    pub fn install(bindings: KeyBindings) -> Self {
        let active = ACTIVE_LISTENERS.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Keyboard listener installed ({active} active)");
        Self { bindings }
    }

    /// Route a key press to the controller. Returns the matched command even
    /// when the turn saturated at either end of the book.
    pub fn dispatch(&self, event: &Event, controller: &mut FlipController) -> Option<NavCommand> {
        let Event::Key(key) = event else {
            return None;
        };
        let command = self.bindings.command_for(key)?;
        match command {
            NavCommand::Next => controller.advance(),
            NavCommand::Previous => controller.retreat(),
        };
        Some(command)
    }

    /// Number of listeners currently installed in this process
    pub fn active_count() -> usize {
        ACTIVE_LISTENERS.load(Ordering::SeqCst)
    }
}

impl Drop for KeyboardListener {
    fn drop(&mut self) {
        let remaining = ACTIVE_LISTENERS.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!("Keyboard listener removed ({remaining} active)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_source::{KeyCode, SimulatedEventSource};
    use crate::pagination::Page;
    use serial_test::serial;

    fn book(count: usize) -> FlipController {
        let pages: Vec<Page> = (1..=count).map(|n| Page::image(format!("{n}.png"))).collect();
        FlipController::new(&pages)
    }

    #[test]
    #[serial]
    fn dispatch_turns_pages() {
        let listener = KeyboardListener::install(KeyBindings::default());
        let mut controller = book(4);

        let right = SimulatedEventSource::key(KeyCode::Right);
        let left = SimulatedEventSource::key(KeyCode::Left);

        assert_eq!(listener.dispatch(&right, &mut controller), Some(NavCommand::Next));
        assert_eq!(controller.flipped_count(), 1);
        assert_eq!(listener.dispatch(&left, &mut controller), Some(NavCommand::Previous));
        assert_eq!(controller.flipped_count(), 0);
        // saturated, but still consumed
        assert_eq!(listener.dispatch(&left, &mut controller), Some(NavCommand::Previous));
        assert_eq!(controller.flipped_count(), 0);

        let other = SimulatedEventSource::char_key('z');
        assert_eq!(listener.dispatch(&other, &mut controller), None);
    }

    #[test]
    #[serial]
    fn dropping_listener_uninstalls_it() {
        let before = KeyboardListener::active_count();
        {
            let _first = KeyboardListener::install(KeyBindings::default());
            let _second = KeyboardListener::install(KeyBindings::default());
            assert_eq!(KeyboardListener::active_count(), before + 2);
        }
        assert_eq!(KeyboardListener::active_count(), before);
    }
}
