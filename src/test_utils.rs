pub mod test_helpers {
    use crate::event_source::{Event, KeyCode, SimulatedEventSource};
    use crate::pagination::Page;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events.push(SimulatedEventSource::key(code));
            self
        }

        /// Press → n times
        pub fn turn_forward(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.events.push(SimulatedEventSource::key(KeyCode::Right));
            }
            self
        }

        /// Press ← n times
        pub fn turn_back(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.events.push(SimulatedEventSource::key(KeyCode::Left));
            }
            self
        }

        pub fn click(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::click(column, row));
            self
        }

        /// Toggle sound (press 'm')
        pub fn toggle_sound(mut self) -> Self {
            self.events.push(SimulatedEventSource::char_key('m'));
            self
        }

        /// Close the book (press Esc)
        pub fn close_book(mut self) -> Self {
            self.events.push(SimulatedEventSource::key(KeyCode::Esc));
            self
        }

        /// Quit the application (press 'q')
        pub fn quit(mut self) -> Self {
            self.events.push(SimulatedEventSource::char_key('q'));
            self
        }

        /// Build the simulated event source. Scenarios run until a quit event.
        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Numbered image pages named `page-1.png`, `page-2.png`, ...
    pub fn numbered_pages(count: usize) -> Vec<Page> {
        (1..=count)
            .map(|n| Page::image(format!("page-{n}.png")))
            .collect()
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;

    #[test]
    fn test_scenario_builder() {
        let scenario = TestScenarioBuilder::new()
            .turn_forward(2)
            .turn_back(1)
            .toggle_sound()
            .click(3, 4)
            .close_book()
            .quit()
            .build();

        assert_eq!(scenario.events.len(), 7);
    }

    #[test]
    fn numbered_pages_are_one_based() {
        let pages = numbered_pages(3);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].to_string(), "page-1.png");
    }
}
