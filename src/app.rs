use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::event_source::EventSource;
use crate::flip_controller::{FlipCallback, FlipController};
use crate::inputs::{KeyBindings, KeyboardListener};
use crate::page_source;
use crate::pagination::Page;
use crate::settings;
use crate::sound::FlipSound;
use crate::theme::current_theme;
use crate::widget::flipbook_view::{BookHit, BookLayout, FlipbookView};
use crate::widget::hud_message::HudMessage;

const HUD_DURATION: Duration = Duration::from_secs(2);
const TICK_RATE: Duration = Duration::from_millis(100);
const MAX_EVENTS_PER_FRAME: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Nothing loaded yet
    Start,
    Book,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

pub struct AppOptions {
    pub sound_enabled: bool,
    pub bindings: KeyBindings,
    /// Write setting changes (sound toggle) back to the config file
    pub persist_settings: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            bindings: KeyBindings::default(),
            persist_settings: false,
        }
    }
}

impl AppOptions {
    pub fn from_settings() -> Self {
        Self {
            sound_enabled: settings::is_sound_enabled(),
            bindings: settings::key_bindings(),
            persist_settings: true,
        }
    }
}

type SoundFactory = Box<dyn Fn() -> FlipCallback>;

pub struct App {
    pub screen: Screen,
    controller: FlipController,
    listener: Option<KeyboardListener>,
    bindings: KeyBindings,
    sound_enabled: bool,
    persist_settings: bool,
    sound_factory: SoundFactory,
    hud: Option<HudMessage>,
    /// Regions of the last drawn frame. Clicks queued before the next redraw
    /// land on what the reader saw, not on the layout after earlier turns.
    last_layout: Option<BookLayout>,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        Self {
            screen: Screen::Start,
            controller: FlipController::default(),
            listener: None,
            bindings: options.bindings,
            sound_enabled: options.sound_enabled,
            persist_settings: options.persist_settings,
            sound_factory: Box::new(|| FlipSound::terminal_bell().into_callback()),
            hud: None,
            last_layout: None,
        }
    }

    /// Replace what plays on each page turn
    pub fn with_flip_sound(mut self, factory: impl Fn() -> FlipCallback + 'static) -> Self {
        self.sound_factory = Box::new(factory);
        self.apply_sound();
        self
    }

    pub fn controller(&self) -> &FlipController {
        &self.controller
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn has_keyboard_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn hud(&self) -> Option<&HudMessage> {
        self.hud.as_ref()
    }

    /// Swap in a new page list. The book reopens at its cover with a fresh
    /// keyboard listener; an empty list leaves nothing to display.
    pub fn open_pages(&mut self, pages: Vec<Page>) {
        if pages.is_empty() {
            self.close_book();
            self.hud = Some(HudMessage::error("No pages to display", HUD_DURATION));
            return;
        }

        info!("Opening flipbook with {} pages", pages.len());
        self.controller.set_pages(&pages);
        // Remove the old listener before installing its replacement
        self.listener = None;
        self.listener = Some(KeyboardListener::install(self.bindings.clone()));
        self.apply_sound();
        self.last_layout = None;
        self.screen = Screen::Book;
        self.hud = Some(HudMessage::info(
            format!("Loaded {} pages", pages.len()),
            HUD_DURATION,
        ));
    }

    pub fn close_book(&mut self) {
        if self.screen == Screen::Book {
            debug!("Closing flipbook");
        }
        self.listener = None;
        self.controller.set_pages(&[]);
        self.last_layout = None;
        self.screen = Screen::Start;
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        self.apply_sound();
        if self.persist_settings {
            settings::set_sound_enabled(self.sound_enabled);
        }
        let message = if self.sound_enabled { "Sound on" } else { "Sound off" };
        self.hud = Some(HudMessage::info(message, HUD_DURATION));
    }

    fn apply_sound(&mut self) {
        let callback = self.sound_enabled.then(|| (self.sound_factory)());
        self.controller.set_on_flip(callback);
    }

    pub fn handle_event(&mut self, event: &Event) -> Option<AppAction> {
        match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return None;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Some(AppAction::Quit);
                }
                if let Some(listener) = &self.listener {
                    if listener.dispatch(event, &mut self.controller).is_some() {
                        return None;
                    }
                }
                match key.code {
                    KeyCode::Char('q') => return Some(AppAction::Quit),
                    KeyCode::Char('m') => self.toggle_sound(),
                    KeyCode::Esc if self.screen == Screen::Book => self.close_book(),
                    KeyCode::Char('s') if self.screen == Screen::Start => {
                        info!("Loading sample book...");
                        self.open_pages(page_source::sample_pages());
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                if self.screen != Screen::Book
                    || mouse.kind != MouseEventKind::Down(MouseButton::Left)
                {
                    return None;
                }
                if let Some(layout) = &self.last_layout {
                    match layout.hit(mouse.column, mouse.row) {
                        Some(BookHit::Previous) => {
                            self.controller.retreat();
                        }
                        Some(BookHit::Next) => {
                            self.controller.advance();
                        }
                        None => {}
                    }
                }
            }
            _ => {}
        }
        None
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let palette = current_theme();
        if self.hud.as_ref().is_some_and(|hud| hud.is_expired()) {
            self.hud = None;
        }

        let frame_block = Block::default()
            .borders(Borders::ALL)
            .title(" Flipbook ")
            .border_style(Style::default().fg(palette.base_03))
            .style(Style::default().bg(palette.base_00));
        let inner = frame_block.inner(f.area());
        f.render_widget(frame_block, f.area());

        let [hud_area, content] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

        if let Some(hud) = &self.hud {
            f.render_widget(Paragraph::new(hud.styled_line(palette)), hud_area);
        }

        match self.screen {
            Screen::Start => {
                self.last_layout = None;
                self.draw_start(f, content);
            }
            Screen::Book => {
                let view = FlipbookView {
                    controller: &self.controller,
                    bindings: &self.bindings,
                    sound_on: self.sound_enabled,
                    palette,
                };
                self.last_layout = Some(view.render(f, content));
            }
        }
    }

    fn draw_start(&self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let heading = Style::default()
            .fg(palette.base_07)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(palette.base_03);
        let key = Style::default().fg(palette.base_0a);
        let sound = if self.sound_enabled { "mute" } else { "unmute" };

        let lines = vec![
            Line::from(Span::styled("Interactive Flipbook", heading)),
            Line::from(Span::styled(
                "Turn page images into a book you can leaf through.",
                muted,
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("flipbook <images or directory>", key),
                Span::raw("  open your own pages"),
            ]),
            Line::from(vec![Span::styled("s", key), Span::raw("  try the sample book")]),
            Line::from(vec![
                Span::styled("m", key),
                Span::raw(format!("  {sound} page turn sound")),
            ]),
            Line::from(vec![Span::styled("q", key), Span::raw("  quit")]),
        ];

        let top = area.height.saturating_sub(lines.len() as u16) / 2;
        let [_, body] =
            Layout::vertical([Constraint::Length(top), Constraint::Min(0)]).areas(area);
        f.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(palette.base_05))
                .alignment(Alignment::Center),
            body,
        );
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| app.draw(f))?;

        if !event_source.poll(TICK_RATE)? {
            continue;
        }
        let mut events_processed = 0;
        loop {
            let event = event_source.read()?;
            events_processed += 1;
            if app.handle_event(&event) == Some(AppAction::Quit) {
                info!("Quit requested");
                return Ok(());
            }
            if events_processed >= MAX_EVENTS_PER_FRAME || !event_source.poll(Duration::ZERO)? {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_source::SimulatedEventSource;
    use serial_test::serial;
    use std::cell::Cell;
    use std::rc::Rc;

    fn pages(count: usize) -> Vec<Page> {
        (1..=count).map(|n| Page::image(format!("{n}.png"))).collect()
    }

    fn counting_app() -> (App, Rc<Cell<usize>>) {
        let flips = Rc::new(Cell::new(0));
        let counter = Rc::clone(&flips);
        let app = App::new(AppOptions::default()).with_flip_sound(move || -> FlipCallback {
            let counter = Rc::clone(&counter);
            Box::new(move || counter.set(counter.get() + 1))
        });
        (app, flips)
    }

    #[test]
    #[serial]
    fn opening_pages_installs_one_listener() {
        let before = KeyboardListener::active_count();
        let mut app = App::new(AppOptions::default());
        assert!(!app.has_keyboard_listener());

        app.open_pages(pages(4));
        app.open_pages(pages(6));
        assert!(app.has_keyboard_listener());
        assert_eq!(KeyboardListener::active_count(), before + 1);

        app.close_book();
        assert_eq!(KeyboardListener::active_count(), before);
        assert_eq!(app.screen, Screen::Start);
        assert_eq!(app.controller().sheet_count(), 0);
    }

    #[test]
    #[serial]
    fn empty_page_list_stays_on_start_screen() {
        let mut app = App::new(AppOptions::default());
        app.open_pages(Vec::new());
        assert_eq!(app.screen, Screen::Start);
        assert!(!app.has_keyboard_listener());
        assert!(app.hud().is_some());
    }

    #[test]
    #[serial]
    fn arrow_keys_only_turn_pages_while_book_is_open() {
        let (mut app, flips) = counting_app();
        let right = SimulatedEventSource::key(KeyCode::Right);

        app.handle_event(&right);
        assert_eq!(app.controller().flipped_count(), 0);

        app.open_pages(pages(4));
        app.handle_event(&right);
        app.handle_event(&right);
        app.handle_event(&right);
        assert_eq!(app.controller().flipped_count(), 2);
        assert_eq!(flips.get(), 2);
    }

    #[test]
    #[serial]
    fn reopening_resets_cursor() {
        let mut app = App::new(AppOptions::default()).with_flip_sound(|| -> FlipCallback { Box::new(|| {}) });
        app.open_pages(pages(8));
        app.handle_event(&SimulatedEventSource::key(KeyCode::Right));
        assert_eq!(app.controller().flipped_count(), 1);
        app.open_pages(pages(8));
        assert_eq!(app.controller().flipped_count(), 0);
    }

    #[test]
    #[serial]
    fn muting_removes_flip_callback() {
        let (mut app, flips) = counting_app();
        app.open_pages(pages(6));
        assert!(app.controller().has_on_flip());

        app.handle_event(&SimulatedEventSource::char_key('m'));
        assert!(!app.is_sound_enabled());
        assert!(!app.controller().has_on_flip());
        app.handle_event(&SimulatedEventSource::key(KeyCode::Right));
        assert_eq!(flips.get(), 0);
        assert_eq!(app.controller().flipped_count(), 1);

        app.handle_event(&SimulatedEventSource::char_key('m'));
        app.handle_event(&SimulatedEventSource::key(KeyCode::Right));
        assert_eq!(flips.get(), 1);
    }

    #[test]
    #[serial]
    fn sample_key_opens_sample_book() {
        let mut app = App::new(AppOptions {
            sound_enabled: false,
            ..AppOptions::default()
        });
        app.handle_event(&SimulatedEventSource::char_key('s'));
        assert_eq!(app.screen, Screen::Book);
        assert_eq!(app.controller().page_count(), page_source::sample_pages().len());

        app.handle_event(&SimulatedEventSource::key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Start);
        assert!(!app.has_keyboard_listener());
    }

    #[test]
    #[serial]
    fn queued_clicks_hit_the_drawn_layout() {
        let (mut app, flips) = counting_app();
        app.open_pages(pages(6));
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(80, 24)).unwrap();

        // Clicks before the first frame have nothing to land on
        app.handle_event(&SimulatedEventSource::click(40, 10));
        assert_eq!(app.controller().flipped_count(), 0);

        terminal.draw(|f| app.draw(f)).unwrap();
        let cover = app.last_layout.and_then(|l| l.right_page).unwrap();
        let click = SimulatedEventSource::click(cover.x + 2, cover.y + 2);
        app.handle_event(&click);
        app.handle_event(&click);
        assert_eq!(app.controller().flipped_count(), 2);
        assert_eq!(flips.get(), 2);
    }

    #[test]
    #[serial]
    fn quit_keys() {
        let mut app = App::new(AppOptions::default());
        assert_eq!(
            app.handle_event(&SimulatedEventSource::char_key('q')),
            Some(AppAction::Quit)
        );
        assert_eq!(
            app.handle_event(&SimulatedEventSource::key_event(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            )),
            Some(AppAction::Quit)
        );
    }
}
