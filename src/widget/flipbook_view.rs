use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::flip_controller::{Face, FlipController, ViewMode};
use crate::inputs::KeyBindings;
use crate::pagination::Page;
use crate::theme::Base16Palette;

const NAV_BUTTON_WIDTH: u16 = 12;

/// Screen regions of the book, shared by drawing and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookLayout {
    pub left_page: Option<Rect>,
    pub right_page: Option<Rect>,
    pub prev_button: Rect,
    pub label: Rect,
    pub next_button: Rect,
    pub help: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookHit {
    Previous,
    Next,
}

impl BookLayout {
    pub fn compute(area: Rect, mode: ViewMode) -> Self {
        let [book, nav, help] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let [prev_button, label, next_button] = Layout::horizontal([
            Constraint::Length(NAV_BUTTON_WIDTH),
            Constraint::Min(0),
            Constraint::Length(NAV_BUTTON_WIDTH),
        ])
        .areas(nav);

        // Terminal cells are about twice as tall as wide; pages are 1:1.4
        let page_width = (book.width / 2).min(book.height.saturating_mul(10) / 7);
        let page = |x: u16| Rect::new(x, book.y, page_width, book.height);
        let centered_x = book.x + (book.width - page_width) / 2;
        let spread_x = book.x + (book.width - page_width * 2) / 2;

        let (left_page, right_page) = match mode {
            ViewMode::Empty => (None, None),
            ViewMode::Cover => (None, Some(page(centered_x))),
            ViewMode::BackCover => (Some(page(centered_x)), None),
            ViewMode::Spread => (Some(page(spread_x)), Some(page(spread_x + page_width))),
        };

        Self {
            left_page,
            right_page,
            prev_button,
            label,
            next_button,
            help,
        }
    }

    /// Left page and the previous button turn back; right page and next turn forward
    pub fn hit(&self, column: u16, row: u16) -> Option<BookHit> {
        let position = Position::new(column, row);
        let inside = |rect: Option<Rect>| rect.is_some_and(|r| r.contains(position));
        if inside(self.left_page) || self.prev_button.contains(position) {
            Some(BookHit::Previous)
        } else if inside(self.right_page) || self.next_button.contains(position) {
            Some(BookHit::Next)
        } else {
            None
        }
    }
}

pub struct FlipbookView<'a> {
    pub controller: &'a FlipController,
    pub bindings: &'a KeyBindings,
    pub sound_on: bool,
    pub palette: &'a Base16Palette,
}

impl FlipbookView<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) -> BookLayout {
        let layout = BookLayout::compute(area, self.controller.view_mode());

        if let (Some(rect), Some(face)) = (layout.left_page, self.controller.left_face()) {
            self.render_face(frame, rect, face, Borders::TOP | Borders::BOTTOM | Borders::LEFT);
        }
        if let (Some(rect), Some(face)) = (layout.right_page, self.controller.right_face()) {
            self.render_face(frame, rect, face, Borders::TOP | Borders::BOTTOM | Borders::RIGHT);
        }

        self.render_nav(frame, &layout);
        self.render_help(frame, layout.help);
        layout
    }

    fn render_face(&self, frame: &mut Frame, rect: Rect, face: Face<'_>, borders: Borders) {
        let (page_bg, page_fg) = self.palette.page_colors();
        let style = Style::default().bg(page_bg).fg(page_fg);
        let block = Block::default()
            .borders(borders)
            .border_style(Style::default().fg(self.palette.base_04).bg(page_bg))
            .style(style);

        let lines = match face.page {
            Page::Blank => Vec::new(),
            Page::Image(image) => {
                let inner_height = rect.height.saturating_sub(2) as usize;
                let mut lines = Vec::with_capacity(inner_height);
                let body = 3;
                lines.extend((0..inner_height.saturating_sub(body + 1) / 2).map(|_| Line::default()));
                lines.push(Line::from(Span::styled(
                    image.display_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                match image.dimensions {
                    Some((width, height)) => lines.push(Line::from(format!("{width}×{height}"))),
                    None => lines.push(Line::default()),
                }
                lines.push(Line::default());
                while lines.len() + 1 < inner_height {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(
                    face.number.to_string(),
                    Style::default().fg(self.palette.base_03),
                )));
                lines
            }
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, rect);
    }

    fn render_nav(&self, frame: &mut Frame, layout: &BookLayout) {
        let prev_keys = KeyBindings::describe(self.bindings.previous_keys());
        let next_keys = KeyBindings::describe(self.bindings.next_keys());

        let (prev_fg, _) = self.palette.control_colors(self.controller.can_retreat());
        let (next_fg, _) = self.palette.control_colors(self.controller.can_advance());

        frame.render_widget(
            Paragraph::new(format!("◀ {prev_keys}")).style(Style::default().fg(prev_fg)),
            layout.prev_button,
        );
        frame.render_widget(
            Paragraph::new(format!("{next_keys} ▶"))
                .style(Style::default().fg(next_fg))
                .alignment(Alignment::Right),
            layout.next_button,
        );

        let label = self.controller.current_view().label();
        let label_style = Style::default()
            .fg(self.palette.base_05)
            .add_modifier(Modifier::BOLD);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(label, label_style))).alignment(Alignment::Center),
            layout.label,
        );
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let sound = if self.sound_on { "m: Mute" } else { "m: Unmute" };
        let text = format!("{sound} | Esc: Close book | q: Quit");
        let text = if text.width() > area.width as usize {
            "q: Quit".to_string()
        } else {
            text
        };
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(self.palette.base_03))
                .alignment(Alignment::Center),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_shows_single_right_page() {
        let layout = BookLayout::compute(Rect::new(0, 0, 80, 24), ViewMode::Cover);
        assert!(layout.left_page.is_none());
        let right = layout.right_page.unwrap();
        assert_eq!(right.height, 22);
        assert_eq!(right.width, 31);
        assert_eq!(right.x, (80 - 31) / 2);
    }

    #[test]
    fn spread_pages_meet_at_spine() {
        let layout = BookLayout::compute(Rect::new(0, 0, 80, 24), ViewMode::Spread);
        let left = layout.left_page.unwrap();
        let right = layout.right_page.unwrap();
        assert_eq!(left.x + left.width, right.x);
        assert_eq!(left.width, right.width);
    }

    #[test]
    fn empty_book_has_no_pages() {
        let layout = BookLayout::compute(Rect::new(0, 0, 80, 24), ViewMode::Empty);
        assert_eq!(layout.left_page, None);
        assert_eq!(layout.right_page, None);
    }

    #[test]
    fn clicks_map_to_directions() {
        let layout = BookLayout::compute(Rect::new(0, 0, 80, 24), ViewMode::Spread);
        let left = layout.left_page.unwrap();
        let right = layout.right_page.unwrap();
        assert_eq!(layout.hit(left.x + 1, 5), Some(BookHit::Previous));
        assert_eq!(layout.hit(right.x + 1, 5), Some(BookHit::Next));
        assert_eq!(layout.hit(1, 22), Some(BookHit::Previous));
        assert_eq!(layout.hit(79, 22), Some(BookHit::Next));
        assert_eq!(layout.hit(0, 0), None);
        assert_eq!(layout.hit(40, 23), None);
    }
}
