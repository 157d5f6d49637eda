use std::time::{Duration, Instant};

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Base16Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudMode {
    Normal,
    Error,
}

/// Transient status line, e.g. "Sound off" after muting
#[derive(Debug, Clone)]
pub struct HudMessage {
    pub message: String,
    pub expires_at: Instant,
    pub mode: HudMode,
}

impl HudMessage {
    pub fn new(message: impl Into<String>, duration: Duration, mode: HudMode) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + duration,
            mode,
        }
    }

    pub fn info(message: impl Into<String>, duration: Duration) -> Self {
        Self::new(message, duration, HudMode::Normal)
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self::new(message, duration, HudMode::Error)
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn styled_line(&self, palette: &Base16Palette) -> Line<'static> {
        let style = match self.mode {
            HudMode::Normal => Style::default()
                .fg(palette.base_06)
                .bg(palette.base_02)
                .add_modifier(Modifier::BOLD),
            HudMode::Error => Style::default()
                .fg(palette.base_07)
                .bg(palette.base_08)
                .add_modifier(Modifier::BOLD),
        };

        Line::from(vec![Span::styled(format!(" {} ", self.message), style)]).centered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::current_theme;

    #[test]
    fn zero_duration_expires_immediately() {
        let hud = HudMessage::info("Sound off", Duration::ZERO);
        assert!(hud.is_expired());
        let hud = HudMessage::error("No pages", Duration::from_secs(60));
        assert!(!hud.is_expired());
    }

    #[test]
    fn styled_line_pads_message() {
        let hud = HudMessage::info("Sound on", Duration::from_secs(1));
        let line = hud.styled_line(current_theme());
        assert_eq!(line.spans[0].content, " Sound on ");
    }
}
