pub mod flipbook_view;
pub mod hud_message;
