pub mod app;
pub mod event_source;
pub mod flip_controller;
pub mod inputs;
pub mod page_source;
pub mod pagination;
pub mod panic_handler;
pub mod settings;
pub mod sound;
pub mod theme;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::{App, AppAction, AppOptions, Screen, run_app_with_event_source};
pub use flip_controller::{FlipController, View, ViewMode, VisiblePages};
pub use pagination::{Page, PageImage, Sheet, paginate};
