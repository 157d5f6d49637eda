pub mod key_binding;
pub mod listener;

pub use key_binding::{KeyBindings, NavCommand, parse_key_code};
pub use listener::KeyboardListener;
