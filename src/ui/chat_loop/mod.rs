//! Interactive chat view: terminal setup, the event loop and key handling.

mod event_loop;
pub mod keybindings;
pub mod lifecycle;

pub use event_loop::run_chat;
