//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal lifecycle and the event loop that routes input,
//!   stream events and reveal ticks into [`crate::core::app::App`].
//! - [`renderer`] and [`markdown`]: frame composition.
//! - [`theme`]: color and style policy.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
