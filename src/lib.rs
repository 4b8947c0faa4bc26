//! Ponder is a terminal chat client for a question-answering service that
//! streams answers, and optionally its reasoning, as server-sent events.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the per-turn state machine, the reveal
//!   buffer, tool selection, configuration, and the streaming client.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the request and event payloads of the answering service.
//! - [`cli`] parses arguments and dispatches to the chat view or the one-shot
//!   `ask` command.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
