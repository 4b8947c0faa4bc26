//! Conversation state, the answer stream and configuration.

pub mod app;
pub mod chat_stream;
pub mod config;
pub mod message;
pub mod reveal;
pub mod tools;
pub mod turn;
