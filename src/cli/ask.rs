//! TUI-less "ask" command

use std::error::Error;
use std::io::{self, Write};

use ratatui::crossterm::style::Stylize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use crate::core::app::{App, AppInitConfig};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::core::config::Config;
use crate::core::reveal::Channel;

pub async fn run_ask(
    question: Vec<String>,
    init: AppInitConfig,
    config: &Config,
    show_thought: bool,
) -> Result<(), Box<dyn Error>> {
    let question = question.join(" ");
    let mut app = App::new(init, config);
    let Some(params) = app.submit_question(&question) else {
        eprintln!("Usage: ponder ask <question>");
        std::process::exit(1);
    };

    let (stream_service, mut rx) = ChatStreamService::new();
    stream_service.spawn_stream(params);

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    if let Err(err) = print_answer(&mut rx, &mut stdout, &mut stderr, show_thought).await? {
        eprintln!("\n\n❌ Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

/// Copy streamed fragments to the writers until the turn ends.
///
/// The outer result carries I/O failures; the inner one the service's error
/// text.
async fn print_answer<W: Write, E: Write>(
    rx: &mut UnboundedReceiver<(StreamMessage, u64)>,
    out: &mut W,
    err_out: &mut E,
    show_thought: bool,
) -> io::Result<Result<(), String>> {
    let mut in_thought = false;
    let mut printed_content = false;

    while let Some((message, _)) = rx.recv().await {
        match message {
            StreamMessage::Fragment { text, channel } => match channel {
                Channel::Thought => {
                    if show_thought {
                        write!(err_out, "{}", text.as_str().dim())?;
                        err_out.flush()?;
                        in_thought = true;
                    }
                }
                Channel::Content => {
                    if in_thought {
                        writeln!(err_out)?;
                        in_thought = false;
                    }
                    write!(out, "{}", text)?;
                    out.flush()?;
                    printed_content = true;
                }
            },
            StreamMessage::Malformed(payload) => {
                warn!(payload = %payload, "skipping malformed answer event");
            }
            StreamMessage::Error(err) => return Ok(Err(err)),
            StreamMessage::Complete | StreamMessage::End => break,
        }
    }

    if in_thought {
        writeln!(err_out)?;
    }
    if printed_content {
        writeln!(out)?;
    }
    Ok(Ok(()))
}
