//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::ask::run_ask;
use crate::core::app::{App, AppInitConfig};
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_logging, LogTarget};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "ponder")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat client for a streaming question-answering service")]
#[command(
    long_about = "Ponder is a full-screen terminal chat client for a question-answering \
service that streams its answers, and optionally its reasoning, as server-sent events. \
Answers are revealed character by character; the reasoning appears in a collapsible \
\"Thought Process\" block above the answer.\n\n\
Controls:\n\
  Enter             Send the question\n\
  Alt+Enter         Insert a new line\n\
  Esc               Stop the answer in progress\n\
  Ctrl+T            Open the tools dropdown (Space/Enter toggles)\n\
  Ctrl+O            Collapse or expand the latest thought block\n\
  Up/Down/Mouse     Scroll through the transcript\n\
  Ctrl+Up/Down      Scroll while the input has several lines\n\
  Ctrl+C            Quit the application\n\n\
Environment Variables:\n\
  PONDER_LOG        Log filter, e.g. 'ponder=debug' (used with --log-file)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the answering service
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Endpoint path appended to the base URL
    #[arg(long, global = true, value_name = "PATH")]
    pub endpoint: Option<String>,

    /// Enable a tool for every question (repeatable)
    #[arg(short = 't', long = "tool", global = true, value_name = "NAME")]
    pub tools: Vec<String>,

    /// Write diagnostics to this file
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub log_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and stream the answer to stdout
    Ask {
        /// Do not print the reasoning to stderr
        #[arg(long)]
        no_thought: bool,
        /// The question to ask
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set (lists may be comma- or space-separated)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

impl Args {
    fn init_config(&self) -> AppInitConfig {
        AppInitConfig {
            base_url: self.url.clone(),
            endpoint: self.endpoint.clone(),
            tools: self.tools.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let init = args.init_config();
    let log_file = args.log_file.clone();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            init_logging(&LogTarget::for_tui(log_file.or(config.log_file.clone())))?;
            if let Ok(path) = Config::get_config_path() {
                debug!(path = %path.display(), "configuration loaded");
            }
            let app = App::new(init, &config);
            run_chat(app, config.reveal_interval()).await
        }
        Commands::Ask {
            no_thought,
            question,
        } => {
            let config = Config::load()?;
            init_logging(&LogTarget::for_cli(log_file.or(config.log_file.clone())))?;
            run_ask(question, init, &config, !no_thought).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value.join(" ");
            if let Err(e) = config.set_value(&key, &value) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(e) = config.unset_value(&key) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            Config::load()?.print_all();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_chat() {
        let args = Args::try_parse_from(["ponder"]).expect("parse");
        assert!(args.command.is_none());
    }

    #[test]
    fn global_flags_apply_to_ask() {
        let args = Args::try_parse_from([
            "ponder",
            "ask",
            "--tool",
            "search",
            "--url",
            "http://localhost:9000",
            "what",
            "is",
            "rust?",
        ])
        .expect("parse");
        let init = args.init_config();
        assert_eq!(init.tools, vec!["search".to_string()]);
        assert_eq!(init.base_url.as_deref(), Some("http://localhost:9000"));
        match args.command {
            Some(Commands::Ask {
                no_thought,
                question,
            }) => {
                assert!(!no_thought);
                assert_eq!(question.join(" "), "what is rust?");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn repeated_tools_accumulate() {
        let args =
            Args::try_parse_from(["ponder", "-t", "search", "-t", "maps"]).expect("parse");
        assert_eq!(args.tools, vec!["search".to_string(), "maps".to_string()]);
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Args::try_parse_from(["ponder", "ask"]).is_err());
    }

    #[test]
    fn set_joins_multi_word_values() {
        let args = Args::try_parse_from(["ponder", "set", "default-tools", "search", "maps"])
            .expect("parse");
        match args.command {
            Some(Commands::Set { key, value }) => {
                assert_eq!(key, "default-tools");
                assert_eq!(value.join(" "), "search maps");
            }
            _ => panic!("expected set"),
        }
    }
}
