use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENDPOINT: &str = "answer_question";
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 10;
pub const DEFAULT_REVEAL_CHARS_PER_TICK: usize = 1;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the answering service (e.g., "http://127.0.0.1:8000")
    pub base_url: Option<String>,
    /// Path appended to `base_url` (e.g., "answer_question" or "answer_question_sse")
    pub endpoint: Option<String>,
    /// Tools offered in the tools dropdown
    pub tools: Option<Vec<String>>,
    /// Tools enabled when a session starts
    #[serde(default)]
    pub default_tools: Vec<String>,
    /// Enable markdown rendering in the chat area
    pub markdown: Option<bool>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Milliseconds between reveal ticks
    pub reveal_interval_ms: Option<u64>,
    /// Characters revealed per tick
    pub reveal_chars_per_tick: Option<usize>,
    /// File receiving diagnostic logs
    pub log_file: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/ponder/config.toml` → `~/.config/ponder/config.toml`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn available_tools(&self) -> Vec<String> {
        self.tools
            .clone()
            .unwrap_or_else(|| vec!["search".to_string()])
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    /// Tick period, clamped to at least one millisecond.
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(
            self.reveal_interval_ms
                .unwrap_or(DEFAULT_REVEAL_INTERVAL_MS)
                .max(1),
        )
    }

    pub fn reveal_chars_per_tick(&self) -> usize {
        self.reveal_chars_per_tick
            .unwrap_or(DEFAULT_REVEAL_CHARS_PER_TICK)
            .max(1)
    }
}
