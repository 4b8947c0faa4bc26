//! The chat view's state and the transitions driven by input, stream events
//! and reveal ticks.

use crate::core::config::Config;
use crate::core::tools::{ToolSelection, ToolSpec, ToolsDropdown};
use crate::core::turn::TurnState;
use crate::ui::theme::Theme;
use crate::utils::url::construct_api_url;

pub mod conversation;
pub mod ui_state;


pub use ui_state::UiState;

/// Connection settings shared by every turn of a session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub endpoint: String,
    pub reveal_chars_per_tick: usize,
}

impl SessionContext {
    pub fn answer_url(&self) -> String {
        construct_api_url(&self.base_url, &self.endpoint)
    }
}

/// Values resolved from the command line that override the config file.
#[derive(Debug, Clone, Default)]
pub struct AppInitConfig {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub tools: Vec<String>,
}

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    pub turn: TurnState,
    pub tools: ToolSelection,
    pub available_tools: Vec<ToolSpec>,
    pub tools_dropdown: ToolsDropdown,
}

impl App {
    pub fn new(init: AppInitConfig, config: &Config) -> Self {
        let base_url = init
            .base_url
            .unwrap_or_else(|| config.base_url().to_string());
        let endpoint = init
            .endpoint
            .unwrap_or_else(|| config.endpoint().to_string());

        let mut available_tools: Vec<ToolSpec> = config
            .available_tools()
            .iter()
            .map(|name| ToolSpec::from_name(name))
            .collect();

        let enabled = if init.tools.is_empty() {
            config.default_tools.clone()
        } else {
            init.tools
        };
        // Tools enabled from the command line always appear in the dropdown.
        for name in &enabled {
            if !available_tools.iter().any(|tool| &tool.name == name) {
                available_tools.push(ToolSpec::from_name(name));
            }
        }

        let theme = Theme::from_name(config.theme.as_deref());

        App {
            session: SessionContext {
                client: reqwest::Client::new(),
                base_url,
                endpoint,
                reveal_chars_per_tick: config.reveal_chars_per_tick(),
            },
            ui: UiState::new(theme, config.markdown_enabled()),
            turn: TurnState::new(),
            tools: ToolSelection::from_names(enabled),
            available_tools,
            tools_dropdown: ToolsDropdown::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.turn.is_loading()
    }

    /// Toggle the tool on the dropdown's highlighted row.
    pub fn toggle_selected_tool(&mut self) -> bool {
        let Some(tool) = self.available_tools.get(self.tools_dropdown.selected()) else {
            return false;
        };
        self.tools.toggle(&tool.name)
    }

    pub fn toggle_tool_at(&mut self, index: usize) -> Option<bool> {
        let tool = self.available_tools.get(index)?;
        Some(self.tools.toggle(&tool.name))
    }
}
