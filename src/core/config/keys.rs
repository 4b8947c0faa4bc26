use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;

/// Keys accepted by `ponder set` / `ponder unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "base-url",
    "endpoint",
    "tools",
    "default-tools",
    "markdown",
    "theme",
    "reveal-interval-ms",
    "reveal-chars-per-tick",
    "log-file",
];

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split([',', ' '])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid(key, value));
        }

        match key {
            "base-url" => {
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(invalid(key, value));
                }
                self.base_url = Some(trimmed.to_string());
            }
            "endpoint" => self.endpoint = Some(trimmed.trim_start_matches('/').to_string()),
            "tools" => self.tools = Some(parse_list(trimmed)),
            "default-tools" => self.default_tools = parse_list(trimmed),
            "markdown" => self.markdown = Some(parse_bool(key, trimmed)?),
            "theme" => match trimmed {
                "dark" | "light" => self.theme = Some(trimmed.to_string()),
                _ => return Err(invalid(key, value)),
            },
            "reveal-interval-ms" => {
                let ms = trimmed
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .ok_or_else(|| invalid(key, value))?;
                self.reveal_interval_ms = Some(ms);
            }
            "reveal-chars-per-tick" => {
                let chars = trimmed
                    .parse::<usize>()
                    .ok()
                    .filter(|chars| *chars > 0)
                    .ok_or_else(|| invalid(key, value))?;
                self.reveal_chars_per_tick = Some(chars);
            }
            "log-file" => self.log_file = Some(trimmed.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "base-url" => self.base_url = None,
            "endpoint" => self.endpoint = None,
            "tools" => self.tools = None,
            "default-tools" => self.default_tools.clear(),
            "markdown" => self.markdown = None,
            "theme" => self.theme = None,
            "reveal-interval-ms" => self.reveal_interval_ms = None,
            "reveal-chars-per-tick" => self.reveal_chars_per_tick = None,
            "log-file" => self.log_file = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
