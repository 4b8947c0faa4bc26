use super::data::{path_display, Config, DEFAULT_BASE_URL, DEFAULT_ENDPOINT};
use super::io::ConfigError;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
    assert_eq!(config.available_tools(), vec!["search"]);
    assert!(config.markdown_enabled());
    assert_eq!(config.reveal_interval(), Duration::from_millis(10));
    assert_eq!(config.reveal_chars_per_tick(), 1);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set_value("base-url", "http://localhost:9000/")
        .expect("set base-url");
    config
        .set_value("default-tools", "search")
        .expect("set default-tools");
    config.set_value("markdown", "off").expect("set markdown");
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded.base_url.as_deref(), Some("http://localhost:9000/"));
    assert_eq!(loaded.default_tools, vec!["search"]);
    assert!(!loaded.markdown_enabled());

    let mut loaded = loaded;
    loaded.unset_value("markdown").expect("unset markdown");
    loaded.unset_value("default-tools").expect("unset tools");
    loaded.save_to_path(&config_path).expect("second save failed");

    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert!(reloaded.markdown_enabled());
    assert!(reloaded.default_tools.is_empty());
}

#[test]
fn parses_toml_fields() {
    let config: Config = toml::from_str(
        r#"
base_url = "http://10.0.0.2:8000"
endpoint = "answer_question_sse"
tools = ["search", "maps"]
reveal_interval_ms = 25
"#,
    )
    .expect("valid toml");
    assert_eq!(config.endpoint(), "answer_question_sse");
    assert_eq!(config.available_tools(), vec!["search", "maps"]);
    assert_eq!(config.reveal_interval(), Duration::from_millis(25));
}

#[test]
fn invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "base_url = [").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("should fail");
    let config_err = err
        .downcast_ref::<ConfigError>()
        .expect("typed config error");
    assert!(matches!(config_err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn set_rejects_unknown_keys_and_bad_values() {
    let mut config = Config::default();
    assert!(matches!(
        config.set_value("model", "x"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(matches!(
        config.set_value("markdown", "maybe"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("reveal-interval-ms", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("base-url", "localhost:8000"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("theme", "neon"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.unset_value("model"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert_eq!(config, Config::default());
}

#[test]
fn endpoint_strips_leading_slash() {
    let mut config = Config::default();
    config
        .set_value("endpoint", "/answer_question_sse")
        .expect("set endpoint");
    assert_eq!(config.endpoint(), "answer_question_sse");
}

#[test]
fn tool_lists_accept_commas_and_spaces() {
    let mut config = Config::default();
    config.set_value("tools", "search, maps  calc").expect("set tools");
    assert_eq!(config.available_tools(), vec!["search", "maps", "calc"]);
}

#[test]
fn summary_lists_effective_values() {
    let config = Config {
        theme: Some("light".to_string()),
        ..Default::default()
    };
    let mut out = Vec::new();
    config.write_summary(&mut out).expect("write summary");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("  base-url: http://127.0.0.1:8000"));
    assert!(text.contains("  default-tools: (none set)"));
    assert!(text.contains("  theme: light"));
    assert!(text.contains("  log-file: (unset)"));
}

#[cfg(unix)]
#[test]
fn path_display_uses_tilde_for_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config/ponder/config.toml");
        assert_eq!(path_display(&path), "~/.config/ponder/config.toml");
    }
}
