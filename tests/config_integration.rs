use followup_widgets::config::{AppConfig, DEFAULT_COMPLETIONS_URL, DEFAULT_MODEL};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

const BIN: &str = "followup-widgets";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for key in [
            "FOLLOWUP_SERVER__PORT",
            "FOLLOWUP_COMMENTATOR__MODEL",
            "FOLLOWUP_COMMENTATOR__API_KEY",
            "FOLLOWUP_RESILIENCE__TIMEOUT_DISABLED",
            "CONFIG_FILE",
            "HOST",
            "PORT",
            "SILICON_API_KEY",
            "COMMENTATOR_MODEL",
            "TIMEOUT_DISABLED",
        ] {
            env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.commentator.base_url, DEFAULT_COMPLETIONS_URL);
    assert_eq!(config.commentator.model, DEFAULT_MODEL);
    assert_eq!(config.commentator.max_tokens, 150);
    assert!((config.commentator.temperature - 0.7).abs() < 1e-6);
    assert_eq!(config.commentator.api_key(), None);
    assert!(!config.resilience.timeout_disabled);
    assert_eq!(config.resilience.request_timeout_secs, 30);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("FOLLOWUP_SERVER__PORT", "9090");
        env::set_var("FOLLOWUP_COMMENTATOR__MODEL", "Qwen/Qwen2.5-7B-Instruct");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.commentator.model, "Qwen/Qwen2.5-7B-Instruct");

    clear_env_vars();
}

#[test]
#[serial]
fn test_api_key_from_prefixed_env() {
    clear_env_vars();
    unsafe {
        env::set_var("FOLLOWUP_COMMENTATOR__API_KEY", "sk-prefixed");
        env::set_var("FOLLOWUP_RESILIENCE__TIMEOUT_DISABLED", "true");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.commentator.api_key(), Some("sk-prefixed"));
    assert!(config.resilience.timeout_disabled);

    clear_env_vars();
}

#[test]
#[serial]
fn test_double_underscore_prefix_is_ignored() {
    clear_env_vars();
    unsafe {
        env::set_var("FOLLOWUP__SERVER__PORT", "9191");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 3000);

    unsafe {
        env::remove_var("FOLLOWUP__SERVER__PORT");
    }
}

#[test]
#[serial]
fn test_api_key_from_env_alias() {
    clear_env_vars();
    unsafe {
        env::set_var("SILICON_API_KEY", "sk-from-env");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.commentator.api_key(), Some("sk-from-env"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("FOLLOWUP_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([BIN, "--port", "4040", "--api-key", "sk-cli"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 4040);
    assert_eq!(config.commentator.api_key(), Some("sk-cli"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
server:
  port: 7070
commentator:
  temperature: 0.3
  system_prompt: "请温和一点"
"#
    )
    .expect("Failed to write temp config");

    let path = file.path().to_string_lossy().to_string();
    let config =
        AppConfig::load_from_args([BIN, "--config", path.as_str()]).expect("Failed to load config file");
    assert_eq!(config.server.port, 7070);
    assert!((config.commentator.temperature - 0.3).abs() < 1e-6);
    assert_eq!(config.commentator.system_prompt.as_deref(), Some("请温和一点"));
    // Untouched keys keep their defaults
    assert_eq!(config.commentator.max_tokens, 150);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_error() {
    clear_env_vars();
    assert!(AppConfig::load_from_args([BIN, "--config", "does/not/exist.yaml"]).is_err());
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let cwd_path = "config.yaml";
    fs::write(cwd_path, "server:\n  port: 6060\n").expect("Failed to write ./config.yaml");

    let result = AppConfig::load_from_args([BIN]);

    fs::remove_file(cwd_path).unwrap();

    assert_eq!(result.expect("Failed to load config").server.port, 6060);
}
