//! Unit tests for configuration parsing and validation.

use std::io::Write;

use zammad_slack_gateway::{config::GlobalConfig, AppError};

fn minimal_toml() -> &'static str {
    r#"
[zammad]
base_url = "https://support.example.com"
"#
}

fn full_toml() -> &'static str {
    r##"
bind_address = "127.0.0.1"
http_port = 8080
webhook_path = "/hooks/zammad"

[zammad]
base_url = "https://support.example.com/"

[slack]
thread_color = "#ff0000"
"##
}

#[test]
fn minimal_config_uses_defaults() {
    let config = GlobalConfig::from_toml_str(minimal_toml()).expect("config parses");
    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.webhook_path, "/webhook");
    assert_eq!(config.slack.thread_color, "#87ecc3");
    assert_eq!(config.zammad.base_url, "https://support.example.com");
}

#[test]
fn full_config_overrides_defaults() {
    let config = GlobalConfig::from_toml_str(full_toml()).expect("config parses");
    assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    assert_eq!(config.webhook_path, "/hooks/zammad");
    assert_eq!(config.slack.thread_color, "#ff0000");
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let config = GlobalConfig::from_toml_str(full_toml()).expect("config parses");
    assert_eq!(config.zammad.base_url, "https://support.example.com");
}

#[test]
fn secrets_are_never_read_from_toml() {
    let toml = r#"
webhook_secret = "from-file"

[zammad]
base_url = "https://support.example.com"
token = "from-file"

[slack]
bot_token = "from-file"
"#;
    let config = GlobalConfig::from_toml_str(toml).expect("config parses");
    assert!(config.webhook_secret.is_empty());
    assert!(config.zammad.token.is_empty());
    assert!(config.slack.bot_token.is_empty());
}

#[test]
fn missing_zammad_section_is_rejected() {
    let result = GlobalConfig::from_toml_str("http_port = 3000\n");
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn non_http_base_url_is_rejected() {
    let toml = r#"
[zammad]
base_url = "ftp://support.example.com"
"#;
    let err = GlobalConfig::from_toml_str(toml).expect_err("ftp rejected");
    assert!(err.to_string().contains("http or https"), "got: {err}");
}

#[test]
fn unparseable_base_url_is_rejected() {
    let toml = r#"
[zammad]
base_url = "not a url"
"#;
    assert!(matches!(
        GlobalConfig::from_toml_str(toml),
        Err(AppError::Config(_))
    ));
}

#[test]
fn relative_webhook_path_is_rejected() {
    let toml = r#"
webhook_path = "webhook"

[zammad]
base_url = "https://support.example.com"
"#;
    let err = GlobalConfig::from_toml_str(toml).expect_err("relative path rejected");
    assert!(err.to_string().contains("webhook_path"), "got: {err}");
}

#[test]
fn empty_thread_color_is_rejected() {
    let toml = r#"
[zammad]
base_url = "https://support.example.com"

[slack]
thread_color = " "
"#;
    assert!(matches!(
        GlobalConfig::from_toml_str(toml),
        Err(AppError::Config(_))
    ));
}

#[test]
fn invalid_toml_reports_config_error() {
    let err = GlobalConfig::from_toml_str("[zammad\nbase_url =").expect_err("invalid toml");
    assert!(err.to_string().starts_with("config: invalid config"));
}

#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(full_toml().as_bytes()).expect("write config");
    let config = GlobalConfig::load_from_path(file.path()).expect("config loads");
    assert_eq!(config.http_port, 8080);
}

#[test]
fn load_from_missing_path_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = GlobalConfig::load_from_path(dir.path().join("absent.toml"))
        .expect_err("missing file");
    assert!(err.to_string().contains("failed to read config"));
}
