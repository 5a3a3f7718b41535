//! Unit tests for secret loading.
//!
//! The keychain service `zammad-slack-gateway` is absent in test
//! environments, so these exercise the env-var fallback. They mutate
//! process-global env vars and run serially.

use zammad_slack_gateway::config::GlobalConfig;

const VARS: [&str; 3] = ["SLACK_TOKEN", "ZAMMAD_TOKEN", "WEBHOOK_SIGNATURE_SECRET"];

fn make_config() -> GlobalConfig {
    GlobalConfig::from_toml_str(
        r#"
[zammad]
base_url = "https://support.example.com"
"#,
    )
    .expect("config parses")
}

#[allow(unsafe_code)]
fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

#[allow(unsafe_code)]
fn set_env(var: &str, value: &str) {
    unsafe {
        std::env::set_var(var, value);
    }
}

#[tokio::test]
#[serial_test::serial]
async fn env_var_credentials_are_loaded() {
    let mut config = make_config();
    set_env("SLACK_TOKEN", "xoxb-test");
    set_env("ZAMMAD_TOKEN", "zammad-test");
    set_env("WEBHOOK_SIGNATURE_SECRET", "hook-secret");

    let result = config.load_credentials().await;
    clear_env();

    assert!(result.is_ok(), "load_credentials failed: {result:?}");
    assert_eq!(config.slack.bot_token, "xoxb-test");
    assert_eq!(config.zammad.token, "zammad-test");
    assert_eq!(config.webhook_secret, "hook-secret");
}

#[tokio::test]
#[serial_test::serial]
async fn missing_credential_names_both_sources() {
    let mut config = make_config();
    clear_env();

    let err = config
        .load_credentials()
        .await
        .expect_err("no credential source");
    let msg = err.to_string();
    assert!(msg.contains("zammad-slack-gateway"), "got: {msg}");
    assert!(msg.contains("SLACK_TOKEN"), "got: {msg}");
}

#[tokio::test]
#[serial_test::serial]
async fn empty_env_var_is_rejected() {
    let mut config = make_config();
    set_env("SLACK_TOKEN", "xoxb-test");
    set_env("ZAMMAD_TOKEN", "   ");
    set_env("WEBHOOK_SIGNATURE_SECRET", "hook-secret");

    let result = config.load_credentials().await;
    clear_env();

    let msg = result.expect_err("empty token rejected").to_string();
    assert!(msg.contains("ZAMMAD_TOKEN"), "got: {msg}");
}
