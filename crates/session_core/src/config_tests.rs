use super::*;

#[test]
fn test_empty_config_uses_defaults() {
    let config = SessionConfig::from_toml("").unwrap();
    assert_eq!(config, SessionConfig::default());
    assert_eq!(config.recommender.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.recommender.max_attempts, 1);
    assert_eq!(config.clock.mode, TimeMode::Unlimited);
}

#[test]
fn test_partial_config() {
    let config = SessionConfig::from_toml(
        r#"
        log_filter = "session_core=debug"

        [recommender]
        base_url = "http://engine.local:8000"
        max_attempts = 3
        time_limit = 0.5

        [clock]
        mode = "blitz"
        "#,
    )
    .unwrap();

    assert_eq!(config.log_filter.as_deref(), Some("session_core=debug"));
    assert_eq!(config.recommender.base_url, "http://engine.local:8000");
    assert_eq!(config.recommender.max_attempts, 3);
    assert_eq!(config.recommender.timeout_ms, 5_000);
    assert_eq!(config.recommender.time_limit, Some(0.5));
    assert_eq!(config.clock.mode, TimeMode::Blitz);
}

#[test]
fn test_unknown_mode_rejected() {
    let result = SessionConfig::from_toml("[clock]\nmode = \"bullet\"\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_file() {
    let result = SessionConfig::load(Path::new("/nonexistent/session.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
