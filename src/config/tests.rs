//! Configuration tests

use super::observability::LogRotation;
use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that the generated template parses back into the same config.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed = Config::parse_file_config(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let resolved = Config::resolve(parsed.unwrap(), no_env);
    assert_eq!(resolved.backend, config.backend);
    assert_eq!(resolved.runner, config.runner);
    assert_eq!(resolved.chat, config.chat);
    assert_eq!(resolved.logging, config.logging);
}

#[test]
fn test_config_roundtrip_with_optional_backend_values() {
    let mut config = Config::default();
    config.backend.timeout_secs = Some(45);
    config.backend.session_id = Some("week-3".to_string());
    config.logging.file_rotation = LogRotation::Hourly;

    let parsed = Config::parse_file_config(&config.to_toml()).expect("should parse");
    let resolved = Config::resolve(parsed, no_env);

    assert_eq!(resolved.backend.timeout_secs, Some(45));
    assert_eq!(resolved.backend.session_id.as_deref(), Some("week-3"));
    assert_eq!(resolved.logging.file_rotation, LogRotation::Hourly);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::resolve(FileConfig::default(), no_env);
    assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.backend.timeout_secs, None);
    assert_eq!(config.runner.interpreter, "python3");
    assert_eq!(config.chat.default_quiz_topic, "Python Concepts");
    assert_eq!(config.theme, "dark");
}

#[test]
fn test_file_overrides_defaults() {
    let file = Config::parse_file_config(
        r#"
        theme = "light"

        [backend]
        base_url = "http://tutor.local:9000/"
        timeout_secs = 0

        [runner]
        interpreter = "python3.12"
        "#,
    )
    .expect("valid toml");

    let config = Config::resolve(file, no_env);
    assert_eq!(config.theme, "light");
    assert_eq!(config.backend.base_url, "http://tutor.local:9000/");
    // zero means no timeout
    assert_eq!(config.backend.timeout_secs, None);
    assert_eq!(config.runner.interpreter, "python3.12");
}

#[test]
fn test_env_overrides_file() {
    let file = Config::parse_file_config(
        r#"
        [backend]
        base_url = "http://from-file:8000"
        session_id = "file-session"
        "#,
    )
    .expect("valid toml");

    let env = env_from(&[
        ("AI_TUTOR_BACKEND_URL", "http://from-env:8000"),
        ("AI_TUTOR_PYTHON", "/usr/bin/python3"),
        ("AI_TUTOR_SESSION", ""),
    ]);
    let config = Config::resolve(file, env);

    assert_eq!(config.backend.base_url, "http://from-env:8000");
    assert_eq!(config.runner.interpreter, "/usr/bin/python3");
    // empty env value clears the file's session id
    assert_eq!(config.backend.session_id, None);
}

#[test]
fn test_blank_interpreter_falls_back_to_default() {
    let file = Config::parse_file_config("[runner]\ninterpreter = \"  \"\n").expect("valid toml");
    assert_eq!(Config::resolve(file, no_env).runner.interpreter, "python3");
}

#[test]
fn test_invalid_toml_is_an_error() {
    assert!(Config::parse_file_config("[backend\nbase_url = 1").is_err());
}

#[test]
fn test_unknown_rotation_defaults_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("NEVER"), LogRotation::Never);
}

#[test]
fn test_logging_section_is_validated() {
    let file = Config::parse_file_config(
        r#"
        [logging]
        level = " DEBUG "
        file_rotation = "Hourly"
        file_prefix = "  "
        "#,
    )
    .expect("valid toml");
    let logging = Config::resolve(file, no_env).logging;
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.file_rotation, LogRotation::Hourly);
    assert_eq!(logging.file_prefix, "ai-tutor");

    let file = Config::parse_file_config("[logging]\nlevel = \"loud\"\n").expect("valid toml");
    assert_eq!(Config::resolve(file, no_env).logging.level, "info");
}

#[test]
fn test_rotation_names_round_trip() {
    for rotation in [LogRotation::Hourly, LogRotation::Daily, LogRotation::Never] {
        assert_eq!(LogRotation::parse(rotation.as_str()), rotation);
    }
}

#[test]
fn test_never_rotation_writes_prefix_file() {
    use std::io::Write;
    let dir = tempfile::tempdir().unwrap();
    let mut appender = LogRotation::Never.appender(dir.path(), "tutor-test");
    appender.write_all(b"{}\n").unwrap();
    appender.flush().unwrap();
    assert!(dir.path().join("tutor-test").exists());
}
