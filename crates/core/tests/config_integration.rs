//! authwatch.toml 통합 설정 테스트
//!
//! - authwatch.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use std::fs;

use authwatch_core::config::AuthwatchConfig;
use authwatch_core::error::{AuthwatchError, ConfigError};
use serial_test::serial;
use tempfile::TempDir;

// =============================================================================
// authwatch.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../authwatch.toml.example");
    let config = AuthwatchConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../authwatch.toml.example");
    let config = AuthwatchConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../authwatch.toml.example");
    let from_file = AuthwatchConfig::parse(content).expect("should parse");
    let from_code = AuthwatchConfig::default();

    // 모든 기본값이 코드 Default 구현과 일치하는지 확인
    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);
    assert_eq!(
        from_file.analyzer.max_line_bytes,
        from_code.analyzer.max_line_bytes
    );
    assert_eq!(
        from_file.analyzer.disabled_rules,
        from_code.analyzer.disabled_rules
    );
    assert_eq!(from_file.analyzer.year, from_code.analyzer.year);
    assert_eq!(from_file.generator.hostname, from_code.generator.hostname);
    assert_eq!(from_file.generator.seed, from_code.generator.seed);
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
log_format = "json"
"#;
    let config = AuthwatchConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "json");
    // 나머지 섹션은 기본값
    assert_eq!(config.analyzer.max_line_bytes, 65536);
    assert_eq!(config.generator.hostname, "server");
}

#[test]
fn partial_config_analyzer_only() {
    let toml = r#"
[analyzer]
disabled_rules = ["brute_force"]
year = 2023
"#;
    let config = AuthwatchConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.analyzer.disabled_rules, vec!["brute_force"]);
    assert_eq!(config.analyzer.year, Some(2023));
    // general은 기본값
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn unknown_field_type_fails_to_parse() {
    let toml = r#"
[analyzer]
max_line_bytes = "large"
"#;
    let err = AuthwatchConfig::parse(toml).expect_err("string for usize should fail");
    assert!(matches!(
        err,
        AuthwatchError::Config(ConfigError::ParseFailed { .. })
    ));
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn load_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("empty.toml");
    fs::write(&path, "").expect("should write empty file");

    let config = AuthwatchConfig::from_file(&path)
        .await
        .expect("empty file should load");
    assert_eq!(config.general.log_level, "info");
}

#[tokio::test]
async fn load_invalid_value_fails_validation() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[general]\nlog_level = \"loud\"\n").expect("should write config");

    let err = AuthwatchConfig::from_file(&path)
        .await
        .expect_err("invalid log level should fail");
    assert!(matches!(
        err,
        AuthwatchError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn load_missing_file_reports_path() {
    let err = AuthwatchConfig::load("/nonexistent/authwatch.toml")
        .await
        .expect_err("missing file should fail");
    assert!(err.to_string().contains("/nonexistent/authwatch.toml"));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[tokio::test]
#[serial]
async fn env_overrides_take_precedence_over_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("authwatch.toml");
    fs::write(
        &path,
        "[general]\nlog_level = \"info\"\n\n[analyzer]\ndisabled_rules = [\"brute_force\"]\n",
    )
    .expect("should write config");

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("AUTHWATCH_GENERAL_LOG_LEVEL", "debug");
        std::env::set_var(
            "AUTHWATCH_ANALYZER_DISABLED_RULES",
            "invalid_user,sudo_violation",
        );
    }

    let result = AuthwatchConfig::load(&path).await;

    unsafe {
        std::env::remove_var("AUTHWATCH_GENERAL_LOG_LEVEL");
        std::env::remove_var("AUTHWATCH_ANALYZER_DISABLED_RULES");
    }

    let config = result.expect("config should load");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(
        config.analyzer.disabled_rules,
        vec!["invalid_user", "sudo_violation"]
    );
}

#[tokio::test]
#[serial]
async fn invalid_env_override_is_rejected_by_validation() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("authwatch.toml");
    fs::write(&path, "").expect("should write config");

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("AUTHWATCH_GENERAL_LOG_FORMAT", "xml") };
    let result = AuthwatchConfig::load(&path).await;
    unsafe { std::env::remove_var("AUTHWATCH_GENERAL_LOG_FORMAT") };

    let err = result.expect_err("xml log format should be rejected");
    assert!(err.to_string().contains("log_format"));
}
