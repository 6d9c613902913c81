//! 설정 관리 -- authwatch.toml 파싱 및 런타임 설정
//!
//! [`AuthwatchConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`AUTHWATCH_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`authwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), authwatch_core::error::AuthwatchError> {
//! use authwatch_core::config::AuthwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AuthwatchConfig::load("authwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AuthwatchConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuthwatchError, ConfigError};

/// authwatch 통합 설정
///
/// `authwatch.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분석기 (파서 + 규칙 엔진) 설정
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    /// 시나리오 생성기 설정
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl AuthwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AuthwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuthwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AuthwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AuthwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            AuthwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `AUTHWATCH_{SECTION}_{FIELD}`
    /// 예: `AUTHWATCH_ANALYZER_DISABLED_RULES=brute_force,invalid_user`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "AUTHWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "AUTHWATCH_GENERAL_LOG_FORMAT");

        // Analyzer
        override_usize(
            &mut self.analyzer.max_line_bytes,
            "AUTHWATCH_ANALYZER_MAX_LINE_BYTES",
        );
        override_csv(
            &mut self.analyzer.disabled_rules,
            "AUTHWATCH_ANALYZER_DISABLED_RULES",
        );
        override_opt_i32(&mut self.analyzer.year, "AUTHWATCH_ANALYZER_YEAR");

        // Generator
        override_string(
            &mut self.generator.hostname,
            "AUTHWATCH_GENERATOR_HOSTNAME",
        );
        override_opt_u64(&mut self.generator.seed, "AUTHWATCH_GENERATOR_SEED");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AuthwatchError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.analyzer.max_line_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.max_line_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        // 규칙 이름 자체의 유효성은 규칙 엔진이 구성될 때 검증됩니다
        if self.analyzer.disabled_rules.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.disabled_rules".to_owned(),
                reason: "rule names must not be empty".to_owned(),
            }
            .into());
        }

        if let Some(year) = self.analyzer.year {
            if !(1970..=9999).contains(&year) {
                return Err(ConfigError::InvalidValue {
                    field: "analyzer.year".to_owned(),
                    reason: format!("{year} is outside 1970-9999"),
                }
                .into());
            }
        }

        if self.generator.hostname.is_empty()
            || self.generator.hostname.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidValue {
                field: "generator.hostname".to_owned(),
                reason: "hostname must be a single non-empty token".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 분석기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// 한 줄의 최대 길이 (바이트). 초과하는 줄은 인식 불가 줄처럼 건너뜁니다.
    pub max_line_bytes: usize,
    /// 비활성화할 규칙 이름 목록
    pub disabled_rules: Vec<String>,
    /// 타임스탬프 해석에 사용할 연도 고정값 (없으면 현재 연도)
    pub year: Option<i32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 64 * 1024, // 64KB
            disabled_rules: Vec::new(),
            year: None,
        }
    }
}

/// 시나리오 생성기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 생성되는 로그 줄의 호스트명
    pub hostname: String,
    /// 난수 시드 (없으면 매번 다른 출력)
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            hostname: "server".to_owned(),
            seed: None,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_opt_i32(target: &mut Option<i32>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<i32>() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse i32 from env var, ignoring"
            ),
        }
    }
}

fn override_opt_u64(target: &mut Option<u64>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
