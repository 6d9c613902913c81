//! 분석기 에러 타입
//!
//! [`LogAnalyzerError`]는 분석기 구성 단계에서 발생하는 에러를 표현합니다.
//! 파싱과 규칙 평가 자체는 실패하지 않으므로 여기에 해당하는 변형은 없습니다.
//! `From<LogAnalyzerError> for AuthwatchError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use authwatch_core::error::{AuthwatchError, ConfigError, DetectionError};

/// 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogAnalyzerError {
    /// 패턴 테이블 정규식 컴파일 실패
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// 설정에서 참조한 규칙 이름이 존재하지 않음
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 시나리오 생성 에러 (알 수 없는 시나리오 종류 등)
    #[error("scenario error: {0}")]
    Scenario(String),
}

impl From<LogAnalyzerError> for AuthwatchError {
    fn from(err: LogAnalyzerError) -> Self {
        match err {
            LogAnalyzerError::UnknownRule(name) => {
                AuthwatchError::Detection(DetectionError::UnknownRule(name))
            }
            LogAnalyzerError::Config { field, reason } => {
                AuthwatchError::Config(ConfigError::InvalidValue { field, reason })
            }
            other => AuthwatchError::Detection(DetectionError::InitFailed(other.to_string())),
        }
    }
}
