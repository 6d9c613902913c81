//! 에러 타입 -- 도메인별 에러 정의
//!
//! 파싱 자체는 실패하지 않으므로 "파싱 에러" 분류는 없습니다.
//! 인식할 수 없는 줄은 이벤트 시퀀스에서 조용히 제외됩니다.

/// authwatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AuthwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 탐지 엔진 에러
    #[error("detection error: {0}")]
    Detection(#[from] DetectionError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 탐지 엔진 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// 파서/규칙 엔진 초기화 실패 (패턴 컴파일 등)
    #[error("detector init failed: {0}")]
    InitFailed(String),

    /// 알 수 없는 규칙 이름
    #[error("unknown rule: {0}")]
    UnknownRule(String),
}
