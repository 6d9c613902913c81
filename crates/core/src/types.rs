//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 파서가 생성하는 [`Event`]와 규칙 엔진이 생성하는 [`Incident`],
//! 그리고 이들을 분류하는 열거형을 정의합니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 인증 이벤트 유형
///
/// 파서의 패턴 테이블이 한 줄을 분류한 결과입니다.
/// 어떤 패턴에도 매칭되지 않은 줄은 이벤트가 되지 않으므로 "알 수 없음" 변형은 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// SSH 로그인 성공
    AcceptedLogin,
    /// SSH 비밀번호 실패 (존재하는 사용자)
    FailedLogin,
    /// 존재하지 않는 사용자로 로그인 시도
    InvalidUser,
    /// sudoers에 없는 사용자의 sudo 시도
    SudoViolation,
}

impl EventType {
    /// 이벤트 유형에서 파생되는 상태 레이블을 반환합니다.
    pub fn status(self) -> EventStatus {
        match self {
            Self::AcceptedLogin => EventStatus::Success,
            Self::FailedLogin | Self::InvalidUser => EventStatus::Fail,
            Self::SudoViolation => EventStatus::Denied,
        }
    }

    /// 직렬화 형식과 동일한 문자열 표현
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcceptedLogin => "ACCEPTED_LOGIN",
            Self::FailedLogin => "FAILED_LOGIN",
            Self::InvalidUser => "INVALID_USER",
            Self::SudoViolation => "SUDO_VIOLATION",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 이벤트 상태 레이블
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    /// 인증 성공
    Success,
    /// 인증 실패
    Fail,
    /// 권한 거부
    Denied,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Denied => write!(f, "DENIED"),
        }
    }
}

/// 인증 로그 이벤트
///
/// 원시 로그 한 줄에서 파생된 구조화 레코드입니다. 생성 후에는 변경되지 않습니다.
/// `timestamp`, `ip`, `user`는 매칭된 패턴이 캡처하는 필드에 따라 각각 독립적으로 비어 있을 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// 이벤트 시각 (syslog 접두사가 없으면 `None`)
    pub timestamp: Option<DateTime<Utc>>,
    /// 출발지 IPv4 주소 (dotted-quad 문자열)
    pub ip: Option<String>,
    /// 사용자명 토큰
    pub user: Option<String>,
    /// 이벤트 유형
    pub event_type: EventType,
    /// 유형에서 파생된 상태 레이블
    pub status: EventStatus,
    /// 트림된 원본 로그 줄
    pub raw_log: String,
}

impl Event {
    /// 새 이벤트를 생성합니다. `status`는 `event_type`에서 파생됩니다.
    pub fn new(
        event_type: EventType,
        timestamp: Option<DateTime<Utc>>,
        ip: Option<String>,
        user: Option<String>,
        raw_log: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            ip,
            user,
            event_type,
            status: event_type.status(),
            raw_log: raw_log.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] user={} ip={}",
            self.event_type,
            self.user.as_deref().unwrap_or("-"),
            self.ip.as_deref().unwrap_or("-"),
        )
    }
}

/// 인시던트 유형 -- 탐지 규칙 하나당 하나
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IncidentType {
    /// 브루트포스 임계값 미만의 소규모 로그인 실패 묶음
    FailedLoginBurst,
    /// 단일 IP에서의 브루트포스 공격
    BruteForceAttack,
    /// sudoers에 없는 사용자의 sudo 시도
    UnauthorizedSudoAccess,
    /// 존재하지 않는 사용자로 로그인 시도
    InvalidUserLoginAttempt,
    /// 한 사용자가 짧은 시간 안에 여러 IP에서 로그인
    SuspiciousIpPattern,
}

impl IncidentType {
    /// 직렬화 형식과 동일한 문자열 표현
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailedLoginBurst => "FailedLoginBurst",
            Self::BruteForceAttack => "BruteForceAttack",
            Self::UnauthorizedSudoAccess => "UnauthorizedSudoAccess",
            Self::InvalidUserLoginAttempt => "InvalidUserLoginAttempt",
            Self::SuspiciousIpPattern => "SuspiciousIpPattern",
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 보안 인시던트
///
/// 탐지 규칙이 생성한 분류/점수화된 결과입니다.
/// `related_logs`는 호출자가 넘긴 이벤트 슬라이스를 빌려 참조하며 소유하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident<'a> {
    /// 인시던트 유형
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// 심각도
    pub severity: Severity,
    /// 규칙별 고정 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 사람이 읽을 수 있는 요약
    pub description: String,
    /// 영향받은 사용자 (모호하지 않을 때만)
    pub affected_user: Option<String>,
    /// 출발지 IP (모호하지 않을 때만)
    #[serde(rename = "sourceIP")]
    pub source_ip: Option<String>,
    /// 트리거 묶음의 마지막 이벤트 시각
    pub timestamp: Option<DateTime<Utc>>,
    /// 인시던트를 트리거한 이벤트들 (시간순)
    pub related_logs: Vec<&'a Event>,
}

impl fmt::Display for Incident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({:.2}): {}",
            self.severity, self.incident_type, self.confidence, self.description,
        )
    }
}

/// 심각도 레벨
///
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Low < Medium < High`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 낮은 심각도
    #[default]
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}
