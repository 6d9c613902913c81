//! 패턴 테이블 -- 로그 줄을 이벤트 유형과 필드로 분류하는 정규식 목록
//!
//! 각 [`LinePattern`]은 (정규식, 분류 함수) 쌍입니다.
//! [`PatternTable::match_line`]은 등록 순서대로 패턴을 시도하고 첫 번째 매칭을 반환하므로,
//! 한 줄이 두 개 이상의 이벤트가 되는 일은 없습니다.
//!
//! 패턴은 줄 시작에 고정되지 않으며 줄의 어느 위치에서든 매칭됩니다.

use authwatch_core::types::EventType;
use regex::{Captures, Regex};

use crate::error::LogAnalyzerError;

/// SSH 비밀번호 실패 (invalid user 표식 포함 가능)
///
/// IP 옥텟은 ASCII 숫자만 허용합니다.
pub const FAILED_PASSWORD: &str =
    r"Failed password for (?:(invalid user)\s+)?(?P<user>\S+) from (?P<ip>[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)";

/// SSH 로그인 성공
pub const ACCEPTED_PASSWORD: &str =
    r"Accepted password for (?P<user>\S+) from (?P<ip>[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)";

/// sudoers에 없는 사용자의 sudo 시도 (대소문자 무시)
pub const SUDO_VIOLATION: &str = r"(?i)sudo:\s+(?P<user>\S+)\s*:\s*user NOT in sudoers";

/// 한 줄에서 추출된 분류 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 이벤트 유형
    pub event_type: EventType,
    /// 사용자명 캡처
    pub user: Option<String>,
    /// IP 캡처
    pub ip: Option<String>,
}

/// 캡처 그룹에서 이벤트 유형을 결정하는 함수
type Classifier = fn(&Captures<'_>) -> EventType;

/// 단일 줄 매처
pub struct LinePattern {
    name: &'static str,
    regex: Regex,
    classify: Classifier,
}

impl LinePattern {
    /// 정규식을 컴파일하여 매처를 생성합니다.
    pub fn new(
        name: &'static str,
        pattern: &str,
        classify: Classifier,
    ) -> Result<Self, LogAnalyzerError> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            classify,
        })
    }

    /// 줄에 매칭되면 분류 결과를 반환합니다.
    pub fn apply(&self, line: &str) -> Option<LineMatch> {
        let caps = self.regex.captures(line)?;
        Some(LineMatch {
            event_type: (self.classify)(&caps),
            user: named(&caps, "user"),
            ip: named(&caps, "ip"),
        })
    }
}

impl std::fmt::Debug for LinePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePattern")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

fn named(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn classify_failed(caps: &Captures<'_>) -> EventType {
    // 1번 그룹은 "invalid user" 표식
    if caps.get(1).is_some() {
        EventType::InvalidUser
    } else {
        EventType::FailedLogin
    }
}

fn classify_accepted(_: &Captures<'_>) -> EventType {
    EventType::AcceptedLogin
}

fn classify_sudo(_: &Captures<'_>) -> EventType {
    EventType::SudoViolation
}

/// 순서가 있는 패턴 목록
#[derive(Debug)]
pub struct PatternTable {
    patterns: Vec<LinePattern>,
}

impl PatternTable {
    /// 기본 인증 로그 패턴 세트 (실패 -> 성공 -> sudo 순)
    pub fn auth_log() -> Result<Self, LogAnalyzerError> {
        Ok(Self {
            patterns: vec![
                LinePattern::new("ssh_failed_password", FAILED_PASSWORD, classify_failed)?,
                LinePattern::new("ssh_accepted_password", ACCEPTED_PASSWORD, classify_accepted)?,
                LinePattern::new("sudo_violation", SUDO_VIOLATION, classify_sudo)?,
            ],
        })
    }

    /// 첫 번째로 매칭되는 패턴의 결과를 반환합니다.
    pub fn match_line(&self, line: &str) -> Option<LineMatch> {
        self.patterns.iter().find_map(|p| p.apply(line))
    }
}
