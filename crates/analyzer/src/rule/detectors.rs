//! 다섯 개의 탐지 규칙
//!
//! 각 규칙은 전체 이벤트 시퀀스를 받는 순수 함수이며 서로 상태를 공유하지 않습니다.
//! 규칙 간 중복 제거는 하지 않습니다. 같은 이벤트가 여러 규칙의 인시던트에 포함될 수 있습니다.

use std::collections::HashSet;

use authwatch_core::pipeline::Detector;
use authwatch_core::types::{Event, EventType, Incident, IncidentType, Severity};
use chrono::TimeDelta;
use tracing::debug;

use super::window::{find_first_window, group_by_key};

/// 규칙 메타데이터 (정책 상수)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulePolicy {
    /// 인시던트 심각도
    pub severity: Severity,
    /// 고정 신뢰도
    pub confidence: f64,
    /// 윈도우 폭 (분). 이벤트 단위 규칙은 `None`
    pub window_minutes: Option<i64>,
}

fn window_end(window: &[&Event]) -> Option<chrono::DateTime<chrono::Utc>> {
    window.last().and_then(|e| e.timestamp)
}

fn log_incident(incident: &Incident<'_>) {
    debug!(
        rule = %incident.incident_type,
        severity = %incident.severity,
        related = incident.related_logs.len(),
        "incident emitted"
    );
}

// =============================================================================
// R1: FailedLoginBurst
// =============================================================================

/// 브루트포스 임계값 미만(2~4회)의 로그인 실패 묶음
///
/// `FAILED_LOGIN`만 대상으로 하며 `INVALID_USER`는 제외합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailedLoginBurst;

impl FailedLoginBurst {
    /// 윈도우 폭 (분)
    pub const WINDOW_MINUTES: i64 = 10;

    /// 정책 상수
    pub const POLICY: RulePolicy = RulePolicy {
        severity: Severity::Low,
        confidence: 0.55,
        window_minutes: Some(Self::WINDOW_MINUTES),
    };
    const MIN_EVENTS: usize = 2;
    const MAX_EVENTS: usize = 4;
}

impl Detector for FailedLoginBurst {
    fn name(&self) -> &str {
        "failed_login_burst"
    }

    fn incident_type(&self) -> IncidentType {
        IncidentType::FailedLoginBurst
    }

    fn detect<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>> {
        let relevant = events
            .iter()
            .filter(|e| e.event_type == EventType::FailedLogin && e.timestamp.is_some());
        let width = TimeDelta::minutes(Self::WINDOW_MINUTES);

        group_by_key(relevant, |e| e.ip.as_deref())
            .into_iter()
            .filter_map(|(ip, group)| {
                let window = find_first_window(&group, width, |w| {
                    (Self::MIN_EVENTS..=Self::MAX_EVENTS).contains(&w.len())
                })?;
                let incident = Incident {
                    incident_type: IncidentType::FailedLoginBurst,
                    severity: Self::POLICY.severity,
                    confidence: Self::POLICY.confidence,
                    description: format!(
                        "Observed {} failed login attempts from IP {} within {} minutes (below brute-force threshold)",
                        window.len(),
                        ip,
                        Self::WINDOW_MINUTES
                    ),
                    affected_user: None,
                    source_ip: Some(ip.to_owned()),
                    timestamp: window_end(&window),
                    related_logs: window,
                };
                log_incident(&incident);
                Some(incident)
            })
            .collect()
    }
}

// =============================================================================
// R2: BruteForceAttack
// =============================================================================

/// 단일 IP에서 2분 안에 5회 이상의 로그인 실패
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceAttack;

impl BruteForceAttack {
    /// 윈도우 폭 (분)
    pub const WINDOW_MINUTES: i64 = 2;

    /// 정책 상수
    pub const POLICY: RulePolicy = RulePolicy {
        severity: Severity::High,
        confidence: 0.85,
        window_minutes: Some(Self::WINDOW_MINUTES),
    };
    const MIN_EVENTS: usize = 5;
}

/// 윈도우 안의 비어 있지 않은 사용자명이 정확히 하나일 때만 그 사용자를 반환합니다.
fn single_user(window: &[&Event]) -> Option<String> {
    let users: HashSet<&str> = window
        .iter()
        .filter_map(|e| e.user.as_deref())
        .filter(|u| !u.is_empty())
        .collect();
    if users.len() == 1 {
        users.into_iter().next().map(str::to_owned)
    } else {
        None
    }
}

impl Detector for BruteForceAttack {
    fn name(&self) -> &str {
        "brute_force"
    }

    fn incident_type(&self) -> IncidentType {
        IncidentType::BruteForceAttack
    }

    fn detect<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>> {
        let relevant = events.iter().filter(|e| {
            matches!(e.event_type, EventType::FailedLogin | EventType::InvalidUser)
                && e.timestamp.is_some()
        });
        let width = TimeDelta::minutes(Self::WINDOW_MINUTES);

        group_by_key(relevant, |e| e.ip.as_deref())
            .into_iter()
            .filter_map(|(ip, group)| {
                let window = find_first_window(&group, width, |w| w.len() >= Self::MIN_EVENTS)?;
                let incident = Incident {
                    incident_type: IncidentType::BruteForceAttack,
                    severity: Self::POLICY.severity,
                    confidence: Self::POLICY.confidence,
                    description: format!(
                        "Detected possible brute force attack from IP {} with {} failed logins within {} minutes",
                        ip,
                        window.len(),
                        Self::WINDOW_MINUTES
                    ),
                    affected_user: single_user(&window),
                    source_ip: Some(ip.to_owned()),
                    timestamp: window_end(&window),
                    related_logs: window,
                };
                log_incident(&incident);
                Some(incident)
            })
            .collect()
    }
}

// =============================================================================
// R3: UnauthorizedSudoAccess
// =============================================================================

/// sudoers에 없는 사용자의 sudo 시도 (이벤트당 인시던트 하나)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthorizedSudoAccess;

impl UnauthorizedSudoAccess {
    /// 정책 상수
    pub const POLICY: RulePolicy = RulePolicy {
        severity: Severity::Medium,
        confidence: 0.9,
        window_minutes: None,
    };
}

impl Detector for UnauthorizedSudoAccess {
    fn name(&self) -> &str {
        "sudo_violation"
    }

    fn incident_type(&self) -> IncidentType {
        IncidentType::UnauthorizedSudoAccess
    }

    fn detect<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>> {
        events
            .iter()
            .filter(|e| e.event_type == EventType::SudoViolation)
            .map(|event| {
                per_event_incident(
                    event,
                    IncidentType::UnauthorizedSudoAccess,
                    Self::POLICY,
                    format!(
                        "User {} attempted sudo but is not in sudoers",
                        event.user.as_deref().unwrap_or("unknown")
                    ),
                )
            })
            .collect()
    }
}

// =============================================================================
// R4: InvalidUserLoginAttempt
// =============================================================================

/// 존재하지 않는 사용자로 로그인 시도 (이벤트당 인시던트 하나)
///
/// 같은 이벤트가 [`BruteForceAttack`] 인시던트에 포함되어 있어도 독립적으로 생성됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidUserLoginAttempt;

impl InvalidUserLoginAttempt {
    /// 정책 상수
    pub const POLICY: RulePolicy = RulePolicy {
        severity: Severity::Low,
        confidence: 0.75,
        window_minutes: None,
    };
}

impl Detector for InvalidUserLoginAttempt {
    fn name(&self) -> &str {
        "invalid_user"
    }

    fn incident_type(&self) -> IncidentType {
        IncidentType::InvalidUserLoginAttempt
    }

    fn detect<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>> {
        events
            .iter()
            .filter(|e| e.event_type == EventType::InvalidUser)
            .map(|event| {
                per_event_incident(
                    event,
                    IncidentType::InvalidUserLoginAttempt,
                    Self::POLICY,
                    format!(
                        "Login attempt with non-existent user {}",
                        event.user.as_deref().unwrap_or("unknown")
                    ),
                )
            })
            .collect()
    }
}

fn per_event_incident<'a>(
    event: &'a Event,
    incident_type: IncidentType,
    policy: RulePolicy,
    description: String,
) -> Incident<'a> {
    let incident = Incident {
        incident_type,
        severity: policy.severity,
        confidence: policy.confidence,
        description,
        affected_user: event.user.clone(),
        source_ip: event.ip.clone(),
        timestamp: event.timestamp,
        related_logs: vec![event],
    };
    log_incident(&incident);
    incident
}

// =============================================================================
// R5: SuspiciousIpPattern
// =============================================================================

/// 한 사용자가 10분 안에 3개 이상의 서로 다른 IP에서 로그인 성공
#[derive(Debug, Clone, Copy, Default)]
pub struct SuspiciousIpPattern;

impl SuspiciousIpPattern {
    /// 윈도우 폭 (분)
    pub const WINDOW_MINUTES: i64 = 10;

    /// 정책 상수
    pub const POLICY: RulePolicy = RulePolicy {
        severity: Severity::High,
        confidence: 0.8,
        window_minutes: Some(Self::WINDOW_MINUTES),
    };
    const MIN_DISTINCT_IPS: usize = 3;
}

fn distinct_ips(window: &[&Event]) -> usize {
    window
        .iter()
        .filter_map(|e| e.ip.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

impl Detector for SuspiciousIpPattern {
    fn name(&self) -> &str {
        "suspicious_ip_pattern"
    }

    fn incident_type(&self) -> IncidentType {
        IncidentType::SuspiciousIpPattern
    }

    fn detect<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>> {
        let relevant = events.iter().filter(|e| {
            e.event_type == EventType::AcceptedLogin && e.timestamp.is_some() && e.ip.is_some()
        });
        let width = TimeDelta::minutes(Self::WINDOW_MINUTES);

        group_by_key(relevant, |e| e.user.as_deref())
            .into_iter()
            .filter_map(|(user, group)| {
                let window = find_first_window(&group, width, |w| {
                    distinct_ips(w) >= Self::MIN_DISTINCT_IPS
                })?;
                let incident = Incident {
                    incident_type: IncidentType::SuspiciousIpPattern,
                    severity: Self::POLICY.severity,
                    confidence: Self::POLICY.confidence,
                    description: format!(
                        "User {} logged in from {} different IPs within {} minutes",
                        user,
                        distinct_ips(&window),
                        Self::WINDOW_MINUTES
                    ),
                    affected_user: Some(user.to_owned()),
                    source_ip: None,
                    timestamp: window_end(&window),
                    related_logs: window,
                };
                log_incident(&incident);
                Some(incident)
            })
            .collect()
    }
}
