//! 탐지 규칙 엔진 -- 시간 윈도우 상관 분석
//!
//! 다섯 개의 독립적인 [`Detector`]를 고정된 순서로 실행하고 결과를 이어 붙입니다.
//!
//! | 순서 | 규칙 | 그룹 키 | 윈도우 | 조건 | 심각도 |
//! |---|---|---|---|---|---|
//! | 1 | [`FailedLoginBurst`] | ip | 10분 | 실패 2~4회 | Low |
//! | 2 | [`BruteForceAttack`] | ip | 2분 | 실패 5회 이상 | High |
//! | 3 | [`UnauthorizedSudoAccess`] | - | - | 이벤트마다 | Medium |
//! | 4 | [`InvalidUserLoginAttempt`] | - | - | 이벤트마다 | Low |
//! | 5 | [`SuspiciousIpPattern`] | user | 10분 | 서로 다른 IP 3개 이상 | High |
//!
//! # 아키텍처
//! - [`RuleEngine`]: 규칙 등록 및 실행 코디네이터
//! - [`detectors`]: 규칙 구현
//! - [`window`]: 앵커 윈도우 그룹화

pub mod detectors;
pub mod window;

pub use detectors::{
    BruteForceAttack, FailedLoginBurst, InvalidUserLoginAttempt, RulePolicy, SuspiciousIpPattern,
    UnauthorizedSudoAccess,
};

use authwatch_core::config::AnalyzerConfig;
use authwatch_core::pipeline::Detector;
use authwatch_core::types::{Event, Incident, IncidentType, Severity};
use serde::Serialize;
use tracing::debug;

use crate::error::LogAnalyzerError;

/// 기본 규칙 세트를 고정 순서로 생성합니다.
fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(FailedLoginBurst),
        Box::new(BruteForceAttack),
        Box::new(UnauthorizedSudoAccess),
        Box::new(InvalidUserLoginAttempt),
        Box::new(SuspiciousIpPattern),
    ]
}

/// 인시던트 유형별 정책 상수
pub fn policy_for(incident_type: IncidentType) -> RulePolicy {
    match incident_type {
        IncidentType::FailedLoginBurst => FailedLoginBurst::POLICY,
        IncidentType::BruteForceAttack => BruteForceAttack::POLICY,
        IncidentType::UnauthorizedSudoAccess => UnauthorizedSudoAccess::POLICY,
        IncidentType::InvalidUserLoginAttempt => InvalidUserLoginAttempt::POLICY,
        IncidentType::SuspiciousIpPattern => SuspiciousIpPattern::POLICY,
    }
}

/// 규칙 목록 조회용 요약 정보
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleInfo {
    /// 설정에서 사용하는 규칙 이름
    pub name: String,
    /// 생성하는 인시던트 유형
    pub incident_type: IncidentType,
    /// 심각도
    pub severity: Severity,
    /// 고정 신뢰도
    pub confidence: f64,
    /// 윈도우 폭 (분)
    pub window_minutes: Option<i64>,
    /// 활성 여부
    pub enabled: bool,
}

/// 규칙 엔진 -- 탐지 규칙 관리 및 실행 코디네이터
///
/// 엔진은 호출 간 상태를 갖지 않습니다. 같은 입력에 대해 `analyze`는 항상
/// 값이 같은 결과를 반환하며 입력을 변경하지 않습니다.
///
/// # 사용 예시
/// ```
/// use authwatch_analyzer::{AuthLogParser, RuleEngine};
///
/// let parser = AuthLogParser::with_year(2024)?;
/// let events = parser.parse_content("Jan 15 09:15:22 host sudo: alice : user NOT in sudoers ; TTY=pts/0");
///
/// let incidents = RuleEngine::with_defaults().analyze(&events);
/// assert_eq!(incidents.len(), 1);
/// # Ok::<(), authwatch_analyzer::LogAnalyzerError>(())
/// ```
pub struct RuleEngine {
    /// 등록된 규칙 (실행 순서)
    detectors: Vec<Box<dyn Detector>>,
}

impl RuleEngine {
    /// 규칙이 없는 빈 엔진을 생성합니다.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// 다섯 개의 기본 규칙을 고정 순서로 등록한 엔진을 생성합니다.
    pub fn with_defaults() -> Self {
        Self {
            detectors: default_detectors(),
        }
    }

    /// 설정의 `disabled_rules`를 제외한 기본 규칙으로 엔진을 생성합니다.
    ///
    /// 남은 규칙의 상대 순서는 유지됩니다. 알 수 없는 규칙 이름은 에러입니다.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, LogAnalyzerError> {
        let all = default_detectors();

        if let Some(unknown) = config
            .disabled_rules
            .iter()
            .find(|name| !all.iter().any(|d| d.name() == name.as_str()))
        {
            return Err(LogAnalyzerError::UnknownRule(unknown.clone()));
        }

        let detectors: Vec<_> = all
            .into_iter()
            .filter(|d| !config.disabled_rules.iter().any(|n| n == d.name()))
            .collect();

        debug!(
            enabled = detectors.len(),
            disabled = config.disabled_rules.len(),
            "rule engine configured"
        );

        Ok(Self { detectors })
    }

    /// 규칙을 추가합니다. 추가 순서대로 실행됩니다.
    pub fn register(mut self, detector: Box<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// 등록된 규칙 수
    pub fn rule_count(&self) -> usize {
        self.detectors.len()
    }

    /// 등록된 규칙 이름 목록 (실행 순서)
    pub fn rule_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// 이벤트 시퀀스에 모든 규칙을 적용하고 인시던트를 규칙 순서대로 이어 붙입니다.
    pub fn analyze<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>> {
        let mut incidents = Vec::new();
        for detector in &self.detectors {
            let found = detector.detect(events);
            debug!(rule = detector.name(), count = found.len(), "rule evaluated");
            incidents.extend(found);
        }
        incidents
    }

    /// 기본 규칙 카탈로그와 설정 기준 활성 여부
    pub fn catalog(config: &AnalyzerConfig) -> Vec<RuleInfo> {
        default_detectors()
            .iter()
            .map(|d| {
                let policy = policy_for(d.incident_type());
                RuleInfo {
                    name: d.name().to_owned(),
                    incident_type: d.incident_type(),
                    severity: policy.severity,
                    confidence: policy.confidence,
                    window_minutes: policy.window_minutes,
                    enabled: !config.disabled_rules.iter().any(|n| n == d.name()),
                }
            })
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// 기본 규칙 세트로 이벤트를 분석합니다.
pub fn analyze_logs(events: &[Event]) -> Vec<Incident<'_>> {
    RuleEngine::with_defaults().analyze(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use authwatch_core::types::EventType;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn mixed_events() -> Vec<Event> {
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let mut events = Vec::new();
        // R2 + R4 x5
        for i in 0..5 {
            events.push(Event::new(
                EventType::InvalidUser,
                Some(base + TimeDelta::seconds(i * 20)),
                Some("203.0.113.5".to_owned()),
                Some("admin".to_owned()),
                "invalid",
            ));
        }
        // R1
        for i in 0..2 {
            events.push(Event::new(
                EventType::FailedLogin,
                Some(base + TimeDelta::minutes(i)),
                Some("10.0.0.9".to_owned()),
                Some("john".to_owned()),
                "failed",
            ));
        }
        // R3
        events.push(Event::new(
            EventType::SudoViolation,
            Some(base),
            None,
            Some("alice".to_owned()),
            "sudo",
        ));
        // R5
        for (i, ip) in ["1.1.1.1", "2.2.2.2", "3.3.3.3"].iter().enumerate() {
            events.push(Event::new(
                EventType::AcceptedLogin,
                Some(base + TimeDelta::minutes(i as i64)),
                Some((*ip).to_owned()),
                Some("bob".to_owned()),
                "accepted",
            ));
        }
        events
    }

    #[test]
    fn empty_input_produces_no_incidents() {
        assert!(analyze_logs(&[]).is_empty());
    }

    #[test]
    fn output_follows_fixed_rule_order() {
        let events = mixed_events();
        let types: Vec<_> = analyze_logs(&events)
            .iter()
            .map(|i| i.incident_type)
            .collect();
        let mut expected = vec![
            IncidentType::FailedLoginBurst,
            IncidentType::BruteForceAttack,
            IncidentType::UnauthorizedSudoAccess,
        ];
        expected.extend([IncidentType::InvalidUserLoginAttempt; 5]);
        expected.push(IncidentType::SuspiciousIpPattern);
        assert_eq!(types, expected);
    }

    #[test]
    fn analyze_is_idempotent() {
        let events = mixed_events();
        let engine = RuleEngine::with_defaults();
        assert_eq!(engine.analyze(&events), engine.analyze(&events));
    }

    #[test]
    fn from_config_skips_disabled_rules() {
        let config = AnalyzerConfig {
            disabled_rules: vec!["brute_force".to_owned(), "invalid_user".to_owned()],
            ..AnalyzerConfig::default()
        };
        let engine = RuleEngine::from_config(&config).unwrap();
        assert_eq!(
            engine.rule_names(),
            vec!["failed_login_burst", "sudo_violation", "suspicious_ip_pattern"]
        );

        let events = mixed_events();
        let types: Vec<_> = engine.analyze(&events).iter().map(|i| i.incident_type).collect();
        assert_eq!(
            types,
            vec![
                IncidentType::FailedLoginBurst,
                IncidentType::UnauthorizedSudoAccess,
                IncidentType::SuspiciousIpPattern,
            ]
        );
    }

    #[test]
    fn from_config_rejects_unknown_rule() {
        let config = AnalyzerConfig {
            disabled_rules: vec!["port_scan".to_owned()],
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            RuleEngine::from_config(&config),
            Err(LogAnalyzerError::UnknownRule(name)) if name == "port_scan"
        ));
    }

    #[test]
    fn register_custom_detector() {
        let engine = RuleEngine::new().register(Box::new(UnauthorizedSudoAccess));
        assert_eq!(engine.rule_count(), 1);
        assert_eq!(engine.analyze(&mixed_events()).len(), 1);
    }

    #[test]
    fn catalog_reports_enabled_flag() {
        let config = AnalyzerConfig {
            disabled_rules: vec!["sudo_violation".to_owned()],
            ..AnalyzerConfig::default()
        };
        let catalog = RuleEngine::catalog(&config);
        assert_eq!(catalog.len(), 5);
        let sudo = catalog.iter().find(|r| r.name == "sudo_violation").unwrap();
        assert!(!sudo.enabled);
        assert_eq!(sudo.severity, Severity::Medium);
        assert_eq!(sudo.window_minutes, None);
        let brute = catalog.iter().find(|r| r.name == "brute_force").unwrap();
        assert!(brute.enabled);
        assert_eq!(brute.window_minutes, Some(2));
    }
}
