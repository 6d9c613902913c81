//! 인시던트 통계 요약
//!
//! 한 번의 분석 결과에 대해 심각도별/유형별 건수와 상위 출발지 IP, 상위 사용자를 계산합니다.

use std::collections::{BTreeMap, HashMap};

use authwatch_core::types::{Incident, IncidentType, Severity};
use serde::Serialize;

/// 상위 목록 기본 크기
pub const DEFAULT_TOP_N: usize = 5;

/// 심각도별 건수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl SeverityCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
        }
    }
}

/// 값과 등장 횟수
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedValue {
    pub value: String,
    pub count: usize,
}

/// 인시던트 요약 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentSummary {
    /// 전체 인시던트 수
    pub total: usize,
    /// 심각도별 건수
    pub by_severity: SeverityCounts,
    /// 유형별 건수 (규칙 순서)
    pub by_type: BTreeMap<IncidentType, usize>,
    /// 인시던트가 많은 출발지 IP
    pub top_source_ips: Vec<RankedValue>,
    /// 인시던트가 많은 사용자
    pub top_users: Vec<RankedValue>,
}

impl IncidentSummary {
    /// 기본 상위 목록 크기로 요약을 계산합니다.
    pub fn from_incidents(incidents: &[Incident<'_>]) -> Self {
        Self::with_top_n(incidents, DEFAULT_TOP_N)
    }

    /// 상위 목록 크기를 지정하여 요약을 계산합니다.
    pub fn with_top_n(incidents: &[Incident<'_>], top_n: usize) -> Self {
        let mut by_severity = SeverityCounts::default();
        let mut by_type = BTreeMap::new();

        for incident in incidents {
            by_severity.add(incident.severity);
            *by_type.entry(incident.incident_type).or_insert(0) += 1;
        }

        Self {
            total: incidents.len(),
            by_severity,
            by_type,
            top_source_ips: rank(incidents.iter().filter_map(|i| i.source_ip.as_deref()), top_n),
            top_users: rank(incidents.iter().filter_map(|i| i.affected_user.as_deref()), top_n),
        }
    }
}

/// 등장 횟수 내림차순, 동률이면 먼저 등장한 값 우선
fn rank<'a>(values: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<RankedValue> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counted: Vec<RankedValue> = Vec::new();

    for value in values {
        match slots.get(value) {
            Some(&idx) => counted[idx].count += 1,
            None => {
                slots.insert(value, counted.len());
                counted.push(RankedValue {
                    value: value.to_owned(),
                    count: 1,
                });
            }
        }
    }

    // 안정 정렬이므로 동률은 등장 순서를 유지한다
    counted.sort_by(|a, b| b.count.cmp(&a.count));
    counted.truncate(top_n);
    counted
}
