#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeDelta, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

use authwatch_analyzer::RuleEngine;
use authwatch_core::types::{Event, EventType};

/// 퍼저용 구조적 이벤트 입력
///
/// IP/사용자 풀을 작게 유지해야 그룹 충돌과 윈도우 경계가 자주 발생합니다.
#[derive(Arbitrary, Debug)]
struct FuzzEvent {
    kind: u8,
    /// 기준 시각으로부터의 초 (None이면 타임스탬프 없음)
    offset_secs: Option<u16>,
    ip: Option<u8>,
    user: Option<u8>,
}

const IPS: [&str; 4] = ["10.0.0.1", "10.0.0.2", "203.0.113.5", "198.51.100.7"];
const USERS: [&str; 3] = ["root", "alice", "admin"];

impl FuzzEvent {
    fn into_event(self) -> Event {
        let event_type = match self.kind % 4 {
            0 => EventType::FailedLogin,
            1 => EventType::InvalidUser,
            2 => EventType::AcceptedLogin,
            _ => EventType::SudoViolation,
        };
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).single();
        let timestamp = match (base, self.offset_secs) {
            (Some(base), Some(secs)) => Some(base + TimeDelta::seconds(i64::from(secs))),
            _ => None,
        };
        Event::new(
            event_type,
            timestamp,
            self.ip.map(|i| IPS[usize::from(i) % IPS.len()].to_owned()),
            self.user.map(|u| USERS[usize::from(u) % USERS.len()].to_owned()),
            "fuzz",
        )
    }
}

fuzz_target!(|input: Vec<FuzzEvent>| {
    let events: Vec<Event> = input
        .into_iter()
        .take(256)
        .map(FuzzEvent::into_event)
        .collect();

    let engine = RuleEngine::with_defaults();
    let first = engine.analyze(&events);
    let second = engine.analyze(&events);

    // 엔진은 상태가 없으므로 같은 입력이면 같은 결과
    assert_eq!(first, second);

    for incident in &first {
        assert!(!incident.related_logs.is_empty());
        assert!((0.0..=1.0).contains(&incident.confidence));
        // 시간순 정렬
        assert!(
            incident
                .related_logs
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp)
        );
    }
});
