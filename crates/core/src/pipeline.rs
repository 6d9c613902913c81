//! 파이프라인 trait -- 모듈 확장 포인트 정의
//!
//! 두 trait 모두 순수 함수형 계약입니다: 입력을 변경하지 않고, 호출 간 상태를 유지하지 않습니다.

use crate::types::{Event, Incident, IncidentType};

/// 탐지 규칙을 구현하는 trait
///
/// 새로운 탐지 규칙을 추가하려면 이 trait을 구현합니다.
/// 각 규칙은 전체 이벤트 시퀀스를 받아 0개 이상의 인시던트를 반환하며,
/// 인시던트는 입력 슬라이스의 이벤트를 빌려 참조합니다.
pub trait Detector: Send + Sync {
    /// 규칙 이름 (설정에서 비활성화할 때 사용하는 식별자)
    fn name(&self) -> &str;

    /// 이 규칙이 생성하는 인시던트 유형
    fn incident_type(&self) -> IncidentType;

    /// 이벤트 시퀀스를 분석하여 인시던트 목록을 생성
    fn detect<'a>(&self, events: &'a [Event]) -> Vec<Incident<'a>>;
}

/// 로그 파서 trait
///
/// 새로운 로그 형식을 지원하려면 이 trait을 구현합니다.
/// 파싱은 실패하지 않습니다. 인식할 수 없는 입력은 "더 적은 이벤트"로 귀결됩니다.
pub trait LogParser: Send + Sync {
    /// 지원하는 로그 형식 이름
    fn format_name(&self) -> &str;

    /// 로그 파일 전체 내용을 이벤트 시퀀스로 파싱
    fn parse(&self, content: &str) -> Vec<Event>;
}
