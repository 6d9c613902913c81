#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: 패턴 테이블, 타임스탬프 해석기, 인증 로그 파서
//! - [`rule`]: 앵커 윈도우 그룹화와 다섯 개의 탐지 규칙, 규칙 엔진
//! - [`summary`]: 인시던트 통계 요약
//! - [`scenario`]: 합성 공격 시나리오 생성기 (코어와 독립)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! raw text -> AuthLogParser -> [Event] -> RuleEngine -> [Incident] -> IncidentSummary
//!                  |                          |
//!      PatternTable + TimestampResolver   R1..R5 (window grouper)
//!
//! ScenarioGenerator -> raw text (파서가 인식하는 형식 그대로)
//! ```
//!
//! 파서와 규칙 엔진은 순수 함수입니다. I/O와 전역 상태가 없고,
//! 같은 입력에 대해 항상 같은 결과를 반환합니다.

pub mod error;
pub mod parser;
pub mod rule;
pub mod scenario;
pub mod summary;

// --- 주요 타입 re-export ---

// 에러
pub use error::LogAnalyzerError;

// 파서
pub use parser::{AuthLogParser, PatternTable, TimestampResolver};

// 규칙 엔진
pub use rule::{RuleEngine, RuleInfo, analyze_logs};

// 요약
pub use summary::IncidentSummary;

// 시나리오
pub use scenario::{Scenario, ScenarioGenerator, ScenarioKind, ScenarioMetadata};
