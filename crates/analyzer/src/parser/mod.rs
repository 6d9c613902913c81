//! 인증 로그 파서
//!
//! [`AuthLogParser`]는 로그 파일 전체 내용을 줄 단위로 [`PatternTable`]과
//! [`TimestampResolver`]에 적용하여 [`Event`] 시퀀스를 생성합니다.
//! core의 [`LogParser`] trait을 구현합니다.
//!
//! 파싱은 실패하지 않습니다. 빈 줄, 매칭되지 않는 줄, 너무 긴 줄은 건너뛰고
//! 나머지 줄에서 이벤트를 계속 생성합니다.
//!
//! # 사용 예시
//! ```
//! use authwatch_analyzer::parser::AuthLogParser;
//!
//! let parser = AuthLogParser::with_year(2024)?;
//! let events = parser.parse_content(
//!     "Jan 15 08:24:32 host sshd[1240]: Accepted password for john from 10.0.0.50 port 22 ssh2\n\
//!      Jan 15 08:25:00 host CRON[1]: session opened\n",
//! );
//! assert_eq!(events.len(), 1);
//! # Ok::<(), authwatch_analyzer::LogAnalyzerError>(())
//! ```

pub mod patterns;
pub mod timestamp;

pub use patterns::{LineMatch, LinePattern, PatternTable};
pub use timestamp::TimestampResolver;

use authwatch_core::config::AnalyzerConfig;
use authwatch_core::pipeline::LogParser;
use authwatch_core::types::Event;
use tracing::debug;

use crate::error::LogAnalyzerError;

/// 기본 최대 줄 길이 (바이트)
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

/// UTF-8 BOM. 줄 양끝의 공백과 함께 제거합니다.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// 인증 로그(`auth.log`) 파서
///
/// 패턴은 생성 시 한 번만 컴파일되며 파서 값이 소유합니다.
/// 파서는 불변이므로 여러 스레드에서 공유할 수 있습니다.
#[derive(Debug)]
pub struct AuthLogParser {
    patterns: PatternTable,
    resolver: TimestampResolver,
    max_line_bytes: usize,
}

impl AuthLogParser {
    /// 현재 연도를 가정하는 기본 파서를 생성합니다.
    pub fn new() -> Result<Self, LogAnalyzerError> {
        Ok(Self {
            patterns: PatternTable::auth_log()?,
            resolver: TimestampResolver::new()?,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        })
    }

    /// 타임스탬프 연도를 고정한 파서를 생성합니다.
    pub fn with_year(year: i32) -> Result<Self, LogAnalyzerError> {
        Ok(Self::new()?.with_resolver(TimestampResolver::with_year(year)?))
    }

    /// 분석기 설정으로 파서를 생성합니다.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, LogAnalyzerError> {
        if config.max_line_bytes == 0 {
            return Err(LogAnalyzerError::Config {
                field: "max_line_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        let parser = match config.year {
            Some(year) => Self::with_year(year)?,
            None => Self::new()?,
        };
        Ok(parser.with_max_line_bytes(config.max_line_bytes))
    }

    /// 최대 줄 길이를 설정합니다. 이보다 긴 줄은 건너뜁니다.
    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max;
        self
    }

    /// 타임스탬프 해석기를 교체합니다.
    pub fn with_resolver(mut self, resolver: TimestampResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// 최대 줄 길이
    pub fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }

    /// 로그 내용 전체를 파싱하여 파일 순서대로 이벤트를 반환합니다.
    pub fn parse_content(&self, content: &str) -> Vec<Event> {
        content
            .split('\n')
            .enumerate()
            .filter_map(|(idx, line)| self.parse_line(idx + 1, line))
            .collect()
    }

    /// 한 줄을 파싱합니다. `line_no`는 로그 출력용입니다.
    fn parse_line(&self, line_no: usize, line: &str) -> Option<Event> {
        let line = line
            .strip_suffix('\r')
            .unwrap_or(line)
            .trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
        if line.is_empty() {
            return None;
        }

        if line.len() > self.max_line_bytes {
            debug!(
                line_no,
                len = line.len(),
                max = self.max_line_bytes,
                "skipping oversized line"
            );
            return None;
        }

        let matched = self.patterns.match_line(line)?;
        Some(Event::new(
            matched.event_type,
            self.resolver.resolve(line),
            matched.ip,
            matched.user,
            line,
        ))
    }
}

impl LogParser for AuthLogParser {
    fn format_name(&self) -> &str {
        "auth_log"
    }

    fn parse(&self, content: &str) -> Vec<Event> {
        self.parse_content(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authwatch_core::types::{EventStatus, EventType, IncidentType};
    use chrono::{TimeZone, Utc};

    fn parser() -> AuthLogParser {
        AuthLogParser::with_year(2024).unwrap()
    }

    const SAMPLE: &str = "\
Jan 15 08:23:45 host sshd[1234]: Failed password for invalid user admin from 203.0.113.5 port 22 ssh2
Jan 15 08:24:32 host sshd[1240]: Accepted password for john from 10.0.0.50 port 22 ssh2
Jan 15 09:15:22 host sudo: alice : user NOT in sudoers ; TTY=pts/0 ; PWD=/home/alice ; USER=root ; COMMAND=/bin/ls
";

    #[test]
    fn parses_all_three_line_kinds_in_order() {
        let events = parser().parse_content(SAMPLE);
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].event_type, EventType::InvalidUser);
        assert_eq!(events[0].status, EventStatus::Fail);
        assert_eq!(events[0].user.as_deref(), Some("admin"));
        assert_eq!(events[0].ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(
            events[0].timestamp,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 23, 45).unwrap())
        );

        assert_eq!(events[1].event_type, EventType::AcceptedLogin);
        assert_eq!(events[1].status, EventStatus::Success);

        assert_eq!(events[2].event_type, EventType::SudoViolation);
        assert_eq!(events[2].status, EventStatus::Denied);
        assert_eq!(events[2].ip, None);
    }

    #[test]
    fn crlf_line_endings() {
        let content = SAMPLE.replace('\n', "\r\n");
        let events = parser().parse_content(&content);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| !e.raw_log.ends_with('\r')));
    }

    #[test]
    fn raw_log_is_trimmed() {
        let events = parser().parse_content(
            "   Accepted password for john from 10.0.0.50 port 22 ssh2   \n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].raw_log,
            "Accepted password for john from 10.0.0.50 port 22 ssh2"
        );
        // 접두사가 없으므로 타임스탬프도 없음
        assert_eq!(events[0].timestamp, None);
    }

    #[test]
    fn leading_whitespace_before_prefix_is_trimmed_first() {
        let events = parser().parse_content("  Jan 15 08:24:32 host sshd[1]: Accepted password for john from 10.0.0.50");
        assert!(events[0].timestamp.is_some());
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(parser().parse_content("").is_empty());
        assert!(parser().parse_content("\n\n   \r\n\t\n").is_empty());
    }

    #[test]
    fn unrecognized_lines_are_dropped() {
        let events = parser().parse_content(
            "Jan 15 08:00:01 host CRON[999]: (root) CMD (run-parts /etc/cron.hourly)\n\
             Jan 15 08:00:02 host systemd[1]: Started Session 42 of user john.\n",
        );
        assert!(events.is_empty());
    }

    #[test]
    fn out_of_range_timestamp_rolls_over() {
        let events = parser().parse_content(
            "Feb 30 08:23:45 host sshd[1]: Failed password for root from 1.2.3.4 port 22 ssh2",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].timestamp,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 23, 45).unwrap())
        );
        assert_eq!(events[0].event_type, EventType::FailedLogin);
    }

    #[test]
    fn out_of_range_timestamps_still_feed_windowed_rules() {
        let content: String = (0..5)
            .map(|i| {
                format!(
                    "Feb 30 08:00:{:02} host sshd[1]: Failed password for invalid user admin from 203.0.113.5 port 22 ssh2\n",
                    i * 10
                )
            })
            .collect();
        let events = parser().parse_content(&content);
        assert!(events.iter().all(|e| e.timestamp.is_some()));

        let incidents = crate::analyze_logs(&events);
        assert_eq!(
            incidents
                .iter()
                .filter(|i| i.incident_type == IncidentType::BruteForceAttack)
                .count(),
            1
        );
    }

    #[test]
    fn leading_byte_order_mark_is_stripped() {
        let events = parser().parse_content(
            "\u{feff}Jan 15 08:23:45 host sshd[1]: Accepted password for john from 10.0.0.50 port 22 ssh2\r\n",
        );
        assert_eq!(events.len(), 1);
        assert!(events[0].timestamp.is_some());
        assert!(events[0].raw_log.starts_with("Jan 15"));
    }

    #[test]
    fn oversized_line_is_skipped() {
        let parser = parser().with_max_line_bytes(64);
        let long = format!(
            "Failed password for root from 1.2.3.4 port 22 ssh2 {}",
            "x".repeat(100)
        );
        let content = format!("{long}\nAccepted password for john from 10.0.0.50\n");
        let events = parser.parse_content(&content);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::AcceptedLogin);
    }

    #[test]
    fn from_config_applies_year_and_limit() {
        let config = AnalyzerConfig {
            max_line_bytes: 128,
            year: Some(2020),
            ..AnalyzerConfig::default()
        };
        let parser = AuthLogParser::from_config(&config).unwrap();
        assert_eq!(parser.max_line_bytes(), 128);
        let events = parser.parse_content("Mar  1 00:00:00 h sshd[1]: Accepted password for a from 1.1.1.1");
        assert_eq!(
            events[0].timestamp,
            Some(Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn from_config_rejects_zero_limit() {
        let config = AnalyzerConfig {
            max_line_bytes: 0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            AuthLogParser::from_config(&config),
            Err(LogAnalyzerError::Config { .. })
        ));
    }

    #[test]
    fn implements_log_parser_trait() {
        let parser: Box<dyn LogParser> = Box::new(parser());
        assert_eq!(parser.format_name(), "auth_log");
        assert_eq!(parser.parse(SAMPLE).len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_arbitrary_text_does_not_panic(text in "\\PC{0,2000}") {
                let _ = parser().parse_content(&text);
            }

            #[test]
            fn parse_arbitrary_bytes_does_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..2000)) {
                let text = String::from_utf8_lossy(&bytes);
                let _ = parser().parse_content(&text);
            }

            #[test]
            fn events_never_exceed_line_count(lines in prop::collection::vec("[ -~]{0,120}", 0..50)) {
                let content = lines.join("\n");
                let events = parser().parse_content(&content);
                prop_assert!(events.len() <= lines.len());
            }

            #[test]
            fn generated_failed_line_always_parses(
                user in "[a-z][a-z0-9_]{0,15}",
                a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, d in 0u8..=255,
            ) {
                let line = format!("Jan 15 08:23:45 host sshd[1]: Failed password for {user} from {a}.{b}.{c}.{d} port 22 ssh2");
                let events = parser().parse_content(&line);
                prop_assert_eq!(events.len(), 1);
                prop_assert_eq!(events[0].user.as_deref(), Some(user.as_str()));
                let expected_ip = format!("{a}.{b}.{c}.{d}");
                prop_assert_eq!(events[0].ip.as_deref(), Some(expected_ip.as_str()));
            }
        }
    }
}
