//! syslog 타임스탬프 해석기
//!
//! 줄 시작의 `Mon DD HH:MM:SS` 접두사를 UTC 절대 시각으로 변환합니다.
//!
//! # 연도 추정
//! BSD syslog 타임스탬프에는 연도가 없습니다. 해석기는 생성 시점의 UTC 연도를
//! 사용하므로, 연말에 기록되어 연초에 분석되는 로그처럼 연도 경계를 넘는 입력은
//! 잘못된 연도로 해석됩니다. 과거 로그를 재분석할 때는
//! [`TimestampResolver::with_year`]로 연도를 고정하세요.
//!
//! # 범위 밖 필드
//! 접두사 형식만 맞으면 범위를 벗어난 일/시/분/초는 다음 단위로 넘어갑니다
//! (`Feb 30` -> `Mar 1`, `Jan 0` -> `Dec 31` 전년도, `25:00:00` -> 다음 날 01시).

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use regex::Regex;

use crate::error::LogAnalyzerError;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SYSLOG_PREFIX: &str =
    r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+([0-9]{1,2})\s+([0-9]{2}):([0-9]{2}):([0-9]{2})";

/// syslog 접두사 -> `DateTime<Utc>` 변환기
#[derive(Debug, Clone)]
pub struct TimestampResolver {
    prefix: Regex,
    year: i32,
}

impl TimestampResolver {
    /// 현재 UTC 연도를 가정하는 해석기를 생성합니다.
    pub fn new() -> Result<Self, LogAnalyzerError> {
        Self::with_year(Utc::now().year())
    }

    /// 연도를 고정한 해석기를 생성합니다.
    pub fn with_year(year: i32) -> Result<Self, LogAnalyzerError> {
        Ok(Self {
            prefix: Regex::new(SYSLOG_PREFIX)?,
            year,
        })
    }

    /// 해석에 사용하는 연도
    pub fn year(&self) -> i32 {
        self.year
    }

    /// 줄 시작의 타임스탬프를 해석합니다.
    ///
    /// 접두사가 없거나 달력상 존재하지 않는 시각(`Feb 30`, `25:00:00` 등)이면 `None`입니다.
    pub fn resolve(&self, line: &str) -> Option<DateTime<Utc>> {
        let caps = self.prefix.captures(line)?;

        let month = MONTHS.iter().position(|m| *m == &caps[1])? as u32 + 1;
        let day: i64 = caps[2].parse().ok()?;
        let hour: i64 = caps[3].parse().ok()?;
        let minute: i64 = caps[4].parse().ok()?;
        let second: i64 = caps[5].parse().ok()?;

        let month_start = NaiveDate::from_ymd_opt(self.year, month, 1)?.and_hms_opt(0, 0, 0)?;
        let offset = TimeDelta::days(day - 1)
            + TimeDelta::hours(hour)
            + TimeDelta::minutes(minute)
            + TimeDelta::seconds(second);
        Some(month_start.checked_add_signed(offset)?.and_utc())
    }
}
