//! 합성 공격 시나리오 생성기
//!
//! 파서가 인식하는 형식 그대로의 인증 로그를 생성합니다. 데모 입력과 테스트 픽스처용이며,
//! 파서와 규칙 엔진은 이 모듈에 의존하지 않습니다.
//!
//! 같은 시드와 시작 시각이면 항상 같은 출력을 생성합니다.
//!
//! # 사용 예시
//! ```
//! use authwatch_analyzer::scenario::{ScenarioGenerator, ScenarioKind};
//!
//! let mut generator = ScenarioGenerator::seeded(42);
//! let scenario = generator.generate(ScenarioKind::BruteForce, None, None);
//! assert_eq!(scenario.lines.len(), 25);
//! ```

pub mod pools;

use std::fmt;
use std::str::FromStr;

use authwatch_core::config::GeneratorConfig;
use authwatch_core::types::IncidentType;
use chrono::{DateTime, TimeDelta, Timelike, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::error::LogAnalyzerError;
use pools::{ATTACKER_IPS, INTERNAL_IPS, INVALID_USERS, NOISE_TEMPLATES, VALID_USERS};

/// 시나리오 시간 폭 상한 (분, 하루)
pub const MAX_MINUTES: i64 = 1440;

/// 시나리오당 공격 이벤트 수 상한
pub const MAX_COUNT: usize = 10_000;

/// 생성 가능한 시나리오 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// 단일 IP의 invalid user 로그인 반복 실패
    BruteForce,
    /// sudoers에 없는 사용자의 sudo 시도
    SudoViolation,
    /// 하나의 사용자명을 여러 IP가 번갈아 시도
    CredentialStuffing,
    /// 한 사용자가 짧은 시간에 여러 외부 IP에서 로그인 성공
    SuspiciousLogin,
    /// 정상 로그인과 잡음
    Normal,
    /// 정상 트래픽에 네 가지 이상 징후를 섞은 시나리오
    Mixed,
}

impl ScenarioKind {
    /// 전체 종류 (CLI 도움말 순서)
    pub const ALL: [ScenarioKind; 6] = [
        Self::BruteForce,
        Self::SudoViolation,
        Self::CredentialStuffing,
        Self::SuspiciousLogin,
        Self::Normal,
        Self::Mixed,
    ];

    /// 명령행 표기
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::SudoViolation => "sudo-violation",
            Self::CredentialStuffing => "credential-stuffing",
            Self::SuspiciousLogin => "suspicious-login",
            Self::Normal => "normal",
            Self::Mixed => "mixed",
        }
    }

    /// 기본 이벤트 수
    pub fn default_count(self) -> usize {
        match self {
            Self::BruteForce => 25,
            Self::SudoViolation => 4,
            Self::CredentialStuffing => 0, // 윈도우가 닫힐 때까지
            Self::SuspiciousLogin => 3,
            Self::Normal => 20,
            Self::Mixed => 40,
        }
    }

    /// 기본 시간 범위 (분)
    pub fn default_minutes(self) -> i64 {
        match self {
            Self::BruteForce => 2,
            Self::SudoViolation | Self::CredentialStuffing => 5,
            Self::SuspiciousLogin => 10,
            Self::Normal | Self::Mixed => 30,
        }
    }

    /// 이 시나리오를 분석하면 반드시 나타나는 인시던트 유형
    pub fn expected_incidents(self) -> Vec<IncidentType> {
        match self {
            Self::BruteForce => vec![
                IncidentType::BruteForceAttack,
                IncidentType::InvalidUserLoginAttempt,
            ],
            Self::SudoViolation => vec![IncidentType::UnauthorizedSudoAccess],
            Self::CredentialStuffing => vec![IncidentType::FailedLoginBurst],
            Self::SuspiciousLogin => vec![IncidentType::SuspiciousIpPattern],
            Self::Normal => Vec::new(),
            Self::Mixed => vec![
                IncidentType::FailedLoginBurst,
                IncidentType::BruteForceAttack,
                IncidentType::UnauthorizedSudoAccess,
                IncidentType::InvalidUserLoginAttempt,
                IncidentType::SuspiciousIpPattern,
            ],
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = LogAnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| {
                LogAnalyzerError::Scenario(format!(
                    "unknown scenario kind '{s}' (expected one of: {})",
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

/// 생성된 시나리오 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioMetadata {
    pub kind: ScenarioKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attacker_ips: Vec<String>,
    pub usernames: Vec<String>,
    pub line_count: usize,
    pub expected_incidents: Vec<IncidentType>,
}

/// 생성된 로그 줄과 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub lines: Vec<String>,
    pub metadata: ScenarioMetadata,
}

impl Scenario {
    /// 줄바꿈으로 연결한 로그 텍스트 (마지막 줄바꿈 포함)
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// 시간과 함께 보관하는 생성 중간 결과
#[derive(Default)]
struct Draft {
    lines: Vec<(DateTime<Utc>, String)>,
    attacker_ips: Vec<String>,
    usernames: Vec<String>,
}

impl Draft {
    fn note_ip(&mut self, ip: &str) {
        if !self.attacker_ips.iter().any(|i| i == ip) {
            self.attacker_ips.push(ip.to_owned());
        }
    }

    fn note_user(&mut self, user: &str) {
        if !self.usernames.iter().any(|u| u == user) {
            self.usernames.push(user.to_owned());
        }
    }

    fn merge(&mut self, other: Draft) {
        self.lines.extend(other.lines);
        for ip in &other.attacker_ips {
            self.note_ip(ip);
        }
        for user in &other.usernames {
            self.note_user(user);
        }
    }
}

/// 시나리오 생성기
pub struct ScenarioGenerator {
    rng: StdRng,
    hostname: String,
    start: DateTime<Utc>,
}

impl ScenarioGenerator {
    /// 엔트로피 시드로 생성기를 만듭니다. 시작 시각은 현재 시각(초 단위)입니다.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// 고정 시드로 생성기를 만듭니다.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// 생성기 설정으로 생성기를 만듭니다.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        };
        generator.with_hostname(config.hostname.clone())
    }

    fn with_rng(rng: StdRng) -> Self {
        let now = Utc::now();
        Self {
            rng,
            hostname: "server".to_owned(),
            start: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    /// 로그 줄의 호스트명을 설정합니다.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// 첫 이벤트 시각을 설정합니다.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// 첫 이벤트 시각
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// 시나리오를 생성합니다.
    ///
    /// `count`와 `minutes`가 `None`이면 종류별 기본값을 사용합니다.
    /// 값이 너무 작아 예상 인시던트를 만들 수 없으면 최솟값으로 올리고,
    /// [`MAX_COUNT`]와 [`MAX_MINUTES`]를 넘으면 상한으로 내립니다.
    pub fn generate(
        &mut self,
        kind: ScenarioKind,
        count: Option<usize>,
        minutes: Option<i64>,
    ) -> Scenario {
        let count = count.unwrap_or_else(|| kind.default_count()).min(MAX_COUNT);
        let minutes = minutes
            .unwrap_or_else(|| kind.default_minutes())
            .clamp(1, MAX_MINUTES);
        let start = self.start;

        let mut draft = match kind {
            ScenarioKind::BruteForce => self.brute_force(start, count),
            ScenarioKind::SudoViolation => self.sudo_violation(start, count, minutes),
            ScenarioKind::CredentialStuffing => self.credential_stuffing(start, count, minutes),
            ScenarioKind::SuspiciousLogin => self.suspicious_login(start, count, minutes),
            ScenarioKind::Normal => self.normal(start, count, minutes),
            ScenarioKind::Mixed => self.mixed(start, count, minutes),
        };

        // 안정 정렬: 같은 시각이면 생성 순서 유지
        draft.lines.sort_by_key(|(ts, _)| *ts);

        let end = draft.lines.last().map_or(start, |(ts, _)| *ts);
        let lines: Vec<String> = draft.lines.into_iter().map(|(_, line)| line).collect();

        debug!(kind = %kind, lines = lines.len(), "scenario generated");

        Scenario {
            metadata: ScenarioMetadata {
                kind,
                start,
                end,
                attacker_ips: draft.attacker_ips,
                usernames: draft.usernames,
                line_count: lines.len(),
                expected_incidents: kind.expected_incidents(),
            },
            lines,
        }
    }

    // --- 줄 포맷 ---

    fn pid(&mut self) -> u32 {
        self.rng.gen_range(1000..=65000)
    }

    fn port(&mut self) -> u16 {
        self.rng.gen_range(1024..=65535)
    }

    fn prefix(&self, ts: DateTime<Utc>) -> String {
        format!("{} {}", ts.format("%b %d %H:%M:%S"), self.hostname)
    }

    fn failed_line(&mut self, ts: DateTime<Utc>, user: &str, ip: &str, invalid: bool) -> String {
        let marker = if invalid { "invalid user " } else { "" };
        format!(
            "{} sshd[{}]: Failed password for {marker}{user} from {ip} port {} ssh2",
            self.prefix(ts),
            self.pid(),
            self.port()
        )
    }

    fn accepted_line(&mut self, ts: DateTime<Utc>, user: &str, ip: &str) -> String {
        format!(
            "{} sshd[{}]: Accepted password for {user} from {ip} port {} ssh2",
            self.prefix(ts),
            self.pid(),
            self.port()
        )
    }

    fn sudo_line(&mut self, ts: DateTime<Utc>, user: &str) -> String {
        let tty = self.rng.gen_range(0..=5);
        let command = ["/bin/bash", "/usr/bin/cat /etc/shadow", "/usr/bin/apt update", "/bin/ls /root"]
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("/bin/bash");
        format!(
            "{} sudo: {user} : user NOT in sudoers ; TTY=pts/{tty} ; PWD=/home/{user} ; USER=root ; COMMAND={command}",
            self.prefix(ts)
        )
    }

    fn noise_line(&mut self, ts: DateTime<Utc>, user: &str) -> String {
        let template = NOISE_TEMPLATES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(NOISE_TEMPLATES[0]);
        let pid = self.pid().to_string();
        let body = template
            .replace("{host}", &self.hostname)
            .replace("{pid}", &pid)
            .replace("{user}", user);
        format!("{} {}", ts.format("%b %d %H:%M:%S"), body)
    }

    fn pick<'p>(&mut self, pool: &'p [&'p str]) -> &'p str {
        pool.choose(&mut self.rng).copied().unwrap_or(pool[0])
    }

    // --- 시나리오 ---

    fn brute_force(&mut self, start: DateTime<Utc>, count: usize) -> Draft {
        let mut draft = Draft::default();
        let ip = self.pick(ATTACKER_IPS);
        let user = self.pick(INVALID_USERS);
        draft.note_ip(ip);
        draft.note_user(user);

        // 5회 이상, 1~4초 간격 -> 처음 5회는 항상 2분 안에 들어간다
        let mut ts = start;
        for _ in 0..count.max(5) {
            let line = self.failed_line(ts, user, ip, true);
            draft.lines.push((ts, line));
            ts += TimeDelta::seconds(self.rng.gen_range(1..=4));
        }
        draft
    }

    fn sudo_violation(&mut self, start: DateTime<Utc>, count: usize, minutes: i64) -> Draft {
        let mut draft = Draft::default();
        let span = minutes * 60;
        for _ in 0..count.max(1) {
            let user = self.pick(VALID_USERS);
            draft.note_user(user);
            let ts = start + TimeDelta::seconds(self.rng.gen_range(0..span));
            let line = self.sudo_line(ts, user);
            draft.lines.push((ts, line));
        }
        draft
    }

    fn credential_stuffing(&mut self, start: DateTime<Utc>, count: usize, minutes: i64) -> Draft {
        let mut draft = Draft::default();
        let user = self.pick(VALID_USERS);
        draft.note_user(user);
        let ips: Vec<&str> = ATTACKER_IPS
            .choose_multiple(&mut self.rng, 4)
            .copied()
            .collect();
        for ip in &ips {
            draft.note_ip(ip);
        }

        let end = start + TimeDelta::minutes(minutes);
        // count가 0이면 윈도우가 닫힐 때까지, 아니면 최소 두 바퀴
        let limit = if count == 0 { usize::MAX } else { count.max(ips.len() * 2) };
        let mut ts = start;
        let mut attempt = 0usize;
        while attempt < limit && (ts <= end || attempt < ips.len() * 2) {
            let ip = ips[attempt % ips.len()];
            let line = self.failed_line(ts, user, ip, false);
            draft.lines.push((ts, line));
            ts += TimeDelta::seconds(self.rng.gen_range(3..=8));
            attempt += 1;
        }
        draft
    }

    fn suspicious_login(&mut self, start: DateTime<Utc>, count: usize, minutes: i64) -> Draft {
        let mut draft = Draft::default();
        let user = self.pick(VALID_USERS);
        draft.note_user(user);

        let count = count.max(3);
        let distinct = count.min(ATTACKER_IPS.len());
        let ips: Vec<&str> = ATTACKER_IPS
            .choose_multiple(&mut self.rng, distinct)
            .copied()
            .collect();
        for ip in &ips {
            draft.note_ip(ip);
        }

        // 처음 세 번의 로그인은 10분 윈도우 안에 들어가도록 간격을 제한한다
        let step_max = (minutes.min(10) * 60 / 3).max(1);
        let mut ts = start;
        for i in 0..count {
            let ip = ips[i % ips.len()];
            let line = self.accepted_line(ts, user, ip);
            draft.lines.push((ts, line));
            ts += TimeDelta::seconds(self.rng.gen_range(1..=step_max));
        }
        draft
    }

    fn normal(&mut self, start: DateTime<Utc>, count: usize, minutes: i64) -> Draft {
        let mut draft = Draft::default();
        let span = minutes * 60;
        let count = count.max(1);

        for i in 0..count {
            let ts = start + TimeDelta::seconds(self.rng.gen_range(0..span));
            // 세 줄 중 하나는 잡음, 첫 줄은 항상 로그인
            if i > 0 && i % 3 == 0 {
                let user = self.pick(VALID_USERS);
                let line = self.noise_line(ts, user);
                draft.lines.push((ts, line));
            } else {
                // 사용자마다 고정 사설 IP -> 여러 IP 로그인 규칙에 걸리지 않는다
                let idx = self.rng.gen_range(0..VALID_USERS.len());
                let line = self.accepted_line(ts, VALID_USERS[idx], INTERNAL_IPS[idx]);
                draft.lines.push((ts, line));
            }
        }
        draft
    }

    fn mixed(&mut self, start: DateTime<Utc>, count: usize, minutes: i64) -> Draft {
        let mut draft = self.normal(start, count, minutes);
        let half = (minutes * 60 / 2).max(1);

        let offset = |g: &mut Self| start + TimeDelta::seconds(g.rng.gen_range(0..half));

        let at = offset(self);
        draft.merge(self.brute_force(at, ScenarioKind::BruteForce.default_count()));
        let at = offset(self);
        draft.merge(self.sudo_violation(at, ScenarioKind::SudoViolation.default_count(), 5));
        let at = offset(self);
        draft.merge(self.credential_stuffing(at, 0, 3));
        let at = offset(self);
        draft.merge(self.suspicious_login(at, 3, 10));
        draft
    }
}

impl Default for ScenarioGenerator {
    fn default() -> Self {
        Self::new()
    }
}
