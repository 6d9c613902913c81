//! 시나리오 생성용 샘플 풀
//!
//! 데모/테스트 로그용 예시 값이며 실제 위협 정보가 아닙니다.

/// 공격자 IP 예시
pub const ATTACKER_IPS: &[&str] = &[
    "45.142.212.61",
    "45.155.204.17",
    "45.67.230.88",
    "91.214.124.73",
    "185.220.101.32",
    "185.156.73.54",
    "185.100.87.202",
    "188.166.12.143",
    "103.99.3.101",
    "109.248.206.97",
    "139.59.121.15",
    "194.165.16.12",
];

/// 존재하지 않는 사용자명 (브루트포스 대상)
pub const INVALID_USERS: &[&str] = &["admin", "root", "test", "administrator", "guest", "oracle"];

/// 존재하는 사용자명
pub const VALID_USERS: &[&str] = &["john", "alice", "bob", "sarah", "maria", "devops"];

/// 정상 트래픽용 사설 IP. `VALID_USERS`와 인덱스가 대응됩니다.
pub const INTERNAL_IPS: &[&str] = &[
    "10.0.0.50",
    "10.0.0.51",
    "10.0.1.20",
    "192.168.1.100",
    "192.168.1.101",
    "172.16.0.10",
];

/// 어떤 패턴에도 매칭되지 않는 잡음 줄 (`{host}` 자리에 호스트명)
pub const NOISE_TEMPLATES: &[&str] = &[
    "{host} CRON[{pid}]: (root) CMD (run-parts /etc/cron.hourly)",
    "{host} CRON[{pid}]: pam_unix(cron:session): session opened for user root by (uid=0)",
    "{host} systemd[1]: Started Session {pid} of user {user}.",
    "{host} systemd-logind[712]: New session {pid} of user {user}.",
    "{host} sshd[{pid}]: Connection closed by 10.0.0.1 port 51234 [preauth]",
];
