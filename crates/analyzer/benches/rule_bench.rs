//! 규칙 엔진 벤치마크
//!
//! 이벤트 수에 따른 전체 분석 비용과 규칙별 비용을 측정합니다.

use authwatch_analyzer::rule::{BruteForceAttack, FailedLoginBurst, SuspiciousIpPattern};
use authwatch_analyzer::scenario::{ScenarioGenerator, ScenarioKind};
use authwatch_analyzer::{AuthLogParser, RuleEngine};
use authwatch_core::pipeline::Detector;
use authwatch_core::types::Event;
use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn mixed_events(rounds: usize) -> Vec<Event> {
    let parser = AuthLogParser::with_year(2024).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let mut events = Vec::new();
    for seed in 0..rounds as u64 {
        let text = ScenarioGenerator::seeded(seed)
            .with_start(start + chrono::TimeDelta::hours(seed as i64))
            .generate(ScenarioKind::Mixed, None, None)
            .to_text();
        events.extend(parser.parse_content(&text));
    }
    events
}

fn bench_analyze_scaling(c: &mut Criterion) {
    let engine = RuleEngine::with_defaults();
    let mut group = c.benchmark_group("analyze_scaling");

    for rounds in [1usize, 10, 100] {
        let events = mixed_events(rounds);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(events.len()),
            &events,
            |b, events| b.iter(|| engine.analyze(black_box(events))),
        );
    }

    group.finish();
}

fn bench_windowed_rules(c: &mut Criterion) {
    let events = mixed_events(50);
    let mut group = c.benchmark_group("windowed_rules");

    let rules: [(&str, Box<dyn Detector>); 3] = [
        ("failed_login_burst", Box::new(FailedLoginBurst)),
        ("brute_force", Box::new(BruteForceAttack)),
        ("suspicious_ip_pattern", Box::new(SuspiciousIpPattern)),
    ];
    for (name, rule) in &rules {
        group.bench_function(*name, |b| b.iter(|| rule.detect(black_box(&events))));
    }

    group.finish();
}

criterion_group!(benches, bench_analyze_scaling, bench_windowed_rules);
criterion_main!(benches);
