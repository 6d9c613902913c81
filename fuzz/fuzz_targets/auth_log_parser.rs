#![no_main]

use authwatch_analyzer::AuthLogParser;
use authwatch_core::pipeline::LogParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(parser) = AuthLogParser::with_year(2024) else {
        return;
    };
    let content = String::from_utf8_lossy(data);
    let events = parser.parse(&content);

    // 이벤트는 비어 있지 않은 줄 하나당 최대 하나
    assert!(events.len() <= content.split('\n').count());
    for event in &events {
        assert!(!event.raw_log.is_empty());
        assert_eq!(event.raw_log, event.raw_log.trim());
        assert_eq!(event.status, event.event_type.status());
    }
});
