//! 앵커 윈도우 그룹화
//!
//! 세 규칙(R1, R2, R5)이 공유하는 시간 윈도우 알고리즘입니다.
//!
//! 1. 이벤트를 그룹 키별로 나눕니다. 그룹은 키가 입력에서 처음 등장한 순서로 방문합니다.
//! 2. 각 그룹을 타임스탬프 오름차순으로 안정 정렬합니다. 타임스탬프가 없는 이벤트는 제외됩니다.
//! 3. 앵커 `i = 0, 1, ...`마다 `t[j] - t[i] <= width`인 동안 윈도우를 앞으로 확장합니다.
//!    기준은 직전 이벤트가 아니라 앵커입니다.
//! 4. 윈도우가 조건을 만족하면 그 윈도우 하나만 반환하고 해당 그룹의 탐색을 끝냅니다.

use std::collections::HashMap;

use authwatch_core::types::Event;
use chrono::TimeDelta;

/// 그룹 키별로 이벤트를 나눕니다.
///
/// `key`가 `None`을 반환하는 이벤트는 어떤 그룹에도 속하지 않습니다.
/// 반환 순서는 키가 처음 등장한 순서이며, 그룹 내부 순서는 입력 순서입니다.
pub fn group_by_key<'a, K>(
    events: impl IntoIterator<Item = &'a Event>,
    key: impl Fn(&'a Event) -> Option<K>,
) -> Vec<(K, Vec<&'a Event>)>
where
    K: Eq + std::hash::Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a Event>)> = Vec::new();

    for event in events {
        let Some(k) = key(event) else {
            continue;
        };
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(event),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![event]));
            }
        }
    }

    groups
}

/// 그룹에서 조건을 만족하는 첫 번째 앵커 윈도우를 찾습니다.
///
/// 입력 순서는 상관없으며 내부에서 타임스탬프로 안정 정렬합니다.
/// 반환되는 윈도우는 시간순이며, 만족하는 윈도우가 없으면 `None`입니다.
pub fn find_first_window<'a>(
    group: &[&'a Event],
    width: TimeDelta,
    predicate: impl Fn(&[&'a Event]) -> bool,
) -> Option<Vec<&'a Event>> {
    let mut timed: Vec<_> = group
        .iter()
        .filter_map(|e| e.timestamp.map(|ts| (ts, *e)))
        .collect();
    timed.sort_by_key(|(ts, _)| *ts);

    for (i, (anchor, _)) in timed.iter().enumerate() {
        let window: Vec<&'a Event> = timed[i..]
            .iter()
            .take_while(|(ts, _)| *ts - *anchor <= width)
            .map(|(_, e)| *e)
            .collect();

        if predicate(&window) {
            return Some(window);
        }
    }

    None
}
