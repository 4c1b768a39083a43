#![no_main]

use std::collections::VecDeque;

use dnscache::DnsCache;
use libfuzzer_sys::fuzz_target;

/// Decode a name from one byte. The small alphabet forces repeated names,
/// so updates, hits and evictions all occur.
fn name_for(byte: u8) -> String {
    match byte % 4 {
        0 => format!("host{}.example.com", byte % 13),
        1 => format!("büro-{}.example", byte % 7),
        2 => format!("東京-{}.jp", byte % 5),
        _ => format!("{}", byte % 17),
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16) + 1;
    let Ok(cache) = DnsCache::new(capacity) else {
        return;
    };
    // Names in recency order, front = most recent.
    let mut order: VecDeque<String> = VecDeque::new();

    for (i, chunk) in ops.chunks(2).enumerate() {
        let &[op, arg] = chunk else {
            break;
        };
        let name = name_for(arg);

        if op % 3 == 0 {
            let found = cache.resolve(&name);
            let pos = order.iter().position(|n| *n == name);
            assert_eq!(found.is_some(), pos.is_some(), "resolve({name}) disagrees with model");
            if let Some(pos) = pos {
                if let Some(hit) = order.remove(pos) {
                    order.push_front(hit);
                }
            }
        } else {
            let address = format!("10.{}.{}.{}", op, arg, i % 256);
            cache.update(name.as_str(), address.as_str());
            assert_eq!(cache.resolve(&name).as_deref(), Some(address.as_str()));

            if let Some(pos) = order.iter().position(|n| *n == name) {
                order.remove(pos);
            } else if order.len() == capacity {
                let victim = order.pop_back();
                if let Some(victim) = victim {
                    assert!(!cache.contains(&victim), "{victim} should have been evicted");
                }
            }
            order.push_front(name);
        }

        assert!(cache.size() <= capacity);
        assert_eq!(cache.size(), order.len());
    }

    let names: Vec<String> = cache.snapshot().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, Vec::from(order));
});
