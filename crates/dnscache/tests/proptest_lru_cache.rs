//! Property tests for `LruCache` against a plain `Vec` model.
//!
//! The model keeps entries oldest-first and evicts by removing index 0, so
//! every step can be compared outcome-for-outcome with the arena cache.

use proptest::prelude::*;

use dnscache::lru_cache::LruCache;

#[derive(Debug, Clone, Copy)]
enum Step {
    Write(u8, u32),
    Read(u8),
    Look(u8),
    Has(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Displaced(Option<(u8, u32)>),
    Found(Option<u32>),
    Present(bool),
}

fn step() -> impl Strategy<Value = Step> {
    let key = 0u8..24;
    prop_oneof![
        4 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Step::Write(k, v)),
        3 => key.clone().prop_map(Step::Read),
        1 => key.clone().prop_map(Step::Look),
        1 => key.prop_map(Step::Has),
    ]
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step(), 1..150)
}

/// Entries oldest-first.
struct Model {
    capacity: usize,
    entries: Vec<(u8, u32)>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    fn take(&mut self, key: u8) -> Option<(u8, u32)> {
        let pos = self.entries.iter().position(|&(k, _)| k == key)?;
        Some(self.entries.remove(pos))
    }

    fn apply(&mut self, step: Step) -> Outcome {
        match step {
            Step::Write(k, v) => {
                let displaced = if self.take(k).is_none() && self.entries.len() == self.capacity {
                    Some(self.entries.remove(0))
                } else {
                    None
                };
                self.entries.push((k, v));
                Outcome::Displaced(displaced)
            }
            Step::Read(k) => Outcome::Found(self.take(k).map(|entry| {
                self.entries.push(entry);
                entry.1
            })),
            Step::Look(k) => Outcome::Found(
                self.entries
                    .iter()
                    .find(|&&(key, _)| key == k)
                    .map(|&(_, v)| v),
            ),
            Step::Has(k) => Outcome::Present(self.entries.iter().any(|&(key, _)| key == k)),
        }
    }

    fn newest_first(&self) -> Vec<u8> {
        self.entries.iter().rev().map(|&(k, _)| k).collect()
    }
}

fn apply(cache: &mut LruCache<u8, u32>, step: Step) -> Outcome {
    match step {
        Step::Write(k, v) => Outcome::Displaced(cache.put(k, v)),
        Step::Read(k) => Outcome::Found(cache.get(&k).copied()),
        Step::Look(k) => Outcome::Found(cache.peek(&k).copied()),
        Step::Has(k) => Outcome::Present(cache.contains_key(&k)),
    }
}

fn newest_first(cache: &LruCache<u8, u32>) -> Vec<u8> {
    cache.iter_mru().map(|(k, _)| *k).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(400))]

    /// Every step returns what the model returns and leaves a well-formed list.
    #[test]
    fn follows_the_model_step_by_step(capacity in 1usize..=16, steps in steps()) {
        let mut cache = LruCache::new(capacity);
        let mut model = Model::new(capacity);

        for (i, &step) in steps.iter().enumerate() {
            prop_assert_eq!(apply(&mut cache, step), model.apply(step), "step {}: {:?}", i, step);
            prop_assert_eq!(cache.len(), model.entries.len());
            prop_assert_eq!(cache.check_invariants(), Ok(()), "step {}: {:?}", i, step);
        }
        prop_assert_eq!(newest_first(&cache), model.newest_first());
    }

    /// The displaced entry is exactly what `peek_lru` showed beforehand, and
    /// never the key touched by the previous step.
    #[test]
    fn displaces_the_reported_lru_entry(capacity in 2usize..=16, steps in steps()) {
        let mut cache = LruCache::new(capacity);
        let mut last_touched = None;

        for step in steps {
            let oldest = cache.peek_lru().map(|(k, v)| (*k, *v));
            match step {
                Step::Write(k, v) => {
                    if let Some(displaced) = cache.put(k, v) {
                        prop_assert_eq!(Some(displaced), oldest);
                        prop_assert_ne!(Some(displaced.0), last_touched);
                    }
                    last_touched = Some(k);
                }
                Step::Read(k) => {
                    if cache.get(&k).is_some() {
                        last_touched = Some(k);
                    }
                }
                Step::Look(_) | Step::Has(_) => {
                    apply(&mut cache, step);
                    prop_assert_eq!(cache.peek_lru().map(|(k, v)| (*k, *v)), oldest);
                }
            }
        }
    }

    /// Size is the number of distinct keys written, capped at capacity, and a
    /// full cache stays full.
    #[test]
    fn size_tracks_distinct_writes(capacity in 1usize..=16, steps in steps()) {
        let mut cache = LruCache::new(capacity);
        let mut written = std::collections::HashSet::new();

        for step in steps {
            let was_full = cache.is_full();
            if let Step::Write(k, _) = step {
                written.insert(k);
            }
            apply(&mut cache, step);
            prop_assert_eq!(cache.len(), written.len().min(capacity));
            prop_assert!(!was_full || cache.is_full());
        }
    }

    /// Counters agree with the outcomes the model predicts.
    #[test]
    fn stats_count_model_outcomes(capacity in 1usize..=16, steps in steps()) {
        let mut cache = LruCache::new(capacity);
        let mut model = Model::new(capacity);
        let (mut hits, mut misses, mut inserts, mut updates, mut evictions) = (0, 0, 0, 0, 0);

        for step in steps {
            let existed = matches!(step, Step::Write(k, _) if model.entries.iter().any(|e| e.0 == k));
            match (step, model.apply(step)) {
                (Step::Write(..), Outcome::Displaced(displaced)) => {
                    if existed { updates += 1 } else { inserts += 1 }
                    if displaced.is_some() { evictions += 1 }
                }
                (Step::Read(_), Outcome::Found(Some(_))) => hits += 1,
                (Step::Read(_), Outcome::Found(None)) => misses += 1,
                _ => {}
            }
            apply(&mut cache, step);
        }

        let stats = cache.stats();
        prop_assert_eq!(
            (stats.hits, stats.misses, stats.insertions, stats.updates, stats.evictions),
            (hits, misses, inserts, updates, evictions)
        );
    }

    /// Non-promoting reads leave the recency order exactly as it was.
    #[test]
    fn look_and_has_keep_order(capacity in 1usize..=16, steps in steps(), lookups in prop::collection::vec(0u8..24, 1..20)) {
        let mut cache = LruCache::new(capacity);
        for step in steps {
            apply(&mut cache, step);
        }
        let before = newest_first(&cache);
        for k in lookups {
            apply(&mut cache, Step::Look(k));
            apply(&mut cache, Step::Has(k));
        }
        prop_assert_eq!(newest_first(&cache), before);
    }

    /// Oldest-first iteration is the reverse of newest-first, both exact-size.
    #[test]
    fn iteration_directions_agree(capacity in 1usize..=16, steps in steps()) {
        let mut cache = LruCache::new(capacity);
        for step in steps {
            apply(&mut cache, step);
        }
        prop_assert_eq!(cache.iter_mru().len(), cache.len());
        prop_assert_eq!(cache.iter_lru().len(), cache.len());

        let mut oldest_first: Vec<u8> = cache.iter_lru().map(|(k, _)| *k).collect();
        oldest_first.reverse();
        prop_assert_eq!(oldest_first, newest_first(&cache));
    }

    /// Writing a run of fresh keys keeps exactly the last `capacity` of them.
    #[test]
    fn fresh_key_run_keeps_the_tail(capacity in 1usize..=16, run in 1u8..60) {
        let mut cache: LruCache<u8, u32> = LruCache::new(capacity);
        for k in 0..run {
            cache.put(k, u32::from(k));
        }
        let kept = usize::from(run).min(capacity);
        let expected: Vec<u8> = (0..run).rev().take(kept).collect();
        prop_assert_eq!(newest_first(&cache), expected);
        prop_assert_eq!(cache.stats().evictions, (usize::from(run) - kept) as u64);
    }
}
