//! Call id module.
//!
//! Method calls of a batch are correlated with their responses through
//! a call id. Ids are drawn from a process-wide counter so concurrent
//! batches never share one.

use std::sync::atomic::{AtomicU64, Ordering};

static LAST_CALL_ID: AtomicU64 = AtomicU64::new(0);

/// Generates the next call id, formatted as `req<N>`.
pub fn next_call_id() -> String {
    let id = LAST_CALL_ID.fetch_add(1, Ordering::Relaxed) + 1;
    format!("req{}", id)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, thread};

    use super::*;

    fn number(id: &str) -> u64 {
        id.trim_start_matches("req").parse().unwrap()
    }

    #[test]
    fn ids_are_increasing() {
        let a = next_call_id();
        let b = next_call_id();

        assert!(a.starts_with("req"));
        assert!(number(&a) < number(&b));
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..100).map(|_| next_call_id()).collect::<Vec<_>>()))
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(800, ids.len());
    }
}
