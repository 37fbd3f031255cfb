//! Accumulates fragmented NAMES replies (353) until the end marker (366).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct NamesAggregator {
    pending: Mutex<HashMap<String, Vec<String>>>,
}

impl NamesAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push<I, S>(&self, group: &str, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .entry(group.to_string())
            .or_default()
            .extend(tokens.into_iter().map(Into::into));
    }

    /// Remove and return everything collected for `group`.
    pub fn take(&self, group: &str) -> Vec<String> {
        self.lock().remove(group).unwrap_or_default()
    }

    pub fn is_pending(&self, group: &str) -> bool {
        self.lock().contains_key(group)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_accumulate_until_taken() {
        let names = NamesAggregator::new();
        names.push("#a", ["@A", "+B", "C"]);
        names.push("#a", ["D"]);
        assert!(names.is_pending("#a"));
        assert_eq!(names.take("#a"), vec!["@A", "+B", "C", "D"]);
        assert!(!names.is_pending("#a"));
        assert!(names.take("#a").is_empty());
    }

    #[test]
    fn test_groups_are_independent() {
        let names = NamesAggregator::new();
        names.push("#a", ["x"]);
        names.push("#b", ["y"]);
        assert_eq!(names.take("#b"), vec!["y"]);
        assert_eq!(names.take("#a"), vec!["x"]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let names = NamesAggregator::new();
        names.push("#a", ["x"]);
        names.clear();
        assert!(!names.is_pending("#a"));
    }

    #[test]
    fn test_concurrent_pushes() {
        use std::sync::Arc;
        let names = Arc::new(NamesAggregator::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let names = Arc::clone(&names);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        names.push(&format!("#g{}", i % 2), [format!("n{i}-{j}")]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(names.take("#g0").len() + names.take("#g1").len(), 200);
    }
}
