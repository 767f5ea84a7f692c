//! Per-note guard against overlapping syncs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Registry of note paths with a sync in flight.
///
/// Cloning shares the registry, so every engine built from the same value sees
/// the same set of busy notes.
#[derive(Clone, Debug, Default)]
pub struct SingleFlight {
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or return `None` if another sync already holds it.
    ///
    /// The claim is released when the returned guard is dropped.
    pub fn try_acquire(&self, key: &Path) -> Option<FlightGuard> {
        let mut in_flight = self.in_flight.lock().ok()?;
        if !in_flight.insert(key.to_path_buf()) {
            return None;
        }
        Some(FlightGuard {
            key: key.to_path_buf(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_in_flight(&self, key: &Path) -> bool {
        self.in_flight
            .lock()
            .map(|in_flight| in_flight.contains(key))
            .unwrap_or(false)
    }
}

/// Claim on a note path, released on drop.
#[derive(Debug)]
pub struct FlightGuard {
    key: PathBuf,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_rejected_until_release() {
        let flights = SingleFlight::new();
        let path = Path::new("/notes/2024-01-01.md");

        let guard = flights.try_acquire(path);
        assert!(guard.is_some());
        assert!(flights.is_in_flight(path));
        assert!(flights.clone().try_acquire(path).is_none());

        drop(guard);
        assert!(!flights.is_in_flight(path));
        assert!(flights.try_acquire(path).is_some());
    }

    #[test]
    fn test_different_notes_do_not_block_each_other() {
        let flights = SingleFlight::new();
        let _a = flights.try_acquire(Path::new("a.md")).unwrap();
        assert!(flights.try_acquire(Path::new("b.md")).is_some());
    }
}
