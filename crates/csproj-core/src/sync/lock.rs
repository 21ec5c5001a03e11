//! Per-manifest mutual exclusion

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

/// One lock per manifest path, created on first use.
///
/// Load-mutate-save cycles on the same manifest run one at a time; cycles on
/// different manifests do not contend.
#[derive(Debug, Default)]
pub struct ManifestLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl ManifestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `manifest`.
    pub fn with_lock<T>(&self, manifest: &Path, f: impl FnOnce() -> T) -> T {
        // Clone the Arc out so the map shard is not held while waiting
        let lock = self
            .locks
            .entry(manifest.to_path_buf())
            .or_default()
            .clone();
        // The guarded value is (), so a panic elsewhere leaves nothing to repair
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Number of manifests seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn same_manifest_is_serialized() {
        let locks = Arc::new(ManifestLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    locks.with_lock(Path::new("/w/Game.csproj"), || {
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        thread::sleep(Duration::from_millis(10));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let locks = Arc::new(ManifestLocks::new());
        let cloned = Arc::clone(&locks);
        let _ = thread::spawn(move || {
            cloned.with_lock(Path::new("/w/Game.csproj"), || panic!("boom"));
        })
        .join();

        assert_eq!(locks.with_lock(Path::new("/w/Game.csproj"), || 7), 7);
    }
}
