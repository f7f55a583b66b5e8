//! Multi-threaded stress coverage for the handle table

use relokit::{Handle, HandleManager, RawHandle};
use std::collections::HashSet;
use std::ptr::NonNull;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 500;

fn leaked(value: u64) -> NonNull<u64> {
    NonNull::from(Box::leak(Box::new(value)))
}

#[test]
fn test_concurrent_churn_never_aliases_handles() {
    let manager: Arc<HandleManager<u64>> = Arc::new(HandleManager::new());

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let mut issued = Vec::with_capacity(OPS_PER_THREAD);
                for i in 0..OPS_PER_THREAD {
                    let ptr = leaked((t * OPS_PER_THREAD + i) as u64);
                    let handle = manager.allocate(ptr);

                    // we own this slot's live occupant; nobody else may
                    // invalidate it, so resolution must succeed exactly
                    assert_eq!(manager.resolve(handle), Some(ptr));

                    assert!(manager.invalidate(handle.index()));
                    assert_eq!(manager.resolve(handle), None);

                    issued.push(handle.raw());
                }
                issued
            })
        })
        .collect();

    let mut all: Vec<RawHandle> = Vec::new();
    for worker in workers {
        all.extend(worker.join().unwrap());
    }

    // no (index, generation) pair was ever issued twice
    let unique: HashSet<RawHandle> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());

    // every slot ended stale, and reuse kept the table far denser than the
    // total number of allocations
    assert_eq!(manager.live_count(), 0);
    assert!(manager.slot_count() <= THREADS * OPS_PER_THREAD);

    // every historical handle stays dead forever
    for raw in all {
        assert_eq!(manager.resolve(Handle::from_raw(raw)), None);
    }
}

#[test]
fn test_churn_on_other_slots_never_disturbs_live_handles() {
    let manager: Arc<HandleManager<u64>> = Arc::new(HandleManager::new());

    // stable occupants that must survive unrelated churn untouched;
    // addresses are recorded as integers so the list can cross threads
    let stable: Vec<_> = (0..16)
        .map(|i| {
            let ptr = leaked(i);
            (manager.allocate(ptr), ptr.as_ptr() as usize)
        })
        .collect();

    let churners: Vec<_> = (0..THREADS / 2)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let handle = manager.allocate(leaked((t + i) as u64));
                    manager.invalidate(handle.index());
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..THREADS / 2)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let stable = stable.clone();
            thread::spawn(move || {
                for _ in 0..OPS_PER_THREAD {
                    for (handle, addr) in &stable {
                        let resolved = manager.resolve(*handle).expect("live handle went stale");
                        assert_eq!(resolved.as_ptr() as usize, *addr);
                    }
                }
            })
        })
        .collect();

    for worker in churners.into_iter().chain(readers) {
        worker.join().unwrap();
    }

    for (handle, addr) in &stable {
        let resolved = manager.resolve(*handle).expect("live handle went stale");
        assert_eq!(resolved.as_ptr() as usize, *addr);
    }
    assert_eq!(manager.live_count(), stable.len());
}
