//! Generational slot table: allocate, resolve, invalidate

use super::raw::RawHandle;
use super::Handle;
use crate::core::types::Address;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::RwLock;
use tracing::trace;

/// One slot of the table.
///
/// `Empty` (never used) is represented by an index beyond the table's
/// current length; every slot inside it is either live or stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Live { generation: u32, pointer: Address },
    Stale { generation: u32 },
}

#[derive(Debug, Default)]
struct Table {
    slots: Vec<Slot>,
    // indices of stale slots, reused before the table grows
    free: Vec<u32>,
}

/// Per-object-category handle manager.
///
/// Owns the slot table for one category of host objects and nothing else:
/// pointers pass through it but are never dereferenced, and object lifetime
/// stays with the host process. A single coarse lock serializes `allocate`
/// and `invalidate` against each other and against concurrent `resolve`.
#[derive(Debug)]
pub struct HandleManager<T> {
    table: RwLock<Table>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleManager<T> {
    /// Creates an empty manager
    pub fn new() -> Self {
        HandleManager {
            table: RwLock::new(Table::default()),
            _marker: PhantomData,
        }
    }

    /// Issues a handle for a newly created host object.
    ///
    /// Reuses a stale slot when one exists (bumping its generation so old
    /// handles to the previous occupant can never resolve here), otherwise
    /// appends a fresh slot at generation 1.
    pub fn allocate(&self, pointer: NonNull<T>) -> Handle<T> {
        let address = Address::from(pointer);
        let mut table = self.table.write().expect("handle table poisoned");

        let raw = if let Some(index) = table.free.pop() {
            let slot = &mut table.slots[index as usize];
            let generation = match *slot {
                Slot::Stale { generation } => generation,
                Slot::Live { .. } => unreachable!("free list held a live slot"),
            };
            debug_assert!(generation < u32::MAX);
            let next = generation + 1;
            *slot = Slot::Live {
                generation: next,
                pointer: address,
            };
            RawHandle::new(index, next)
        } else {
            let index = table.slots.len() as u32;
            table.slots.push(Slot::Live {
                generation: 1,
                pointer: address,
            });
            RawHandle::new(index, 1)
        };

        trace!(handle = %raw, %address, "handle allocated");
        Handle::from_raw(raw)
    }

    /// Resolves a handle to the live pointer it was issued for.
    ///
    /// `None` is the expected outcome for any handle captured across an
    /// unknown amount of host activity: the slot may be stale, reused by a
    /// later occupant (generation mismatch), or out of range entirely.
    pub fn resolve(&self, handle: Handle<T>) -> Option<NonNull<T>> {
        let table = self.table.read().expect("handle table poisoned");
        match table.slots.get(handle.index() as usize) {
            Some(Slot::Live {
                generation,
                pointer,
            }) if *generation == handle.generation() => pointer.as_non_null(),
            _ => None,
        }
    }

    /// Marks a slot stale when its occupant is destroyed.
    ///
    /// Clears the pointer and leaves the generation unchanged; the next
    /// `allocate` on this slot bumps it. Returns whether a live occupant was
    /// actually cleared.
    pub fn invalidate(&self, index: u32) -> bool {
        let mut table = self.table.write().expect("handle table poisoned");
        let Some(slot) = table.slots.get_mut(index as usize) else {
            return false;
        };
        match *slot {
            Slot::Live { generation, .. } => {
                *slot = Slot::Stale { generation };
                table.free.push(index);
                trace!(index, generation, "handle slot invalidated");
                true
            }
            Slot::Stale { .. } => false,
        }
    }

    /// Number of live slots
    pub fn live_count(&self) -> usize {
        let table = self.table.read().expect("handle table poisoned");
        table
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Live { .. }))
            .count()
    }

    /// Total slots the table has ever grown to
    pub fn slot_count(&self) -> usize {
        let table = self.table.read().expect("handle table poisoned");
        table.slots.len()
    }
}

impl<T> Default for HandleManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
