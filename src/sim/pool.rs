//! Fixed-capacity entity pool
//!
//! Slots are allocated once at construction and reused for the rest of the
//! session. A slot is live while its entity is staged. Destroying an entity
//! only clears the flag; the memory stays in the pool.
//!
//! Traversals visit slots in index order and re-check the staged flag at each
//! visit, so releasing a slot mid-traversal (including the one being visited)
//! never corrupts the rest of the walk.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Types that can live in a [`Pool`]
pub trait Pooled: Default {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;

    /// Clear transient per-occupancy state before the slot is reused
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Identifies one occupancy of one slot. Stale once the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    pub slot: usize,
    pub generation: u32,
}

/// Fixed-size recycler of `T`
#[derive(Debug, Clone)]
pub struct Pool<T: Pooled> {
    slots: Vec<T>,
    generations: Vec<u32>,
    /// Staged state as of the last `sweep`, for detecting releases
    live: Vec<bool>,
    /// Occupancies freed and reused before a sweep could see them
    retired: Vec<Handle>,
    /// Slot to try first on the next acquire
    next: usize,
    /// Acquire attempts refused because every slot was staged
    dropped: u64,
}

impl<T: Pooled> Pool<T> {
    /// Pre-allocate `capacity` inert entities
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
            generations: vec![0; capacity],
            live: vec![false; capacity],
            retired: Vec::with_capacity(capacity),
            next: 0,
            dropped: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Take the first free slot at or after the cursor, reset it and mark it
    /// staged. Returns `None` when every slot is live; the caller drops the
    /// request.
    pub fn acquire(&mut self) -> Option<(Handle, &mut T)> {
        let capacity = self.slots.len();
        let slot = (0..capacity)
            .map(|i| (self.next + i) % capacity)
            .find(|&i| !self.slots[i].entity().staged);

        let Some(slot) = slot else {
            self.dropped += 1;
            return None;
        };

        self.next = (slot + 1) % capacity;
        if self.live[slot] {
            self.retired.push(Handle {
                slot,
                generation: self.generations[slot],
            });
        }
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.live[slot] = true;

        let item = &mut self.slots[slot];
        item.reset();
        item.entity_mut().staged = true;

        let handle = Handle {
            slot,
            generation: self.generations[slot],
        };
        Some((handle, item))
    }

    /// Destroy the entity in `slot`. Safe on an already free slot.
    pub fn release(&mut self, slot: usize) {
        if let Some(item) = self.slots.get_mut(slot) {
            item.entity_mut().destroy();
        }
    }

    /// Release every slot
    pub fn reset(&mut self) {
        for item in &mut self.slots {
            item.entity_mut().destroy();
        }
        self.next = 0;
    }

    /// Whether `slot` currently holds a staged entity
    #[inline]
    pub fn is_active(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|item| item.entity().staged)
    }

    /// Number of staged entities
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|item| item.entity().staged).count()
    }

    /// Acquire attempts refused since construction
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Entity behind `handle`, if that occupancy is still live
    pub fn get(&self, handle: Handle) -> Option<&T> {
        (self.is_active(handle.slot) && self.generations[handle.slot] == handle.generation)
            .then(|| &self.slots[handle.slot])
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if self.is_active(handle.slot) && self.generations[handle.slot] == handle.generation {
            Some(&mut self.slots[handle.slot])
        } else {
            None
        }
    }

    /// Slot access regardless of staged state
    #[inline]
    pub fn slot(&self, slot: usize) -> &T {
        &self.slots[slot]
    }

    #[inline]
    pub fn slot_mut(&mut self, slot: usize) -> &mut T {
        &mut self.slots[slot]
    }

    /// Call `f` on every staged entity in slot order.
    ///
    /// A slot released by an earlier call in the same traversal is skipped.
    pub fn for_each_active(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for slot in 0..self.slots.len() {
            if self.slots[slot].entity().staged {
                f(slot, &mut self.slots[slot]);
            }
        }
    }

    /// Staged entities in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|item| item.entity().staged)
    }

    /// Report every slot that went from staged to free since the last sweep
    pub fn sweep(&mut self, mut on_retired: impl FnMut(Handle)) {
        for handle in self.retired.drain(..) {
            on_retired(handle);
        }
        for slot in 0..self.slots.len() {
            let staged = self.slots[slot].entity().staged;
            if self.live[slot] && !staged {
                on_retired(Handle {
                    slot,
                    generation: self.generations[slot],
                });
            }
            self.live[slot] = staged;
        }
    }
}
