//! Fixed-capacity generational slot pool.
//!
//! [`SlotPool`] is the registry behind every handle kind in the engine.
//! Each slot carries a generation counter; unregistering an object bumps
//! the counter so every outstanding handle to it stops resolving, even
//! after the slot is reused. Free indices live on a LIFO stack, and a fresh
//! pool hands out index 0 first.

use std::fmt;

use super::handle::{Handle, MAX_HANDLE_INDEX};

/// Largest capacity a pool can have: every index must encode as `index + 1`
/// in 16 bits.
pub const MAX_POOL_CAPACITY: usize = MAX_HANDLE_INDEX as usize + 1;

#[inline]
fn next_generation(generation: u16) -> u16 {
    match generation.wrapping_add(1) {
        0 => 1,
        g => g,
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u16,
}

/// Returned by [`SlotPool::register`] when no slot is free.
///
/// Carries the rejected value back so the caller can release whatever
/// it owns.
pub struct PoolExhausted<T> {
    value: T,
    capacity: usize,
}

impl<T> PoolExhausted<T> {
    /// Capacity of the pool that rejected the value.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes the rejected value back.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for PoolExhausted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolExhausted")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Fixed-capacity storage addressed by generational [`Handle`]s.
#[derive(Debug)]
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u16>,
    len: usize,
}

impl<T> SlotPool<T> {
    /// Creates a pool with `capacity` slots, all free.
    ///
    /// Capacities above [`MAX_POOL_CAPACITY`] are clamped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity > MAX_POOL_CAPACITY {
            log::warn!(
                "Pool capacity {capacity} exceeds the handle index range, clamping to {MAX_POOL_CAPACITY}"
            );
            MAX_POOL_CAPACITY
        } else {
            capacity
        };

        let slots = (0..capacity)
            .map(|_| Slot {
                value: None,
                generation: 1,
            })
            .collect();

        Self {
            slots,
            free: Self::fresh_free_stack(capacity),
            len: 0,
        }
    }

    // Highest index at the bottom so index 0 is popped first.
    fn fresh_free_stack(capacity: usize) -> Vec<u16> {
        (0..capacity).rev().map(|i| i as u16).collect()
    }

    /// Stores `value` in a free slot and returns its handle.
    pub fn register(&mut self, value: T) -> Result<Handle<T>, PoolExhausted<T>> {
        let Some(index) = self.free.pop() else {
            return Err(PoolExhausted {
                value,
                capacity: self.slots.len(),
            });
        };

        let slot = &mut self.slots[usize::from(index)];
        debug_assert!(slot.value.is_none(), "free list pointed at an occupied slot");
        slot.value = Some(value);
        self.len += 1;

        Ok(Handle::new(index, slot.generation))
    }

    fn live_slot(&self, handle: Handle<T>) -> Option<&Slot<T>> {
        if handle.is_null() {
            return None;
        }
        self.slots
            .get(usize::from(handle.index()))
            .filter(|slot| slot.generation == handle.generation() && slot.value.is_some())
    }

    /// Returns the object behind `handle`, or `None` when the handle is
    /// null, out of range, or stale.
    #[inline]
    #[must_use]
    pub fn resolve(&self, handle: Handle<T>) -> Option<&T> {
        self.live_slot(handle).and_then(|slot| slot.value.as_ref())
    }

    /// Mutable variant of [`resolve`](Self::resolve).
    #[inline]
    pub fn resolve_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.is_null() {
            return None;
        }
        self.slots
            .get_mut(usize::from(handle.index()))
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// `true` if `handle` currently resolves.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.live_slot(handle).is_some()
    }

    /// Removes the object behind `handle` and invalidates every copy of the
    /// handle. Stale handles are ignored.
    pub fn unregister(&mut self, handle: Handle<T>) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }

        let slot = &mut self.slots[usize::from(handle.index())];
        let value = slot.value.take();
        slot.generation = next_generation(slot.generation);
        self.free.push(handle.index());
        self.len -= 1;
        value
    }

    /// Unregisters every live object and returns them in index order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        for slot in &mut self.slots {
            if let Some(value) = slot.value.take() {
                slot.generation = next_generation(slot.generation);
                values.push(value);
            }
        }
        self.free = Self::fresh_free_stack(self.slots.len());
        self.len = 0;
        values
    }

    /// Number of live objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Iterates live objects in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Handle::new(index as u16, slot.generation), value))
        })
    }

    /// Mutable variant of [`iter`](Self::iter).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (Handle::new(index as u16, generation), value))
        })
    }

    /// Snapshot of all live handles, for loops that mutate the pool.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}
