//! Generational Handles
//!
//! A [`Handle`] is an opaque `{index, generation}` reference to an object
//! stored in a [`SlotPool`](super::pool::SlotPool). Handles are plain `Copy`
//! values; holding one never keeps the object alive, and a handle whose
//! object was freed simply stops resolving.
//!
//! # Wire format
//!
//! Handles cross the host boundary as a single `u32`:
//!
//! | bits   | content          |
//! |--------|------------------|
//! | 0..16  | `index + 1`      |
//! | 16..32 | `generation`     |
//!
//! The raw value `0` is [`Handle::INVALID`]. Since generations start at 1
//! and never wrap to 0, a live handle never encodes to 0.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Largest index a handle can carry (`index + 1` must fit in 16 bits).
pub const MAX_HANDLE_INDEX: u16 = 0xFFFE;

/// Typed generational reference to a pooled `T`.
///
/// The type parameter only tags the resource kind, so a `Handle<Sprite>`
/// cannot be passed where a `Handle<Text>` is expected.
pub struct Handle<T> {
    index: u16,
    generation: u16,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// The null handle. Never resolves.
    pub const INVALID: Self = Self {
        index: 0,
        generation: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub(crate) const fn new(index: u16, generation: u16) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index inside the owning pool.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        self.generation
    }

    /// `true` only for [`Handle::INVALID`] (or anything decoded from raw 0).
    ///
    /// A non-null handle may still be stale; only the pool can tell.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.generation == 0
    }

    /// Encodes the handle into its 32-bit wire form.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        if self.generation == 0 {
            return 0;
        }
        ((self.generation as u32) << 16) | (self.index as u32 + 1)
    }

    /// Decodes a 32-bit wire value.
    ///
    /// Values with a zero index field or a zero generation decode to
    /// [`Handle::INVALID`].
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        let index_plus_one = (raw & 0xFFFF) as u16;
        let generation = (raw >> 16) as u16;
        if index_plus_one == 0 || generation == 0 {
            return Self::INVALID;
        }
        Self::new(index_plus_one - 1, generation)
    }
}

// Manual impls: derives would require `T: Clone` etc.

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_raw().hash(state);
    }
}

impl<T> Default for Handle<T> {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Handle(null)");
        }
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl<T> From<Handle<T>> for u32 {
    #[inline]
    fn from(handle: Handle<T>) -> Self {
        handle.to_raw()
    }
}

impl<T> From<u32> for Handle<T> {
    #[inline]
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}
