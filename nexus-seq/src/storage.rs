//! Storage trait for slab-like node arenas with stable keys.
//!
//! Storage provides insert/remove/get operations where keys remain valid
//! until explicitly removed. The queue links nodes by key instead of by
//! pointer, so a removed node can never be reached through a stale link:
//! lookups on a vacant slot return `None`.

use std::collections::TryReserveError;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`Arena<T>`] - growable or bounded, free-list reuse (in this crate)
/// - `slab::Slab<T>` - growable (feature `slab`)
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot could be obtained, either
    /// because a capacity bound was hit or because growing the backing
    /// allocation failed.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when storage cannot take another value.
///
/// Carries the rejected value back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// Arena - Vec of slots, intrusive free list
// =============================================================================

#[derive(Debug)]
enum Slot<T, K> {
    Occupied(T),
    Vacant { next_free: K },
}

/// Node arena with free-list slot reuse.
///
/// Slots live in a single `Vec`. Vacant slots form a LIFO free list threaded
/// through the slots themselves, so a freed slot is the next one handed out.
/// Growth goes through `try_reserve`, so allocation failure surfaces as
/// [`Full`] instead of aborting.
///
/// # Example
///
/// ```
/// use nexus_seq::{Arena, Storage};
///
/// let mut arena: Arena<u64> = Arena::with_limit(2);
/// let a = arena.try_insert(1).unwrap();
/// let _b = arena.try_insert(2).unwrap();
/// assert!(arena.try_insert(3).is_err());
///
/// assert_eq!(arena.remove(a), Some(1));
/// assert_eq!(arena.try_insert(4).unwrap(), a); // slot reused
/// ```
#[derive(Debug)]
pub struct Arena<T, K: Key = u32> {
    slots: Vec<Slot<T, K>>,
    /// Head of the free list, or `K::NONE`.
    free_head: K,
    /// Occupied slots.
    len: usize,
    /// Maximum occupied slots.
    limit: usize,
}

impl<T, K: Key> Default for Arena<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> Arena<T, K> {
    /// Creates an empty arena bounded only by the key type's range.
    ///
    /// Does not allocate.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: K::NONE,
            len: 0,
            limit: K::NONE.as_usize(),
        }
    }

    /// Creates an empty arena holding at most `limit` values.
    ///
    /// Does not allocate; slots are grown on demand up to `limit`.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0 or exceeds the key type's maximum.
    pub fn with_limit(limit: usize) -> Self {
        assert!(limit > 0, "limit must be > 0");
        assert!(
            limit <= K::NONE.as_usize(),
            "limit exceeds key type maximum"
        );

        Self {
            limit,
            ..Self::new()
        }
    }

    /// Reserves backing space for at least `additional` more slots.
    ///
    /// The reservation is clamped to the arena's limit.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let headroom = self.limit - self.slots.len();
        self.slots.try_reserve_exact(additional.min(headroom))
    }

    /// Returns the maximum number of occupied slots.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the limit has been reached.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == self.limit
    }

    /// Returns the number of slots ever created (occupied or vacant).
    #[inline]
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Drops every stored value and forgets all slots.
    ///
    /// Keeps the backing allocation for reuse.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = K::NONE;
        self.len = 0;
    }
}

impl<T, K: Key> Storage<T> for Arena<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.len == self.limit {
            return Err(Full(value));
        }

        if self.free_head.is_some() {
            let key = self.free_head;
            let slot = &mut self.slots[key.as_usize()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(value);
            self.len += 1;
            return Ok(key);
        }

        if self.slots.try_reserve(1).is_err() {
            return Err(Full(value));
        }

        let key = K::from_usize(self.slots.len());
        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.as_usize())?;
        if !matches!(slot, Slot::Occupied(_)) {
            return None;
        }

        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        let Slot::Occupied(value) = core::mem::replace(slot, vacant) else {
            unreachable!();
        };
        self.free_head = key;
        self.len -= 1;
        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}
