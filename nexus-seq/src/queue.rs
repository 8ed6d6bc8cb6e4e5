//! Singly-linked byte-string queue over slab storage.
//!
//! Nodes live in a [`Storage`] arena and link to their successor by key.
//! The queue tracks head, tail, length, and the bytes held by element
//! copies. Insertion works at either end, removal at the front.
//!
//! # Chain Invariants
//!
//! Before and after every public operation:
//!
//! - `len == 0` iff head is `NONE` iff tail is `NONE`
//! - `len == 1` iff head and tail name the same node
//! - following `next` from head reaches tail in exactly `len - 1` steps,
//!   and tail's `next` is `NONE`
//!
//! [`Queue::validate`] checks all of them.
//!
//! # Example
//!
//! ```
//! use nexus_seq::Queue;
//!
//! let mut queue: Queue = Queue::new();
//! queue.try_push_back(b"banana").unwrap();
//! queue.try_push_back(b"apple").unwrap();
//! queue.try_push_back(b"cherry").unwrap();
//!
//! queue.sort();
//! queue.reverse();
//!
//! let mut buf = [0u8; 4];
//! assert_eq!(queue.pop_front_into(&mut buf), Ok(3));
//! assert_eq!(&buf, b"che\0");
//! assert_eq!(queue.len(), 2);
//! ```

use core::fmt;

use tracing::{debug, trace};

use crate::chain;
use crate::config::QueueConfig;
use crate::error::{Error, InvariantError, Result};
use crate::{Arena, Element, Full, Key, Storage};

/// A node in the chain: one element and the key of its successor.
///
/// Users see [`Element`]s through the queue's accessors; the node layout is
/// an implementation detail.
#[derive(Debug)]
pub struct Node<K: Key = u32> {
    pub(crate) element: Element,
    pub(crate) next: K,
}

impl<K: Key> Node<K> {
    /// Creates an unlinked node.
    #[inline]
    pub(crate) fn new(element: Element) -> Self {
        Self {
            element,
            next: K::NONE,
        }
    }

    /// Returns the element held by this node.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

/// A singly-linked queue of owned byte strings.
///
/// # Type Parameters
///
/// - `K`: Key type for links (default `u32`)
/// - `S`: Node storage (default [`Arena`])
pub struct Queue<K: Key = u32, S = Arena<Node<K>, K>>
where
    S: Storage<Node<K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    /// Bytes held by element copies, terminators included.
    bytes: usize,
    byte_budget: Option<usize>,
}

impl<K: Key> Queue<K, Arena<Node<K>, K>> {
    /// Creates an empty, unbounded queue.
    ///
    /// Does not allocate.
    pub fn new() -> Self {
        Self::with_storage(Arena::new())
    }

    /// Creates an empty queue from `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroCapacity`] / [`Error::CapacityExceedsKey`] for a node
    ///   capacity the key type cannot address
    /// - [`Error::Preallocate`] if reserving the requested slots fails
    pub fn with_config(config: &QueueConfig) -> Result<Self> {
        let limit = config.node_limit::<K>()?;
        let mut storage = Arena::with_limit(limit);

        let slots = config.get_preallocate();
        if slots > 0 {
            storage.try_reserve(slots).map_err(|_| {
                debug!(slots, "node slot preallocation failed");
                Error::Preallocate { slots }
            })?;
        }

        let mut queue = Self::with_storage(storage);
        queue.byte_budget = config.get_byte_budget();
        Ok(queue)
    }
}

impl<K: Key> Default for Queue<K, Arena<Node<K>, K>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, S> Queue<K, S>
where
    S: Storage<Node<K>, Key = K>,
{
    /// Creates an empty queue over caller-provided storage.
    ///
    /// The queue takes the storage over; every node it holds afterwards
    /// belongs to this queue.
    ///
    /// # Panics
    ///
    /// Panics if `storage` is not empty.
    pub fn with_storage(storage: S) -> Self {
        assert!(storage.is_empty(), "storage must start empty");

        Self {
            storage,
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            bytes: 0,
            byte_budget: None,
        }
    }

    /// Returns the number of elements. O(1).
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bytes held by element copies, terminators included.
    #[inline]
    pub const fn bytes_in_use(&self) -> usize {
        self.bytes
    }

    /// Returns the configured byte budget, if any.
    #[inline]
    pub const fn byte_budget(&self) -> Option<usize> {
        self.byte_budget
    }

    // ========================================================================
    // Insert operations (allocate + link)
    // ========================================================================

    /// Copies `value` into a new node at the front.
    ///
    /// # Errors
    ///
    /// [`Error::ByteBudget`], [`Error::ValueAlloc`], or
    /// [`Error::StorageFull`]. On error nothing is linked and any partially
    /// built node has been released.
    pub fn try_push_front(&mut self, value: &[u8]) -> Result<()> {
        let key = self.alloc_node(value)?;

        if self.head.is_none() {
            self.tail = key;
        } else {
            let head = self.head;
            self.node_mut(key).next = head;
        }

        self.head = key;
        self.len += 1;
        Ok(())
    }

    /// Copies `value` into a new node at the back.
    ///
    /// # Errors
    ///
    /// Same as [`try_push_front`](Self::try_push_front).
    pub fn try_push_back(&mut self, value: &[u8]) -> Result<()> {
        let key = self.alloc_node(value)?;

        if self.tail.is_none() {
            self.head = key;
        } else {
            let tail = self.tail;
            self.node_mut(tail).next = key;
        }

        self.tail = key;
        self.len += 1;
        Ok(())
    }

    /// Builds a node for `value` and places it in storage, unlinked.
    fn alloc_node(&mut self, value: &[u8]) -> Result<K> {
        let requested = Element::stored_len(value.len());

        if let Some(budget) = self.byte_budget {
            let fits = self
                .bytes
                .checked_add(requested)
                .is_some_and(|total| total <= budget);
            if !fits {
                debug!(requested, budget, in_use = self.bytes, "byte budget exceeded");
                return Err(Error::ByteBudget {
                    requested,
                    budget,
                    in_use: self.bytes,
                });
            }
        }

        let element = Element::try_copy_from(value).inspect_err(|err| {
            debug!(%err, "element copy failed");
        })?;

        match self.storage.try_insert(Node::new(element)) {
            Ok(key) => {
                self.bytes += requested;
                Ok(key)
            }
            // The rejected node, element copy included, is dropped here.
            Err(Full(_node)) => {
                debug!(len = self.len, "node storage full");
                Err(Error::StorageFull)
            }
        }
    }

    // ========================================================================
    // Remove operations (unlink + release)
    // ========================================================================

    /// Unlinks the front node and returns its element.
    ///
    /// Returns `None` if the queue is empty.
    pub fn pop_front(&mut self) -> Option<Element> {
        if self.head.is_none() {
            return None;
        }

        let node = self
            .storage
            .remove(self.head)
            .expect("head names a vacant slot");

        self.head = node.next;
        if self.head.is_none() {
            self.tail = K::NONE;
        }
        self.len -= 1;
        self.bytes -= node.element.stored_size();

        Some(node.element)
    }

    /// Unlinks the front node, copying its element into `out`.
    ///
    /// The copy follows [`Element::copy_truncated`]: at most
    /// `out.len() - 1` content bytes followed by a NUL terminator. An empty
    /// `out` still removes the element. The node and its element copy are
    /// released before returning.
    ///
    /// Returns the number of content bytes written.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if there is nothing to remove; the queue is unchanged.
    pub fn pop_front_into(&mut self, out: &mut [u8]) -> Result<usize> {
        let element = self.pop_front().ok_or(Error::Empty)?;
        Ok(element.copy_truncated(out))
    }

    /// Unlinks and releases every node, front to back.
    pub fn clear(&mut self) {
        if self.len > 0 {
            trace!(len = self.len, bytes = self.bytes, "clear");
        }

        let mut key = self.head;
        self.head = K::NONE;
        self.tail = K::NONE;

        while key.is_some() {
            let node = self
                .storage
                .remove(key)
                .expect("chain link names a vacant slot");
            key = node.next;
            self.len -= 1;
            self.bytes -= node.element.stored_size();
        }
    }

    // ========================================================================
    // Structural transforms (relink only, no alloc/release)
    // ========================================================================

    /// Reverses the queue in place.
    ///
    /// One pass over the chain; no node is allocated, released, or copied.
    pub fn reverse(&mut self) {
        if self.len <= 1 {
            return;
        }
        trace!(len = self.len, "reverse");

        let old_head = self.head;
        self.head = chain::reverse(&mut self.storage, old_head);
        self.tail = old_head;
    }

    /// Sorts the queue ascending by element content, in place.
    ///
    /// Merge sort by relinking: `O(n log n)` comparisons, `O(log n)`
    /// recursion depth, no allocation. The sort is stable: equal elements
    /// keep their relative order.
    pub fn sort(&mut self) {
        if self.len <= 1 {
            return;
        }
        trace!(len = self.len, "sort");

        self.head = chain::merge_sort(&mut self.storage, self.head);
        // The old tail is still in the chain; the new tail is at or after it.
        self.tail = chain::last(&self.storage, self.tail);
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the front element.
    #[inline]
    pub fn front(&self) -> Option<&Element> {
        if self.head.is_none() {
            return None;
        }
        self.storage.get(self.head).map(Node::element)
    }

    /// Returns the back element.
    #[inline]
    pub fn back(&self) -> Option<&Element> {
        if self.tail.is_none() {
            return None;
        }
        self.storage.get(self.tail).map(Node::element)
    }

    /// Returns an iterator over elements, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, S> {
        Iter {
            storage: &self.storage,
            current: self.head,
            remaining: self.len,
        }
    }

    /// Checks every chain invariant plus storage and byte accounting.
    ///
    /// Walks the whole chain; intended for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantError`] found.
    pub fn validate(&self) -> core::result::Result<(), InvariantError> {
        let len = self.len;

        if (len == 0) != self.head.is_none() || self.head.is_none() != self.tail.is_none() {
            return Err(InvariantError::Endpoints { len });
        }
        if len == 1 && self.head != self.tail {
            return Err(InvariantError::SingleMismatch);
        }

        let mut actual = 0;
        let mut curr = self.head;
        for position in 0..len {
            let node = self
                .storage
                .get(curr)
                .ok_or(InvariantError::Dangling { position })?;
            actual += node.element.stored_size();

            if position + 1 == len {
                if curr != self.tail {
                    return Err(InvariantError::TailMismatch { len });
                }
                if node.next.is_some() {
                    return Err(InvariantError::TailNotTerminal);
                }
            } else {
                curr = node.next;
                if curr.is_none() {
                    return Err(InvariantError::TailMismatch { len });
                }
            }
        }

        let stored = self.storage.len();
        if stored != len {
            return Err(InvariantError::Unreachable { stored, len });
        }
        if actual != self.bytes {
            return Err(InvariantError::Bytes {
                accounted: self.bytes,
                actual,
            });
        }

        Ok(())
    }

    #[inline]
    fn node_mut(&mut self, key: K) -> &mut Node<K> {
        self.storage
            .get_mut(key)
            .expect("chain link names a vacant slot")
    }
}

impl<K: Key, S> Drop for Queue<K, S>
where
    S: Storage<Node<K>, Key = K>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Key, S> fmt::Debug for Queue<K, S>
where
    S: Storage<Node<K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K: Key, S> IntoIterator for &'a Queue<K, S>
where
    S: Storage<Node<K>, Key = K>,
{
    type Item = &'a Element;
    type IntoIter = Iter<'a, K, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// Iterator over queue elements, front to back.
pub struct Iter<'a, K: Key, S> {
    storage: &'a S,
    current: K,
    remaining: usize,
}

impl<'a, K: Key + 'a, S> Iterator for Iter<'a, K, S>
where
    S: Storage<Node<K>, Key = K>,
{
    type Item = &'a Element;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }

        let node = self.storage.get(self.current)?;
        self.current = node.next;
        self.remaining -= 1;
        Some(&node.element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: Key + 'a, S> ExactSizeIterator for Iter<'a, K, S> where S: Storage<Node<K>, Key = K> {}
