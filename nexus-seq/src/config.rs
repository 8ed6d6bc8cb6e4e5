//! Queue construction options.

use crate::Key;
use crate::error::Error;

/// Builder for [`Queue`](crate::Queue) construction.
///
/// All limits default to "unbounded": node count is limited only by the key
/// type, element bytes only by the allocator.
///
/// # Example
///
/// ```
/// use nexus_seq::{Queue, QueueConfig};
///
/// let config = QueueConfig::default()
///     .node_capacity(1024)
///     .preallocate(64)
///     .byte_budget(64 * 1024);
///
/// let queue: Queue = Queue::with_config(&config).unwrap();
/// assert!(queue.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueConfig {
    node_capacity: Option<usize>,
    preallocate: usize,
    byte_budget: Option<usize>,
}

impl QueueConfig {
    /// Caps the number of live nodes.
    ///
    /// Inserts beyond the cap fail with [`Error::StorageFull`].
    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = Some(capacity);
        self
    }

    /// Reserves node slots up front.
    ///
    /// Clamped to the node capacity when one is set.
    pub fn preallocate(mut self, slots: usize) -> Self {
        self.preallocate = slots;
        self
    }

    /// Caps the total bytes held by element copies, terminators included.
    ///
    /// Inserts beyond the cap fail with [`Error::ByteBudget`].
    pub fn byte_budget(mut self, bytes: usize) -> Self {
        self.byte_budget = Some(bytes);
        self
    }

    /// Configured node cap, if any.
    pub fn get_node_capacity(&self) -> Option<usize> {
        self.node_capacity
    }

    /// Configured preallocation.
    pub fn get_preallocate(&self) -> usize {
        self.preallocate
    }

    /// Configured byte cap, if any.
    pub fn get_byte_budget(&self) -> Option<usize> {
        self.byte_budget
    }

    /// Resolves the node limit for key type `K`.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroCapacity`] for a zero cap, [`Error::CapacityExceedsKey`]
    /// when the cap does not fit below `K::NONE`.
    pub(crate) fn node_limit<K: Key>(&self) -> Result<usize, Error> {
        let max = K::NONE.as_usize();
        match self.node_capacity {
            None => Ok(max),
            Some(0) => Err(Error::ZeroCapacity),
            Some(capacity) if capacity > max => Err(Error::CapacityExceedsKey { capacity, max }),
            Some(capacity) => Ok(capacity),
        }
    }
}
