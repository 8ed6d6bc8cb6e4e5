//! Error types for nexus-seq.
//!
//! Every failure is local: the queue is left exactly as it was before the
//! failing call, with all chain invariants intact.

use thiserror::Error;

/// Result type for nexus-seq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by queue operations and construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No node slot could be obtained: the node capacity was reached or
    /// growing the arena failed.
    #[error("node storage is full")]
    StorageFull,

    /// The element copy could not be allocated.
    #[error("failed to allocate {len} bytes for element copy")]
    ValueAlloc {
        /// Bytes requested, terminator included.
        len: usize,
    },

    /// Storing the element copy would exceed the configured byte budget.
    #[error("element copy of {requested} bytes exceeds byte budget ({in_use}/{budget} in use)")]
    ByteBudget {
        /// Bytes requested, terminator included.
        requested: usize,
        /// Configured budget.
        budget: usize,
        /// Bytes held by live elements.
        in_use: usize,
    },

    /// Removal from an empty queue.
    #[error("queue is empty")]
    Empty,

    /// Node capacity of zero was requested.
    #[error("node capacity cannot be zero")]
    ZeroCapacity,

    /// Node capacity does not fit the key type.
    #[error("node capacity ({capacity}) exceeds key range ({max})")]
    CapacityExceedsKey {
        /// Requested capacity.
        capacity: usize,
        /// Largest capacity the key type can address.
        max: usize,
    },

    /// Preallocating node slots failed.
    #[error("failed to preallocate {slots} node slots")]
    Preallocate {
        /// Slots requested.
        slots: usize,
    },
}

/// A broken chain invariant, reported by [`Queue::validate`](crate::Queue::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// Exactly one of head and tail is empty, or emptiness disagrees with
    /// the count.
    #[error("head/tail emptiness disagrees with len {len}")]
    Endpoints {
        /// Maintained count.
        len: usize,
    },

    /// A single-element chain whose head and tail differ.
    #[error("single-element chain with distinct head and tail")]
    SingleMismatch,

    /// A link names a slot that holds no node.
    #[error("link at position {position} names a vacant slot")]
    Dangling {
        /// Zero-based position of the node holding the bad link.
        position: usize,
    },

    /// Walking `len - 1` links from head did not land on tail.
    #[error("walk of {len} nodes from head does not end at tail")]
    TailMismatch {
        /// Maintained count.
        len: usize,
    },

    /// The tail has a successor.
    #[error("tail has a successor")]
    TailNotTerminal,

    /// Storage holds nodes the chain does not reach.
    #[error("storage holds {stored} nodes but chain has {len}")]
    Unreachable {
        /// Occupied storage slots.
        stored: usize,
        /// Maintained count.
        len: usize,
    },

    /// Byte accounting disagrees with the chain contents.
    #[error("byte accounting says {accounted} but chain holds {actual}")]
    Bytes {
        /// Maintained byte count.
        accounted: usize,
        /// Sum over the chain.
        actual: usize,
    },
}
