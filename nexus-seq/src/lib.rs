//! Singly-linked byte-string queue with in-place reverse and merge sort.
//!
//! Nodes live in slab-like storage and link to their successor by key, not
//! by pointer. Structure and storage stay separate, in the same way as
//! `nexus-collections`:
//!
//! ```text
//! Storage (Arena)  - owns nodes, hands out stable keys, reuses freed slots
//! Queue            - head/tail/len over keys, all link surgery
//! ```
//!
//! A freed node leaves a vacant slot, so a stale key can never reach freed
//! memory. Reversal and sorting rewrite keys only: no node is allocated,
//! freed, or moved.
//!
//! # Quick Start
//!
//! ```
//! use nexus_seq::Queue;
//!
//! let mut queue: Queue = Queue::new();
//!
//! queue.try_push_back(b"banana").unwrap();
//! queue.try_push_back(b"apple").unwrap();
//! queue.try_push_front(b"cherry").unwrap();
//! assert_eq!(queue.len(), 3);
//!
//! queue.sort();
//! let sorted: Vec<&[u8]> = queue.iter().map(|e| e.as_bytes()).collect();
//! assert_eq!(sorted, [&b"apple"[..], b"banana", b"cherry"]);
//!
//! queue.reverse();
//! assert_eq!(queue.pop_front().unwrap().as_bytes(), b"cherry");
//! ```
//!
//! # Bounded Queues
//!
//! [`QueueConfig`] caps the node count and the bytes held by element
//! copies. A rejected insert leaves the queue exactly as it was.
//!
//! ```
//! use nexus_seq::{Error, Queue, QueueConfig};
//!
//! let config = QueueConfig::default().node_capacity(2);
//! let mut queue: Queue = Queue::with_config(&config).unwrap();
//!
//! queue.try_push_back(b"a").unwrap();
//! queue.try_push_back(b"b").unwrap();
//! assert_eq!(queue.try_push_back(b"c"), Err(Error::StorageFull));
//! assert_eq!(queue.len(), 2);
//! ```
//!
//! # Nullable Handles
//!
//! The [`handle`] module exposes the same operations over `Option<&mut
//! Queue>`, reporting an absent queue as `false`/0 instead of panicking.
//!
//! # Logging
//!
//! Rejected inserts emit `tracing` debug events; reverse, sort, and teardown
//! emit trace events. No subscriber is installed by this crate.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

mod chain;
pub mod config;
pub mod element;
pub mod error;
pub mod handle;
pub mod key;
pub mod queue;
pub mod storage;

pub use config::QueueConfig;
pub use element::Element;
pub use error::{Error, InvariantError, Result};
pub use key::Key;
pub use queue::{Iter, Node, Queue};
pub use storage::{Arena, Full, Storage};

/// Queue backed by `slab::Slab` storage.
#[cfg(feature = "slab")]
pub type SlabQueue = Queue<usize, slab::Slab<Node<usize>>>;
