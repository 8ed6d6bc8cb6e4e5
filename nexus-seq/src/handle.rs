//! Nullable-handle entry points.
//!
//! Mirrors the queue API for callers that may hold no queue at all. An
//! absent queue (`None`) is a normal condition, never a panic: inserts and
//! removals report `false`, [`size`] reports 0, and the transforms do
//! nothing. Failures are reported through the return value only; details
//! are emitted as `tracing` debug events.
//!
//! # Example
//!
//! ```
//! use nexus_seq::QueueConfig;
//! use nexus_seq::handle;
//!
//! let mut q = handle::create(&QueueConfig::default());
//! assert!(handle::insert_back(q.as_mut(), b"banana"));
//! assert!(handle::insert_back(q.as_mut(), b"apple"));
//! assert_eq!(handle::size(q.as_ref()), 2);
//!
//! handle::sort(q.as_mut());
//!
//! let mut buf = [0u8; 16];
//! assert!(handle::remove_front(q.as_mut(), Some(&mut buf)));
//! assert_eq!(&buf[..6], b"apple\0");
//!
//! handle::destroy(q);
//! assert!(!handle::insert_back(None, b"lost"));
//! ```

use tracing::debug;

use crate::{Queue, QueueConfig};

/// Creates an empty queue, or `None` if `config` cannot be satisfied.
pub fn create(config: &QueueConfig) -> Option<Queue> {
    Queue::with_config(config)
        .inspect_err(|err| debug!(%err, "queue creation failed"))
        .ok()
}

/// Releases every node of `queue`, then the queue itself.
///
/// Does nothing for `None`.
pub fn destroy(queue: Option<Queue>) {
    if let Some(mut queue) = queue {
        queue.clear();
    }
}

/// Copies `value` to the front. Returns `false` if `queue` is absent or the
/// copy could not be stored.
pub fn insert_front(queue: Option<&mut Queue>, value: &[u8]) -> bool {
    queue.is_some_and(|q| q.try_push_front(value).is_ok())
}

/// Copies `value` to the back. Returns `false` if `queue` is absent or the
/// copy could not be stored.
pub fn insert_back(queue: Option<&mut Queue>, value: &[u8]) -> bool {
    queue.is_some_and(|q| q.try_push_back(value).is_ok())
}

/// Removes the front element.
///
/// When `out` is given, the element is copied into it first, truncated to
/// `out.len() - 1` content bytes and NUL-terminated. Returns `false` if
/// `queue` is absent or empty; nothing changes in that case.
pub fn remove_front(queue: Option<&mut Queue>, out: Option<&mut [u8]>) -> bool {
    let Some(queue) = queue else {
        return false;
    };
    let Some(element) = queue.pop_front() else {
        return false;
    };

    if let Some(out) = out {
        element.copy_truncated(out);
    }
    true
}

/// Returns the element count, or 0 if `queue` is absent.
pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::len)
}

/// Reverses `queue` in place. Does nothing if `queue` is absent.
pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// Sorts `queue` ascending in place. Does nothing if `queue` is absent.
pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}
