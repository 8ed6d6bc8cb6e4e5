//! Link surgery on detached node chains.
//!
//! These functions take a raw chain head (a key into storage) rather than a
//! [`Queue`](crate::Queue): during a sort the halves being split and merged
//! are sub-chains with no head/tail/len bookkeeping of their own. Only
//! `Queue::reverse` and `Queue::sort` restore the container's invariants
//! once the surgery is done.
//!
//! Nothing here allocates, frees, or copies a node. Every operation rewrites
//! `next` links only.

use crate::queue::Node;
use crate::{Key, Storage};

#[inline]
fn node<S, K>(storage: &S, key: K) -> &Node<K>
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    storage
        .get(key)
        .expect("chain link names a vacant slot")
}

#[inline]
fn node_mut<S, K>(storage: &mut S, key: K) -> &mut Node<K>
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    storage
        .get_mut(key)
        .expect("chain link names a vacant slot")
}

#[inline]
fn next<S, K>(storage: &S, key: K) -> K
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    node(storage, key).next
}

/// Reverses the chain starting at `head`, returning the new head.
///
/// The old head ends up last with an empty successor. An empty chain
/// (`K::NONE`) is returned unchanged.
pub(crate) fn reverse<S, K>(storage: &mut S, head: K) -> K
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    let mut prev = K::NONE;
    let mut curr = head;
    while curr.is_some() {
        let n = node_mut(storage, curr);
        let next = n.next;
        n.next = prev;
        prev = curr;
        curr = next;
    }
    prev
}

/// Returns the last node of the chain reachable from `from`.
///
/// `from` must be a live node.
pub(crate) fn last<S, K>(storage: &S, from: K) -> K
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    let mut curr = from;
    loop {
        let next = next(storage, curr);
        if next.is_none() {
            return curr;
        }
        curr = next;
    }
}

/// Cuts the chain at `head` in two, returning the head of the second half.
///
/// Slow/fast cursors: `fast` starts one node ahead of `slow` and moves two
/// nodes per step. When `fast` is at the last node or past it, the node
/// after `slow` starts the second half. The halves hold `ceil(n/2)` and
/// `floor(n/2)` nodes. A single-node chain yields `K::NONE`.
pub(crate) fn split<S, K>(storage: &mut S, head: K) -> K
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    let mut slow = head;
    let mut fast = next(storage, head);
    while fast.is_some() {
        let after = next(storage, fast);
        if after.is_none() {
            break;
        }
        slow = next(storage, slow);
        fast = next(storage, after);
    }

    let slow = node_mut(storage, slow);
    let second = slow.next;
    slow.next = K::NONE;
    second
}

/// Merges two sorted, non-empty chains, returning the merged head.
///
/// On equal elements the node from `left` goes first, so merging preserves
/// the relative order of equal elements. When one side runs out, the rest
/// of the other side is attached with a single link.
pub(crate) fn merge<S, K>(storage: &mut S, mut left: K, mut right: K) -> K
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    let take = |storage: &S, left: &mut K, right: &mut K| -> K {
        if node(storage, *right).element < node(storage, *left).element {
            let key = *right;
            *right = next(storage, key);
            key
        } else {
            let key = *left;
            *left = next(storage, key);
            key
        }
    };

    let head = take(&*storage, &mut left, &mut right);
    let mut tail = head;

    while left.is_some() && right.is_some() {
        let key = take(&*storage, &mut left, &mut right);
        node_mut(storage, tail).next = key;
        tail = key;
    }

    node_mut(storage, tail).next = if left.is_some() { left } else { right };
    head
}

/// Sorts the chain at `head` ascending, returning the new head.
///
/// Recursion depth is `O(log n)`: each level halves the chain.
pub(crate) fn merge_sort<S, K>(storage: &mut S, head: K) -> K
where
    K: Key,
    S: Storage<Node<K>, Key = K>,
{
    if next(storage, head).is_none() {
        return head;
    }

    let second = split(storage, head);
    let left = merge_sort(storage, head);
    let right = merge_sort(storage, second);
    merge(storage, left, right)
}
