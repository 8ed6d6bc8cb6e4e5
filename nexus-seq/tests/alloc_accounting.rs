//! Every byte a queue allocates is released by teardown or removal, and an
//! allocation failure leaves the queue and the heap as they were.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::collections::VecDeque;

use nexus_seq::{Error, Queue, QueueConfig, handle};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

struct Counting;

/// Which allocations on the current thread should fail.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Refuse {
    Nothing,
    /// Requests of exactly this many bytes.
    Size(usize),
    /// Requests of at least this many bytes.
    AtLeast(usize),
}

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
    static REFUSE: Cell<Refuse> = const { Cell::new(Refuse::Nothing) };
}

fn adjust(delta: isize) {
    let _ = LIVE.try_with(|live| live.set(live.get() + delta));
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

fn refused(size: usize) -> bool {
    match REFUSE.try_with(Cell::get) {
        Ok(Refuse::Size(n)) => size == n,
        Ok(Refuse::AtLeast(n)) => size >= n,
        _ => false,
    }
}

/// Runs `f` with allocations matching `refuse` failing on this thread.
fn refusing<R>(refuse: Refuse, f: impl FnOnce() -> R) -> R {
    REFUSE.with(|r| r.set(refuse));
    let out = f();
    REFUSE.with(|r| r.set(Refuse::Nothing));
    out
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if refused(layout.size()) {
            return core::ptr::null_mut();
        }
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            adjust(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        adjust(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if refused(new_size) {
            return core::ptr::null_mut();
        }
        let new = unsafe { System.realloc(ptr, layout, new_size) };
        if !new.is_null() {
            adjust(new_size as isize - layout.size() as isize);
        }
        new
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

/// Runs every logging path once so lazily registered `tracing` callsites do
/// not show up as live bytes inside a measurement.
fn warm_up() {
    let mut queue: Queue = Queue::with_config(&QueueConfig::default().node_capacity(2)).unwrap();
    queue.try_push_back(b"b").unwrap();
    queue.try_push_back(b"a").unwrap();
    let _ = queue.try_push_back(b"c");
    queue.sort();
    queue.reverse();
    queue.clear();

    let mut queue: Queue = Queue::new();
    let _ = refusing(Refuse::Size(4), || queue.try_push_back(b"abc"));
    let _ = refusing(Refuse::AtLeast(64), || queue.try_push_back(b"abc"));
    let _ = refusing(Refuse::AtLeast(1024), || {
        handle::create(&QueueConfig::default().preallocate(64))
    });
}

#[test]
fn destroy_releases_everything() {
    warm_up();
    let baseline = live();

    let mut q = handle::create(&QueueConfig::default().preallocate(16));
    for word in ["pear", "apple", "fig", "banana", "", "date"] {
        assert!(handle::insert_back(q.as_mut(), word.as_bytes()));
        assert!(handle::insert_front(q.as_mut(), word.as_bytes()));
    }
    handle::sort(q.as_mut());
    handle::reverse(q.as_mut());
    let mut buf = [0u8; 3];
    assert!(handle::remove_front(q.as_mut(), Some(&mut buf)));
    assert!(live() > baseline);

    handle::destroy(q);
    assert_eq!(live(), baseline);
}

#[test]
fn rejected_inserts_leak_nothing() {
    warm_up();
    let baseline = live();

    let mut queue: Queue = Queue::with_config(&QueueConfig::default().node_capacity(1)).unwrap();
    queue.try_push_back(b"kept").unwrap();
    let with_one = live();

    for _ in 0..64 {
        assert!(queue.try_push_back(b"rejected value").is_err());
    }
    assert_eq!(live(), with_one);

    drop(queue);
    assert_eq!(live(), baseline);
}

#[test]
fn removal_releases_element_copy() {
    let mut queue: Queue = Queue::with_config(&QueueConfig::default().preallocate(4)).unwrap();
    queue.try_push_back(b"first").unwrap();
    let one = live();

    queue.try_push_back(b"second element").unwrap();
    assert!(live() > one);

    let mut buf = [0u8; 4];
    assert_eq!(queue.pop_front_into(&mut buf), Ok(3));
    assert_eq!(queue.pop_front().unwrap().as_bytes(), b"second element");
    assert!(live() < one);
}

#[test]
fn value_copy_failure_leaves_queue_untouched() {
    warm_up();
    let mut queue: Queue = Queue::new();
    queue.try_push_back(b"a").unwrap();
    let before = live();

    let value = [b'x'; 776];
    let result = refusing(Refuse::Size(777), || queue.try_push_front(&value));

    assert_eq!(result, Err(Error::ValueAlloc { len: 777 }));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.bytes_in_use(), 2);
    assert_eq!(queue.front().unwrap().as_bytes(), b"a");
    queue.validate().unwrap();
    assert_eq!(live(), before);

    // Succeeds once memory is available again.
    queue.try_push_front(&value).unwrap();
    assert_eq!(queue.len(), 2);
}

#[test]
fn handle_reports_value_copy_failure() {
    warm_up();
    let mut q = handle::create(&QueueConfig::default());
    assert!(handle::insert_back(q.as_mut(), b"kept"));
    let before = live();

    let inserted = refusing(Refuse::Size(33), || {
        handle::insert_back(q.as_mut(), &[b'y'; 32])
    });

    assert!(!inserted);
    assert_eq!(handle::size(q.as_ref()), 1);
    assert_eq!(live(), before);
    q.as_ref().unwrap().validate().unwrap();
    handle::destroy(q);
}

#[test]
fn slot_growth_failure_releases_element_copy() {
    warm_up();
    let mut queue: Queue = Queue::new();
    let before = live();

    // The 7-byte element copy is allowed; the first arena growth reserves
    // several node slots and is refused.
    let result = refusing(Refuse::AtLeast(64), || queue.try_push_back(b"abcdef"));

    assert_eq!(result, Err(Error::StorageFull));
    assert!(queue.is_empty());
    assert_eq!(queue.bytes_in_use(), 0);
    queue.validate().unwrap();
    assert_eq!(live(), before);

    queue.try_push_back(b"abcdef").unwrap();
    assert_eq!(queue.len(), 1);
}

#[test]
fn preallocation_failure_fails_create() {
    warm_up();
    let before = live();
    let config = QueueConfig::default().preallocate(64);

    let created = refusing(Refuse::AtLeast(1024), || handle::create(&config));

    assert!(created.is_none());
    assert_eq!(live(), before);
}

#[test]
fn random_ops_with_injected_failures_return_to_baseline() {
    warm_up();
    let baseline = live();

    {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut queue: Queue = Queue::with_config(&QueueConfig::default().node_capacity(64)).unwrap();
        let mut model: VecDeque<Vec<u8>> = VecDeque::new();

        for _ in 0..5_000 {
            match rng.next_u32() % 6 {
                0 | 1 | 2 => {
                    let len = (rng.next_u32() % 12) as usize;
                    let value: Vec<u8> = (0..len).map(|_| b'a' + (rng.next_u32() % 3) as u8).collect();
                    let fail = rng.next_u32() % 4 == 0;
                    let front = rng.next_u32() % 2 == 0;

                    let refuse = if fail { Refuse::Size(len + 1) } else { Refuse::Nothing };
                    let result = refusing(refuse, || {
                        if front {
                            queue.try_push_front(&value)
                        } else {
                            queue.try_push_back(&value)
                        }
                    });

                    match result {
                        Ok(()) => {
                            assert!(!fail);
                            if front {
                                model.push_front(value);
                            } else {
                                model.push_back(value);
                            }
                        }
                        Err(Error::ValueAlloc { len: n }) => {
                            assert!(fail);
                            assert_eq!(n, len + 1);
                        }
                        Err(Error::StorageFull) => assert_eq!(model.len(), 64),
                        Err(err) => panic!("unexpected insert error: {err}"),
                    }
                }
                3 => {
                    let mut buf = [0u8; 6];
                    assert_eq!(queue.pop_front_into(&mut buf).is_ok(), model.pop_front().is_some());
                }
                4 => {
                    queue.reverse();
                    model = model.into_iter().rev().collect();
                }
                _ => {
                    queue.sort();
                    model.make_contiguous().sort();
                }
            }

            queue.validate().unwrap();
            assert!(queue.iter().map(|e| e.as_bytes()).eq(model.iter().map(Vec::as_slice)));
        }
    }

    assert_eq!(live(), baseline);
}
