use std::sync::atomic::{AtomicU64, Ordering};

// Global atomic counter for node stable IDs.
//
// Monotonic and never reused: an id names exactly one node object for the
// lifetime of the process.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_node_id() -> u64 {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}
