//! Cursor rotation shared by the pool balancer and snapshot iteration
//!
//! Both call sites use the same scan so edge cases (empty list, single
//! element, nothing up) behave identically.

use crate::model::{Instance, InstanceStatus};

/// Find the next index past `cursor`, with wraparound, whose item
/// satisfies `is_candidate`. Examines at most `items.len()` positions,
/// one full revolution; a single-element list is checked once against
/// itself.
pub fn next_matching<T>(
    items: &[T],
    cursor: usize,
    is_candidate: impl Fn(&T) -> bool,
) -> Option<usize> {
    let len = items.len();
    if len == 0 {
        return None;
    }
    let cursor = cursor % len;
    (1..=len)
        .map(|step| (cursor + step) % len)
        .find(|&idx| is_candidate(&items[idx]))
}

/// [`next_matching`] specialized to instances in status UP
pub fn next_up(instances: &[Instance], cursor: usize) -> Option<usize> {
    next_matching(instances, cursor, |instance| {
        instance.status == InstanceStatus::Up
    })
}
