//! Single-element move over an ordered task list

use std::ops::RangeInclusive;

use shared::Task;

/// Positions whose task changes when moving `from` to `to`.
pub fn affected_span(from: usize, to: usize) -> RangeInclusive<usize> {
    from.min(to)..=from.max(to)
}

/// Move the task at `from` so it ends up at `to`.
///
/// `to` is the position in the resulting list, so for `to > from` it is the
/// insertion point after the removal shifted later tasks left. Every task in
/// [`affected_span`] gets `order_index` equal to its new position; tasks
/// outside the span are copied untouched. `from == to` returns an identical
/// copy.
///
/// # Panics
///
/// Panics if `from` or `to` is out of bounds.
pub fn move_task(tasks: &[Task], from: usize, to: usize) -> Vec<Task> {
    let len = tasks.len();
    assert!(from < len, "move source {from} out of bounds for list of {len}");
    assert!(to < len, "move target {to} out of bounds for list of {len}");

    let mut moved = tasks.to_vec();
    if from == to {
        return moved;
    }

    let task = moved.remove(from);
    moved.insert(to, task);
    for position in affected_span(from, to) {
        moved[position] = moved[position].with_order_index(position as i64);
    }
    moved
}

/// Identifier sequence sent with a reorder request.
pub fn task_ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id).collect()
}
