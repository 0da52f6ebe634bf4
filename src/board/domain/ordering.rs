//! Pure ordering rules shared by the engine and the storage adapters.
//!
//! A column is dense when the ordinals of its tasks are exactly `1..=N`.
//! Canonical order is `(ord ASC, task id ASC)`; the identifier only breaks
//! ties left behind by drift and never decides where a task is written.

use super::{BoardDomainError, Ordinal, Slot, TaskId};

/// Resolves a requested insertion slot against a destination column.
///
/// `count_to` is the number of tasks already in the destination. An absent
/// or non-finite hint appends; otherwise the hint is floored and clamped
/// into `1..=count_to + 1`, where `count_to + 1` means "after every existing
/// task".
///
/// # Errors
///
/// Returns [`BoardDomainError::InvalidOrdinal`] when the destination is so
/// full that the append slot no longer fits the persisted range.
pub fn resolve_target(hint: Option<f64>, count_to: usize) -> Result<Ordinal, BoardDomainError> {
    let append = Ordinal::after_count(count_to)?;
    let Some(requested) = hint.filter(|value| value.is_finite()) else {
        return Ok(append);
    };

    let floored = requested.floor();
    if floored <= 1.0 {
        return Ok(Ordinal::FIRST);
    }
    if floored >= f64::from(append.value()) {
        return Ok(append);
    }
    Ordinal::new(whole_to_i64(floored))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "callers pass a floored value strictly inside the i32 range"
)]
fn whole_to_i64(value: f64) -> i64 {
    value as i64
}

/// Returns the rewrites that bring a column back to `1..=N`.
///
/// Slots are put into canonical order first. Only slots whose stored
/// ordinal differs from their canonical position are returned, so an
/// already dense column yields an empty plan.
///
/// # Errors
///
/// Returns [`BoardDomainError::InvalidOrdinal`] when the column holds more
/// tasks than the persisted range allows.
pub fn renumber_plan(slots: &[Slot]) -> Result<Vec<(TaskId, Ordinal)>, BoardDomainError> {
    let mut ordered = slots.to_vec();
    ordered.sort_by_key(|slot| (slot.ord, slot.task_id));

    let mut plan = Vec::new();
    for (index, slot) in ordered.iter().enumerate() {
        let position = Ordinal::after_count(index)?;
        if slot.ord != i64::from(position.value()) {
            plan.push((slot.task_id, position));
        }
    }
    Ok(plan)
}

/// Returns whether the given ordinals form exactly `1..=N`.
#[must_use]
pub fn is_dense(ordinals: &[i64]) -> bool {
    let mut sorted = ordinals.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .zip(1_i64..)
        .all(|(actual, expected)| *actual == expected)
}
