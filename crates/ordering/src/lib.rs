//! Pure column ordering primitives over an in-memory column map.
//!
//! Nothing here touches a clock, generates ids, or performs I/O; callers
//! recompute derived fields (status, timestamps) and persist the result.

use std::collections::BTreeMap;

use domain::models::task::Task;
use domain::types::{BoardColumn, ColumnId};
use thiserror::Error;
use uuid::Uuid;

pub type ColumnMap = BTreeMap<ColumnId, Vec<Task>>;

#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("unknown column: {0}")]
    UnknownColumn(ColumnId),
    #[error("index {index} out of range for column {column} (len {len})")]
    IndexOutOfRange {
        column: ColumnId,
        index: usize,
        len: usize,
    },
}

/// A column map with every known column present and empty.
pub fn known_columns() -> ColumnMap {
    BoardColumn::ALL
        .iter()
        .map(|column| (ColumnId::from(*column), Vec::new()))
        .collect()
}

/// Distribute tasks into their columns and sort each column by `order`.
///
/// Tasks carrying a column id that is no longer recognized are re-homed to
/// the column matching their status, with a warning.
pub fn bucket_by_column(tasks: Vec<Task>) -> ColumnMap {
    let mut columns = known_columns();
    for mut task in tasks {
        if task.column_id.known().is_none() {
            let fallback = BoardColumn::for_task_status(task.status);
            tracing::warn!(
                "Task {} carries unknown column '{}', re-homing to '{}'",
                task.id,
                task.column_id,
                fallback
            );
            task.column_id = fallback.into();
        }
        if let Some(items) = columns.get_mut(&task.column_id) {
            items.push(task);
        }
    }
    for items in columns.values_mut() {
        items.sort_by_key(|task| task.order);
    }
    columns
}

/// Append a task to the end of a column, assigning its `order`.
/// Returns the assigned order.
pub fn add_to_column(
    columns: &mut ColumnMap,
    column_id: &ColumnId,
    mut task: Task,
) -> Result<u32, OrderingError> {
    let items = columns
        .get_mut(column_id)
        .ok_or_else(|| OrderingError::UnknownColumn(column_id.clone()))?;
    let order = items.len() as u32;
    task.order = order;
    task.column_id = column_id.clone();
    items.push(task);
    Ok(order)
}

/// Remove the task at `from_index` in `from` and reinsert it at `to_index`
/// in `to`, clamping `to_index` to the destination length. Total for any
/// in-range `from_index`; `(col, col, i, i)` leaves the sequence unchanged.
///
/// Returns the index the task actually landed at. The caller recomputes
/// contiguous `order` values and, on a cross-column move, the task's status.
pub fn move_between_columns(
    columns: &mut ColumnMap,
    from: &ColumnId,
    to: &ColumnId,
    from_index: usize,
    to_index: usize,
) -> Result<usize, OrderingError> {
    if !columns.contains_key(to) {
        return Err(OrderingError::UnknownColumn(to.clone()));
    }
    let source = columns
        .get_mut(from)
        .ok_or_else(|| OrderingError::UnknownColumn(from.clone()))?;
    if from_index >= source.len() {
        return Err(OrderingError::IndexOutOfRange {
            column: from.clone(),
            index: from_index,
            len: source.len(),
        });
    }
    let mut task = source.remove(from_index);
    task.column_id = to.clone();
    let dest = columns
        .get_mut(to)
        .ok_or_else(|| OrderingError::UnknownColumn(to.clone()))?;
    let insert_at = to_index.min(dest.len());
    dest.insert(insert_at, task);
    Ok(insert_at)
}

/// Rewrite `order` to 0..N-1 in current sequence order.
pub fn reindex_column(items: &mut [Task]) {
    for (index, task) in items.iter_mut().enumerate() {
        task.order = index as u32;
    }
}

/// Rewrite a column's sequence to match an id permutation and reindex it.
///
/// Returns the requested ids that were not present in the column. Tasks the
/// permutation left out keep their prior relative order at the tail, so an
/// incomplete permutation can never drop tasks.
pub fn sequence_column(
    columns: &mut ColumnMap,
    column_id: &ColumnId,
    ordered_ids: &[Uuid],
) -> Result<Vec<Uuid>, OrderingError> {
    let items = columns
        .get_mut(column_id)
        .ok_or_else(|| OrderingError::UnknownColumn(column_id.clone()))?;
    let mut pool: Vec<Task> = std::mem::take(items);
    let mut missing = Vec::new();
    for id in ordered_ids {
        match pool.iter().position(|task| task.id == *id) {
            Some(position) => items.push(pool.remove(position)),
            None => missing.push(*id),
        }
    }
    items.append(&mut pool);
    reindex_column(items);
    Ok(missing)
}
