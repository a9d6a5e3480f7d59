//! The time-block resolution state machine.
//!
//! Given "now" as a time of day and a table of labeled quarter-hour rows,
//! [`resolve`] deterministically picks the row that best represents the
//! current moment:
//!
//! 1. the first row in table order whose interval contains `now`, else
//! 2. the row with the latest interval start at or before `now`, else
//! 3. the first candidate row (everything lies in the future).
//!
//! Whenever the picked row carries no data, the fallback walks backward
//! through table order to the nearest row that does. Every outcome is a
//! [`Resolution`]; the only hard failure is a table whose header lacks a
//! required column. The diagnostic string is empty exactly when an exact,
//! non-empty match was found.

use blockwatch_types::{Row, Table, Value};
use chrono::NaiveTime;
use thiserror::Error;
use tracing::debug;

use crate::classify::is_empty_row;
use crate::interval::{ParsedInterval, parse_interval};

/// Structural resolution failure. Malformed rows never produce this; only a
/// header missing a required column does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("required column {name:?} is missing from the table header")]
    MissingColumn { name: String },
}

/// A selected row together with its stable table position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'t> {
    pub index: usize,
    pub row: &'t Row,
}

/// The outcome of a resolution pass.
///
/// `selected` is `None` only for an empty table. `diagnostic` is the empty
/// string when an exact, non-empty match was found and explains the fallback
/// path otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'t> {
    pub selected: Option<Selection<'t>>,
    pub diagnostic: String,
}

impl Resolution<'_> {
    /// True when a fallback path was taken (or nothing could be selected).
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.diagnostic.is_empty()
    }
}

/// Resolve `now` against `table`.
///
/// `label_column` names the column holding interval labels and doubles as
/// the header-repeat marker for [`parse_interval`]. `payload_columns` are
/// the data columns consulted by the empty-row classifier.
///
/// # Errors
///
/// [`ResolveError::MissingColumn`] when `label_column` or any payload column
/// is absent from the header of a non-empty table.
pub fn resolve<'t>(
    table: &'t Table,
    now: NaiveTime,
    label_column: &str,
    payload_columns: &[String],
) -> Result<Resolution<'t>, ResolveError> {
    if table.is_empty() {
        return Ok(Resolution {
            selected: None,
            diagnostic: "no data at all".to_string(),
        });
    }

    let label_index = column_index(table, label_column)?;
    let mut payload = Vec::with_capacity(payload_columns.len());
    for name in payload_columns {
        payload.push(column_index(table, name)?);
    }

    let candidates: Vec<(usize, ParsedInterval)> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let label = cell_text(row, label_index);
            parse_interval(&label, label_column).map(|interval| (index, interval))
        })
        .collect();

    if candidates.is_empty() {
        let index = table.len() - 1;
        debug!(rows = table.len(), "no parseable intervals in table");
        return Ok(Resolution {
            selected: table.row(index).map(|row| Selection { index, row }),
            diagnostic: "no parseable intervals".to_string(),
        });
    }

    // Single forward pass: the first containing interval wins outright;
    // alongside it, track the latest interval start at or before now
    // (first-seen wins a tied start).
    let mut exact: Option<usize> = None;
    let mut latest: Option<(usize, ParsedInterval)> = None;
    for &(index, interval) in &candidates {
        if interval.contains(now) {
            exact = Some(index);
            break;
        }
        if interval.start <= now
            && latest.is_none_or(|(_, best)| interval.start > best.start)
        {
            latest = Some((index, interval));
        }
    }

    if let Some(index) = exact {
        let row = &table.rows()[index];
        if !is_empty_row(row, &payload) {
            return Ok(Resolution {
                selected: Some(Selection { index, row }),
                diagnostic: String::new(),
            });
        }
        debug!(index, "matched interval has no data yet, walking backward");
        return Ok(walk_backward(
            table,
            &payload,
            label_index,
            index.checked_sub(1),
            &cell_text(row, label_index),
        ));
    }

    if let Some((index, _)) = latest {
        let row = &table.rows()[index];
        let label = cell_text(row, label_index);
        if !is_empty_row(row, &payload) {
            return Ok(Resolution {
                selected: Some(Selection { index, row }),
                diagnostic: format!("no exact match; showing last known data from {label}"),
            });
        }
        debug!(index, "latest started interval has no data, walking backward");
        return Ok(walk_backward(table, &payload, label_index, Some(index), &label));
    }

    // Every candidate starts after now.
    let (index, _) = candidates[0];
    let row = &table.rows()[index];
    let label = cell_text(row, label_index);
    if !is_empty_row(row, &payload) {
        return Ok(Resolution {
            selected: Some(Selection { index, row }),
            diagnostic: format!(
                "all intervals start after {}; showing earliest {label}",
                now.format("%H:%M")
            ),
        });
    }
    debug!(index, "earliest future interval has no data, walking backward");
    Ok(walk_backward(table, &payload, label_index, Some(index), &label))
}

/// Scan table order from `start` down to row 0 for the first row with data.
///
/// `from_label` is the label of the row the resolver fell back from. The
/// caller guarantees the table is non-empty.
fn walk_backward<'t>(
    table: &'t Table,
    payload: &[usize],
    label_index: usize,
    start: Option<usize>,
    from_label: &str,
) -> Resolution<'t> {
    if let Some(start) = start {
        for index in (0..=start).rev() {
            let row = &table.rows()[index];
            if !is_empty_row(row, payload) {
                let found = cell_text(row, label_index);
                return Resolution {
                    selected: Some(Selection { index, row }),
                    diagnostic: format!(
                        "no new data after interval {from_label}; showing last known data from {found}"
                    ),
                };
            }
        }
    }
    Resolution {
        selected: table.row(0).map(|row| Selection { index: 0, row }),
        diagnostic: "no non-empty row found; showing earliest row".to_string(),
    }
}

fn column_index(table: &Table, name: &str) -> Result<usize, ResolveError> {
    table
        .column_index(name)
        .ok_or_else(|| ResolveError::MissingColumn {
            name: name.to_string(),
        })
}

fn cell_text(row: &Row, column: usize) -> String {
    row.get(column).map(Value::to_string).unwrap_or_default().trim().to_string()
}
