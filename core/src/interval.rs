//! Interval label parsing.
//!
//! Upstream tables label each row with a time range like `"20:30-20:45"`.
//! Labels come from a spreadsheet, so anything can show up in that cell:
//! repeated header rows, stray text, or nothing at all. Parsing is therefore
//! total - a label either yields a [`ParsedInterval`] or the row is simply
//! not a candidate.

use chrono::NaiveTime;

/// A half-open time-of-day range `[start, end)`.
///
/// `crosses_midnight` is true iff `start > end`, i.e. the interval wraps past
/// midnight and covers two day-fragments. `start == end` is not a valid
/// interval; [`parse_interval`] rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub crosses_midnight: bool,
}

impl ParsedInterval {
    /// Half-open containment: start inclusive, end exclusive.
    ///
    /// For a wrapping interval the range is the union of the two
    /// day-fragments, so `23:45-00:00` contains both `23:50` and (for an
    /// interval ending later than midnight) the minutes after it.
    #[must_use]
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.crosses_midnight {
            now >= self.start || now < self.end
        } else {
            self.start <= now && now < self.end
        }
    }
}

/// Parse an interval label into a [`ParsedInterval`].
///
/// Returns `None` for anything that is not exactly two `%H:%M` times joined
/// by a single `-`, for degenerate ranges (`start == end`), and for labels
/// that contain `header_marker` - upstream tables re-emit the header row
/// mid-document, and those rows carry the interval column's own name in the
/// label cell.
#[must_use]
pub fn parse_interval(label: &str, header_marker: &str) -> Option<ParsedInterval> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if !header_marker.trim().is_empty()
        && label.to_lowercase().contains(&header_marker.trim().to_lowercase())
    {
        return None;
    }

    let mut parts = label.split('-');
    let (start, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => (parse_time(start)?, parse_time(end)?),
        _ => return None,
    };
    if start == end {
        return None;
    }

    Some(ParsedInterval {
        start,
        end,
        crosses_midnight: start > end,
    })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}
