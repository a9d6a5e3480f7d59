//! Empty-row detection.
//!
//! A row can carry a perfectly valid interval label and still hold no data:
//! upstream publishes the day's block labels up front and fills the figures
//! in as trading happens. The classifier looks only at the designated payload
//! columns - the label column never counts as data.

use blockwatch_types::{Row, Value};

/// True iff every payload cell of `row` is absent or blank.
///
/// `payload_columns` are column positions within the row; positions past the
/// end of the row count as absent.
#[must_use]
pub fn is_empty_row(row: &Row, payload_columns: &[usize]) -> bool {
    payload_columns
        .iter()
        .all(|&column| row.get(column).is_none_or(Value::is_blank))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_blank_payloads_mean_empty() {
        let row = Row::new(vec![
            "09:00-09:15".into(),
            Value::Empty,
            Value::Number(f64::NAN),
            "   ".into(),
        ]);
        assert!(is_empty_row(&row, &[1, 2, 3]));
    }

    #[test]
    fn any_real_payload_means_not_empty() {
        let row = Row::new(vec!["09:00-09:15".into(), Value::Empty, 0.0.into()]);
        assert!(!is_empty_row(&row, &[1, 2]));
    }

    #[test]
    fn label_column_does_not_count_as_data() {
        let row = Row::new(vec!["09:00-09:15".into(), Value::Empty]);
        assert!(is_empty_row(&row, &[1]));
    }

    #[test]
    fn out_of_range_columns_count_as_absent() {
        let row = Row::new(vec!["09:00-09:15".into()]);
        assert!(is_empty_row(&row, &[1, 2, 3]));
    }

    #[test]
    fn no_payload_columns_means_empty() {
        let row = Row::new(vec!["09:00-09:15".into(), 1.0.into()]);
        assert!(is_empty_row(&row, &[]));
    }
}
