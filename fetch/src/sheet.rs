//! Spreadsheet decoding into the shared [`Table`] model.
//!
//! The report is an Excel workbook whose first worksheet carries a few
//! banner rows, then the header row, then the data. Headers are messy -
//! embedded line breaks and doubled spaces vary between publications - so
//! they are normalized before becoming column names.

use std::io::Cursor;

use blockwatch_types::{Row, Table, Value};
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::debug;

use crate::FetchError;

/// Decode spreadsheet `bytes` into a [`Table`].
///
/// `header_row` is the zero-based row (within the worksheet's used range)
/// holding the column names; every following row becomes a data row. Rows
/// whose cells are all blank are dropped, mirroring how the upstream export
/// pads the sheet.
pub fn parse_sheet(bytes: &[u8], header_row: usize) -> Result<Table, FetchError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(FetchError::NoWorksheet)??;
    table_from_range(&range, header_row)
}

fn table_from_range(range: &Range<Data>, header_row: usize) -> Result<Table, FetchError> {
    let mut rows = range.rows().skip(header_row);
    let header = rows.next().ok_or(FetchError::MissingHeaderRow)?;
    let columns: Vec<String> = header
        .iter()
        .map(|cell| normalize_header(&cell.to_string()))
        .collect();

    let data_rows: Vec<Row> = rows
        .map(|cells| Row::new(cells.iter().map(cell_value).collect()))
        .filter(|row| !row.is_blank())
        .collect();

    debug!(
        columns = columns.len(),
        rows = data_rows.len(),
        "worksheet decoded"
    );
    Ok(Table::new(columns, data_rows))
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

/// Collapse a raw header cell into a stable column name: line breaks
/// removed, space runs collapsed, ends trimmed.
fn normalize_header(text: &str) -> String {
    let unbroken: String = text
        .chars()
        .filter(|&c| c != '\n' && c != '\r')
        .collect();

    let mut name = String::with_capacity(unbroken.len());
    let mut previous_was_space = false;
    for ch in unbroken.trim().chars() {
        if ch == ' ' {
            if !previous_was_space {
                name.push(' ');
            }
            previous_was_space = true;
        } else {
            name.push(ch);
            previous_was_space = false;
        }
    }
    name
}
