//! CSV export of Q-values, one row per (cell, action) pair

use std::{io::Write, path::Path};

use serde::Serialize;

use crate::{Error, Result, q_learning::QTable};

/// One row of the export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QValueRecord {
    pub row: usize,
    pub col: usize,
    pub action: String,
    pub value: f64,
    /// Whether this is the action the greedy policy picks in this cell
    pub greedy: bool,
}

/// Write `table` as CSV to any writer, returning the number of data rows.
pub fn write_q_table_csv<W: Write>(table: &QTable, writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for (pos, action, value) in table.entries() {
        csv.serialize(QValueRecord {
            row: pos.row,
            col: pos.col,
            action: action.to_string(),
            value,
            greedy: table.greedy_action(pos) == action,
        })?;
        rows += 1;
    }
    csv.flush()?;
    Ok(rows)
}

/// Write `table` as CSV to `path`.
pub fn export_q_table_csv<P: AsRef<Path>>(table: &QTable, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(|e| Error::io(format!("create {}", path.display()), e))?;
    write_q_table_csv(table, file)
}
