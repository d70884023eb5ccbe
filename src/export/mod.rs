//! Export functionality for analysis
//!
//! Currently supports CSV export of a learned Q-table.

mod q_table_csv;

pub use q_table_csv::{QValueRecord, export_q_table_csv, write_q_table_csv};
