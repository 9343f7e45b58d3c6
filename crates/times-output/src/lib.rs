//! Output writers for the TIMES reader.
//!
//! - [`write_csv_tables`]: one `<table>_output.csv` per table
//! - [`write_dd_files`]: `ts.dd` and `output.dd` for the solver
//! - [`dump_tables`]: diagnostic text dumps of raw or merged tables

pub mod common;
pub mod dd;
pub mod dump;
pub mod error;
pub mod flat;

pub use common::{ensure_output_dir, remove_files_with_suffix};
pub use dd::{
    DD_SUFFIX, OUTPUT_DD_FILE, TIMESLICE_DD_FILE, TIMESLICE_TABLES, dd_file_routing,
    render_dd_file, write_dd_files,
};
pub use dump::{dump_tables, render_dump};
pub use error::{OutputError, Result};
pub use flat::{CSV_OUTPUT_SUFFIX, write_csv_table, write_csv_tables};
