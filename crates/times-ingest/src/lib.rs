pub mod config;
pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod source;

pub use config::{
    CONFIG_ENV_VAR, MAPPING_FILE, TABLE_INFO_FILE, default_config_dir, load_config,
    load_dd_table_order, load_mappings, parse_dd_table_order, parse_mapping_line, parse_mappings,
};
pub use csv_table::{read_csv_table, read_csv_tables};
pub use discovery::{list_workbook_files, resolve_input_files};
pub use error::{IngestError, Result};
pub use extract::{SheetGrid, TableExtractor, XlsxExtractor, cell_reference, extract_sheet_tables};
pub use source::{ExtractingSource, RawTableSource, SnapshotSource, input_fingerprint};
