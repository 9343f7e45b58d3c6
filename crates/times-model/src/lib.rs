pub mod error;
pub mod frame;
pub mod mapping;
pub mod raw;
pub mod store;
pub mod table;

pub use error::{ModelError, Result};
pub use frame::{frame_to_table, table_to_frame};
pub use mapping::{
    DESCRIPTION_COLUMN, TECHGROUP_COLUMN, TECHNAME_COLUMN, TimesConfig, TimesXlMap, VALUE_COLUMN,
};
pub use raw::{RawTable, common_input_dir, sort_raw_tables};
pub use store::{PipelineTables, TableStore};
pub use table::{Table, dedupe_column_names};
