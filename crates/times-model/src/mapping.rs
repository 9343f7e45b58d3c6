use serde::{Deserialize, Serialize};

/// Column holding the numeric value of a parameter table.
pub const VALUE_COLUMN: &str = "VALUE";

/// Column holding the description of a set element.
pub const DESCRIPTION_COLUMN: &str = "TEXT";

/// Output column synthesized from the technology name when absent.
pub const TECHGROUP_COLUMN: &str = "techgroup";

/// Source column a missing `techgroup` is copied from.
pub const TECHNAME_COLUMN: &str = "techname";

/// One declarative rule deriving an output table from a source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesXlMap {
    /// Output table name.
    pub times_name: String,
    /// Output columns in order; the last one carries the value.
    pub times_cols: Vec<String>,
    /// Source table name.
    pub xl_name: String,
    /// Source columns that must be present.
    pub xl_cols: Vec<String>,
    /// Output column -> source column, in declaration order.
    pub col_map: Vec<(String, String)>,
    /// Source column -> required value, compared case-insensitively.
    pub filter_rows: Vec<(String, String)>,
}

impl TimesXlMap {
    /// Source column feeding the given output column.
    pub fn source_for(&self, times_col: &str) -> Option<&str> {
        self.col_map
            .iter()
            .find(|(target, _)| target == times_col)
            .map(|(_, source)| source.as_str())
    }

    /// Column whose value decides whether a row is kept.
    pub fn value_column(&self) -> Option<&str> {
        self.times_cols.last().map(String::as_str)
    }

    /// True when the output carries a `VALUE` column (a parameter table).
    pub fn is_parameter(&self) -> bool {
        self.source_for(VALUE_COLUMN).is_some()
    }
}

/// Mapping rules plus the declared output order of DD tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimesConfig {
    pub times_xl_maps: Vec<TimesXlMap>,
    pub dd_table_order: Vec<String>,
}

impl TimesConfig {
    pub fn new(times_xl_maps: Vec<TimesXlMap>, dd_table_order: Vec<String>) -> Self {
        Self {
            times_xl_maps,
            dd_table_order,
        }
    }

    /// True when a mapping producing `times_name` has no `VALUE` column.
    pub fn is_set_table(&self, times_name: &str) -> bool {
        self.times_xl_maps
            .iter()
            .any(|m| m.times_name == times_name && !m.is_parameter())
    }
}
