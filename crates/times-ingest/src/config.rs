//! Loading of the mapping rules and the DD table order.
//!
//! Two files make up a configuration directory:
//!
//! - `times_mapping.txt`: one rule per line, e.g.
//!   `ACT_BND[REG,ALLYEAR,PRC,VALUE] = ~FI_T(Region,Year,TechName,VALUE,Attribute:ACT_BND)`
//! - `times-info.json`: the table catalogue, used to order DD output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use times_model::{TimesConfig, TimesXlMap};

use crate::error::{IngestError, Result};

/// Environment variable for overriding the configuration directory.
pub const CONFIG_ENV_VAR: &str = "TIMES_CONFIG_DIR";

pub const MAPPING_FILE: &str = "times_mapping.txt";
pub const TABLE_INFO_FILE: &str = "times-info.json";

/// Table categories emitted to DD files, in output order.
const DD_CATEGORIES: [&str; 2] = ["set", "parameter"];

/// Get the configuration directory.
///
/// Resolution order:
/// 1. `TIMES_CONFIG_DIR` environment variable
/// 2. `config/` directory relative to the workspace root
pub fn default_config_dir() -> PathBuf {
    if let Ok(root) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
}

/// Load mapping rules and DD table order from a configuration directory.
pub fn load_config(dir: &Path) -> Result<TimesConfig> {
    let times_xl_maps = load_mappings(&dir.join(MAPPING_FILE))?;
    let dd_table_order = load_dd_table_order(&dir.join(TABLE_INFO_FILE))?;
    debug!(
        mappings = times_xl_maps.len(),
        dd_tables = dd_table_order.len(),
        config_dir = %dir.display(),
        "configuration loaded"
    );
    Ok(TimesConfig::new(times_xl_maps, dd_table_order))
}

pub fn load_mappings(path: &Path) -> Result<Vec<TimesXlMap>> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    parse_mappings(&contents).map_err(|(line, reason)| IngestError::MappingSyntax {
        path: path.to_path_buf(),
        line,
        reason,
    })
}

/// Parse the contents of a mapping file.
///
/// On failure returns the 1-based line number and the reason.
pub fn parse_mappings(contents: &str) -> std::result::Result<Vec<TimesXlMap>, (usize, String)> {
    let mut mappings = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        match parse_mapping_line(line) {
            Ok(Some(mapping)) => mappings.push(mapping),
            Ok(None) => {}
            Err(reason) => return Err((idx + 1, reason)),
        }
    }
    Ok(mappings)
}

/// Parse one mapping rule.
///
/// Returns `Ok(None)` for blank lines, comments and unfinished (`TODO`) rules.
pub fn parse_mapping_line(line: &str) -> std::result::Result<Option<TimesXlMap>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (times, xl) = line
        .split_once('=')
        .ok_or_else(|| "expected `TIMES[...] = XL(...)`".to_string())?;

    let (times_name, times_cols) = split_call(times.trim(), '[', ']')?;
    let (xl_name, xl_items) = split_call(xl.trim(), '(', ')')?;

    let mut xl_cols = Vec::new();
    let mut filter_rows = Vec::new();
    for item in xl_items {
        match item.split_once(':') {
            Some((column, value)) => {
                filter_rows.push((column.trim().to_lowercase(), value.trim().to_string()))
            }
            None => xl_cols.push(item),
        }
    }

    if xl_name == "~TODO" || xl_cols.iter().any(|c| c.starts_with("TODO")) {
        return Ok(None);
    }
    if times_cols.len() > xl_cols.len() {
        return Err(format!(
            "{times_name} declares {} columns but {xl_name} provides {}",
            times_cols.len(),
            xl_cols.len()
        ));
    }

    let xl_cols: Vec<String> = xl_cols.iter().map(|c| c.to_lowercase()).collect();
    let col_map = times_cols
        .iter()
        .cloned()
        .zip(xl_cols.iter().cloned())
        .collect();
    let xl_name = if xl_name.starts_with('~') {
        xl_name.to_uppercase()
    } else {
        xl_name
    };

    Ok(Some(TimesXlMap {
        times_name,
        times_cols,
        xl_name,
        xl_cols,
        col_map,
        filter_rows,
    }))
}

/// Split `NAME<open>a,b,c<close>` into the name and trimmed items.
fn split_call(text: &str, open: char, close: char) -> std::result::Result<(String, Vec<String>), String> {
    let (name, rest) = text
        .split_once(open)
        .ok_or_else(|| format!("missing `{open}` in `{text}`"))?;
    let inner = rest
        .trim_end()
        .strip_suffix(close)
        .ok_or_else(|| format!("missing `{close}` in `{text}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing table name in `{text}`"));
    }
    let items = inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    Ok((name.to_string(), items))
}

#[derive(Debug, Deserialize)]
struct TableInfo {
    name: String,
    #[serde(rename = "gams-cat")]
    gams_cat: String,
}

pub fn load_dd_table_order(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    parse_dd_table_order(&contents).map_err(|message| IngestError::TableInfo {
        path: path.to_path_buf(),
        message,
    })
}

/// Order DD tables by category (sets, then parameters), by name within each.
pub fn parse_dd_table_order(contents: &str) -> std::result::Result<Vec<String>, String> {
    let info: Vec<TableInfo> = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let mut by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for item in &info {
        by_category
            .entry(item.gams_cat.as_str())
            .or_default()
            .push(item.name.as_str());
    }
    let unknown: BTreeSet<&str> = by_category
        .keys()
        .copied()
        .filter(|category| !DD_CATEGORIES.contains(category))
        .collect();
    if !unknown.is_empty() {
        warn!(
            categories = %unknown.into_iter().collect::<Vec<_>>().join(", "),
            "unknown table categories in table info"
        );
    }
    let mut order = Vec::new();
    for category in DD_CATEGORIES {
        if let Some(names) = by_category.get_mut(category) {
            names.sort_unstable();
            order.extend(names.iter().map(|name| (*name).to_string()));
        }
    }
    Ok(order)
}
