//! The stage abstraction and helpers for building stages from functions.

use times_model::{PipelineTables, RawTable, TableStore, TimesConfig};

use crate::error::{Result, TransformError};

/// One step of the transform pipeline.
///
/// A stage owns its input and returns a complete new set of tables.
pub trait Stage: Send + Sync {
    /// Name used in logs, reports and errors.
    fn name(&self) -> &str;

    fn apply(&self, config: &TimesConfig, tables: PipelineTables) -> Result<PipelineTables>;
}

/// A stage backed by a closure.
pub struct FnStage<F> {
    name: String,
    apply: F,
}

impl<F> FnStage<F>
where
    F: Fn(&TimesConfig, PipelineTables) -> Result<PipelineTables> + Send + Sync,
{
    pub fn new(name: impl Into<String>, apply: F) -> Self {
        Self {
            name: name.into(),
            apply,
        }
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(&TimesConfig, PipelineTables) -> Result<PipelineTables> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, config: &TimesConfig, tables: PipelineTables) -> Result<PipelineTables> {
        (self.apply)(config, tables)
    }
}

/// Lift a per-table function into a stage over raw tables.
///
/// Returning `None` drops the table.
pub fn raw_table_stage<F>(
    name: &'static str,
    transform: F,
) -> FnStage<impl Fn(&TimesConfig, PipelineTables) -> Result<PipelineTables> + Send + Sync>
where
    F: Fn(RawTable) -> Option<RawTable> + Send + Sync,
{
    FnStage::new(name, move |_config: &TimesConfig, tables: PipelineTables| {
        let raw = expect_raw(name, tables)?;
        Ok(PipelineTables::Raw(
            raw.into_iter().filter_map(&transform).collect(),
        ))
    })
}

/// Unwrap raw tables or fail with [`TransformError::UnexpectedInput`].
pub fn expect_raw(stage: &str, tables: PipelineTables) -> Result<Vec<RawTable>> {
    match tables {
        PipelineTables::Raw(raw) => Ok(raw),
        other => Err(TransformError::UnexpectedInput {
            stage: stage.to_string(),
            expected: "raw tables",
            found: other.kind(),
        }),
    }
}

/// Unwrap a table store or fail with [`TransformError::UnexpectedInput`].
pub fn expect_store(stage: &str, tables: PipelineTables) -> Result<TableStore> {
    match tables {
        PipelineTables::Store(store) => Ok(store),
        other => Err(TransformError::UnexpectedInput {
            stage: stage.to_string(),
            expected: "table store",
            found: other.kind(),
        }),
    }
}
