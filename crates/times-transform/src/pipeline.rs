//! Ordered stage execution.
//!
//! # Standard Pipeline Order
//!
//! 1. **normalize_tags_columns** - Trim and case-normalize tags and headers
//! 2. **remove_fill_tables** - Drop `~TFM_FILL` tables
//! 3. **remove_comment_rows** - Drop commented-out and blank rows
//! 4. **remove_comment_cols** - Drop commented-out and unnamed columns
//! 5. **merge_tables** - Merge raw tables by tag into a table store
//! 6. **dump_merged_tables** - Diagnostics dump (added by the caller)
//! 7. **produce_times_tables** - Apply the mapping rules

use std::time::{Duration, Instant};

use tracing::info;

use times_model::{PipelineTables, TimesConfig};

use crate::canonical::ProduceTimesTables;
use crate::error::Result;
use crate::normalize::{
    merge_tables, normalize_tags_columns, remove_comment_cols, remove_comment_rows,
    remove_fill_tables,
};
use crate::stage::Stage;

/// Counts and timing for one executed stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    pub duration: Duration,
    pub tables_before: usize,
    pub rows_before: usize,
    pub tables_after: usize,
    pub rows_after: usize,
}

/// Per-stage reports of a pipeline run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }
}

/// An ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Insert a stage at a specific position.
    pub fn insert_stage(mut self, index: usize, stage: Box<dyn Stage>) -> Self {
        self.stages.insert(index, stage);
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order, threading each output into the next stage.
    pub fn run(
        &self,
        config: &TimesConfig,
        tables: PipelineTables,
    ) -> Result<(PipelineTables, PipelineReport)> {
        let mut report = PipelineReport::default();
        let mut tables = tables;
        for stage in &self.stages {
            let name = stage.name();
            let tables_before = tables.table_count();
            let rows_before = tables.row_count();
            let start = Instant::now();

            tables = stage
                .apply(config, tables)
                .map_err(|err| err.in_stage(name))?;

            let duration = start.elapsed();
            let stage_report = StageReport {
                name: name.to_string(),
                duration,
                tables_before,
                rows_before,
                tables_after: tables.table_count(),
                rows_after: tables.row_count(),
            };
            info!(
                stage = name,
                duration_ms = duration.as_millis() as u64,
                tables_before,
                rows_before,
                tables_after = stage_report.tables_after,
                rows_after = stage_report.rows_after,
                "stage finished"
            );
            report.stages.push(stage_report);
        }
        Ok((tables, report))
    }
}

/// Build the standard pipeline.
///
/// `dump_stage`, when given, runs between merging and canonicalization.
pub fn build_default_pipeline(dump_stage: Option<Box<dyn Stage>>) -> Pipeline {
    let pipeline = Pipeline::new()
        .add_stage(Box::new(normalize_tags_columns()))
        .add_stage(Box::new(remove_fill_tables()))
        .add_stage(Box::new(remove_comment_rows()))
        .add_stage(Box::new(remove_comment_cols()))
        .add_stage(Box::new(merge_tables()));
    let pipeline = match dump_stage {
        Some(stage) => pipeline.add_stage(stage),
        None => pipeline,
    };
    pipeline.add_stage(Box::new(ProduceTimesTables))
}
