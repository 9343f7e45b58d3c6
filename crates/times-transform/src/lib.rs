//! TIMES reader transform pipeline.
//!
//! Raw tables extracted from workbooks pass through an ordered list of
//! [`Stage`]s. Early stages clean up tags, headers, comment rows and columns,
//! then tables are merged by tag into a [`times_model::TableStore`], and the
//! last stage applies the mapping rules to produce the output tables.
//!
//! # Example
//!
//! ```ignore
//! use times_transform::build_default_pipeline;
//!
//! let pipeline = build_default_pipeline(None);
//! let (tables, report) = pipeline.run(&config, raw_tables.into())?;
//! ```

pub mod canonical;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod stage;

pub use canonical::{Canonicalized, MappingWarning, ProduceTimesTables, produce_times_tables};
pub use error::{Result, TransformError};
pub use normalize::{
    merge_raw_tables, merge_tables, normalize_tags_columns, remove_comment_cols,
    remove_comment_rows, remove_fill_tables,
};
pub use pipeline::{Pipeline, PipelineReport, StageReport, build_default_pipeline};
pub use stage::{FnStage, Stage, expect_raw, expect_store, raw_table_stage};
