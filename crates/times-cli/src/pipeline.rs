//! Run orchestration shared by the binary and the integration tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use times_ingest::{
    ExtractingSource, RawTableSource, SnapshotSource, XlsxExtractor, read_csv_tables,
    resolve_input_files,
};
use times_model::{PipelineTables, RawTable, TimesConfig, common_input_dir, sort_raw_tables};
use times_output::{dump_tables, write_csv_tables, write_dd_files};
use times_transform::{FnStage, Stage, TransformError, build_default_pipeline};
use times_verify::compare;

use crate::types::{ConversionSummary, OutputFormat};

pub const RAW_DUMP_FILE: &str = "raw_tables.txt";
pub const MERGED_DUMP_FILE: &str = "merged_tables.txt";

/// Where and how a conversion writes its results.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub ground_truth_dir: Option<PathBuf>,
}

/// Resolve the inputs and extract their raw tables through the snapshot cache.
pub fn load_raw_tables(
    inputs: &[PathBuf],
    snapshot: &Path,
    use_snapshot: bool,
) -> Result<Vec<RawTable>> {
    let files = resolve_input_files(inputs).context("resolve inputs")?;
    let source = SnapshotSource::new(
        ExtractingSource::new(XlsxExtractor),
        snapshot,
        use_snapshot,
    );
    source.load(&files).context("extract raw tables")
}

/// Sort the raw tables, make their paths relative to the common input
/// directory and dump them to `raw_tables.txt`.
pub fn read_only(raw: Vec<RawTable>, output_dir: &Path) -> Result<PipelineTables> {
    let mut raw = raw;
    sort_raw_tables(&mut raw);
    if let Some(prefix) = common_input_dir(&raw) {
        raw = raw
            .into_iter()
            .map(|table| table.strip_filename_prefix(&prefix))
            .collect();
    }
    let tables = PipelineTables::Raw(raw);
    dump_tables(&tables, &output_dir.join(RAW_DUMP_FILE)).context("dump raw tables")?;
    Ok(tables)
}

/// Stage that dumps the merged tables and passes them on unchanged.
pub fn dump_stage(path: PathBuf) -> impl Stage {
    FnStage::new(
        "dump_merged_tables",
        move |_config: &TimesConfig, tables: PipelineTables| {
            dump_tables(&tables, &path)
                .map_err(|err| TransformError::stage("dump_merged_tables", err))?;
            Ok(tables)
        },
    )
}

/// Run the full conversion over extracted raw tables.
pub fn convert(
    config: &TimesConfig,
    raw: Vec<RawTable>,
    output: &OutputConfig,
) -> Result<ConversionSummary> {
    let raw = PipelineTables::Raw(raw);
    dump_tables(&raw, &output.output_dir.join(RAW_DUMP_FILE)).context("dump raw tables")?;

    let merged_dump: Box<dyn Stage> =
        Box::new(dump_stage(output.output_dir.join(MERGED_DUMP_FILE)));
    let pipeline = build_default_pipeline(Some(merged_dump));
    let (tables, report) = pipeline.run(config, raw).context("transform pipeline")?;
    let store = match tables {
        PipelineTables::Store(store) => store,
        other => bail!("pipeline finished with {} instead of a table store", other.kind()),
    };

    let written = match output.format {
        OutputFormat::Csv => write_csv_tables(&store, &output.output_dir),
        OutputFormat::Dd => write_dd_files(config, &store, &output.output_dir),
    }
    .context("write output tables")?;

    let verification = match &output.ground_truth_dir {
        Some(dir) => {
            let ground_truth = read_csv_tables(dir)
                .with_context(|| format!("load ground truth from {}", dir.display()))?;
            info!(tables = ground_truth.len(), "loaded ground truth");
            Some(compare(&store, &ground_truth, &output.output_dir).context("verify output")?)
        }
        None => None,
    };

    let tables = store
        .iter()
        .map(|(name, table)| (name.clone(), table.height()))
        .collect();
    Ok(ConversionSummary {
        report,
        tables,
        written,
        verification,
    })
}
