use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use times_cli::pipeline::{OutputConfig, convert, load_raw_tables, read_only};
use times_cli::types::{OutputFormat, RunResult};
use times_ingest::{default_config_dir, load_config};

use crate::cli::Cli;

pub fn run(args: &Cli) -> Result<RunResult> {
    let run_span = info_span!("run", output_dir = %args.output_dir.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let raw = load_raw_tables(&args.inputs, &args.snapshot, args.use_snapshot)?;
    let raw_tables = raw.len();

    if args.only_read {
        read_only(raw, &args.output_dir)?;
        info!(
            tables = raw_tables,
            duration_ms = start.elapsed().as_millis() as u64,
            "read-only run finished"
        );
        return Ok(RunResult {
            output_dir: args.output_dir.clone(),
            raw_tables,
            conversion: None,
        });
    }

    let config_dir = args.config_dir.clone().unwrap_or_else(default_config_dir);
    let config = load_config(&config_dir)
        .with_context(|| format!("load configuration from {}", config_dir.display()))?;

    let output = OutputConfig {
        output_dir: args.output_dir.clone(),
        format: if args.dd {
            OutputFormat::Dd
        } else {
            OutputFormat::Csv
        },
        ground_truth_dir: args.ground_truth_dir.clone(),
    };
    let conversion = convert(&config, raw, &output)?;
    info!(
        tables = conversion.tables.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "conversion finished"
    );

    Ok(RunResult {
        output_dir: args.output_dir.clone(),
        raw_tables,
        conversion: Some(conversion),
    })
}
