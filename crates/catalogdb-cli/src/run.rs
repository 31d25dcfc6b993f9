//! Pipeline command handlers for the CLI.
//!
//! Every stage runs sequentially: load and normalize, persist, then write and
//! publish each batch in order. Any sink failure aborts the run.

use std::path::{Path, PathBuf};

use anyhow::Context;
use catalogdb_core::{AppConfig, NormalizedRecord};
use catalogdb_pipeline::{split_into_chunks, write_deliverable, write_records_to_path};
use catalogdb_sheets::{SheetsClient, SheetsConfig};

/// Flags for `catalogdb run`. Unset values fall back to [`AppConfig`].
#[derive(Debug, clap::Args)]
pub(crate) struct RunArgs {
    /// Raw catalog CSV to read
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Records per deliverable (defaults to CATALOGDB_CHUNK_SIZE)
    #[arg(long)]
    pub(crate) chunk_size: Option<usize>,
    /// Maximum number of deliverables to produce (defaults to all)
    #[arg(long)]
    pub(crate) max_deliverables: Option<usize>,
    /// Directory for deliverable CSV files (defaults to CATALOGDB_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Do not write to Postgres
    #[arg(long)]
    pub(crate) skip_db: bool,
    /// Do not upload to Google Sheets
    #[arg(long)]
    pub(crate) skip_sheets: bool,
}

/// Settings for one run after merging flags over config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunPlan {
    pub(crate) chunk_size: usize,
    pub(crate) max_deliverables: Option<usize>,
    pub(crate) output_dir: PathBuf,
}

impl RunPlan {
    pub(crate) fn resolve(config: &AppConfig, args: &RunArgs) -> Self {
        Self {
            chunk_size: args.chunk_size.unwrap_or(config.chunk_size),
            max_deliverables: args.max_deliverables.or(config.max_deliverables),
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
        }
    }
}

/// Runs the full pipeline for `catalogdb run`.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the chunk size is zero,
/// or any enabled sink (Postgres, CSV files, Sheets) fails.
pub(crate) async fn run_pipeline(config: &AppConfig, args: &RunArgs) -> anyhow::Result<()> {
    let plan = RunPlan::resolve(config, args);

    let records = catalogdb_pipeline::process_raw_data(&args.input)
        .with_context(|| format!("failed to process {}", args.input.display()))?;
    tracing::info!(rows = records.len(), "normalized catalog");

    // Validate chunking before touching any sink.
    let batches = split_into_chunks(&records, plan.chunk_size)?;

    if args.skip_db {
        tracing::info!("skipping database load");
    } else {
        persist(config, &records).await?;
    }

    let sheets = if args.skip_sheets {
        tracing::info!("skipping google sheets upload");
        None
    } else {
        let sheets_config = SheetsConfig::from_app_config(config)?;
        let client = catalogdb_sheets::connect(&sheets_config)
            .await
            .context("failed to authorize google sheets")?;
        Some(client)
    };

    std::fs::create_dir_all(&plan.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            plan.output_dir.display()
        )
    })?;

    let limit = plan.max_deliverables.unwrap_or(usize::MAX);
    for batch in batches.iter().take(limit) {
        write_deliverable(&plan.output_dir, batch)?;
        if let Some(client) = &sheets {
            publish(client, batch.records(), &batch.sheet_title(), batch.ordinal()).await?;
        }
    }

    let delivered = batches.len().min(limit);
    tracing::info!(
        batches = batches.len(),
        delivered,
        "pipeline complete"
    );
    Ok(())
}

async fn persist(config: &AppConfig, records: &[NormalizedRecord]) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;
    catalogdb_db::create_products_table(&pool)
        .await
        .context("failed to create products table")?;
    let inserted = catalogdb_db::insert_products(&pool, records)
        .await
        .context("failed to insert products")?;
    tracing::info!(rows = inserted, "saved catalog to postgres");
    Ok(())
}

async fn publish(
    client: &SheetsClient,
    records: &[NormalizedRecord],
    title: &str,
    ordinal: usize,
) -> anyhow::Result<()> {
    let sheet_id = client
        .upload_batch(records, title)
        .await
        .with_context(|| format!("failed to upload '{title}' to google sheets"))?;
    tracing::info!(batch = ordinal, %sheet_id, "published deliverable");
    Ok(())
}

/// Normalizes `input` and writes every kept record to `output`.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded or the output written.
pub(crate) fn run_normalize(input: &Path, output: &Path) -> anyhow::Result<()> {
    let records = catalogdb_pipeline::process_raw_data(input)
        .with_context(|| format!("failed to process {}", input.display()))?;
    write_records_to_path(output, &records)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(rows = records.len(), path = %output.display(), "wrote normalized catalog");
    println!("wrote {} records to {}", records.len(), output.display());
    Ok(())
}
