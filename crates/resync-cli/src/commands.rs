//! Command implementations: open the snapshot, run the engine, export.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use resync_engine::{MissingMonthRule, SyncOptions, SyncRun, run_discovery};
use resync_export::{write_batches, write_new_links};
use resync_model::{BatchCounts, EntityLink};
use resync_store::{CsvSnapshotStore, parse_int_lossy};

use crate::cli::{DiscoverArgs, MissingMonthArg, SyncArgs};

/// Default output folder under the snapshot directory.
const OUTPUT_FOLDER: &str = "Final";

pub struct SyncOutcome {
    pub counts: BatchCounts,
    pub output_dir: PathBuf,
    /// Written batch files, in batch order; empty on a dry run.
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

pub struct DiscoverOutcome {
    pub candidates: usize,
    pub output_file: PathBuf,
}

pub fn run_sync(args: &SyncArgs) -> anyhow::Result<SyncOutcome> {
    let store = CsvSnapshotStore::open(&args.snapshot_dir).with_context(|| {
        format!("opening snapshot folder '{}'", args.snapshot_dir.display())
    })?;
    let options = SyncOptions {
        match_threshold: args.threshold,
        missing_month: month_rule(args),
        seed: args.seed,
        ..SyncOptions::default()
    };
    let run_date = args.run_date.unwrap_or_else(|| Local::now().date_naive());
    info!(%run_date, threshold = options.match_threshold, "starting sync run");

    let batches = SyncRun::new(&store, options, run_date).execute()?;

    let output_dir = resolve_output_dir(args.output_dir.as_deref(), &args.snapshot_dir);
    let files = if args.dry_run {
        info!("dry run, skipping export");
        Vec::new()
    } else {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("creating output folder '{}'", output_dir.display()))?;
        write_batches(&output_dir, &batches)?
    };
    Ok(SyncOutcome {
        counts: batches.counts(),
        output_dir,
        files,
        dry_run: args.dry_run,
    })
}

pub fn run_discover(args: &DiscoverArgs) -> anyhow::Result<DiscoverOutcome> {
    let store = CsvSnapshotStore::open(&args.snapshot_dir).with_context(|| {
        format!("opening snapshot folder '{}'", args.snapshot_dir.display())
    })?;
    let manual = match &args.matches_file {
        Some(path) => load_manual_links(path)?,
        None => Vec::new(),
    };
    let run_date = args.run_date.unwrap_or_else(|| Local::now().date_naive());
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let fields = run_discovery(&store, &manual, run_date, &mut rng)?;

    let output_dir = resolve_output_dir(args.output_dir.as_deref(), &args.snapshot_dir);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output folder '{}'", output_dir.display()))?;
    let output_file = write_new_links(&output_dir, &fields)?;
    Ok(DiscoverOutcome {
        candidates: fields.len(),
        output_file,
    })
}

fn month_rule(args: &SyncArgs) -> MissingMonthRule {
    match args.missing_month {
        MissingMonthArg::Random => MissingMonthRule::Random,
        MissingMonthArg::Fixed => MissingMonthRule::Fixed(args.fixed_month),
        MissingMonthArg::Skip => MissingMonthRule::Skip,
    }
}

fn resolve_output_dir(output_dir: Option<&Path>, snapshot_dir: &Path) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => snapshot_dir.join(OUTPUT_FOLDER),
    }
}

/// Load a pre-vetted manual matches file.
fn load_manual_links(path: &Path) -> anyhow::Result<Vec<EntityLink>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading matches file '{}'", path.display()))?;
    let headers = reader.headers()?.clone();
    let source_column = headers
        .iter()
        .position(|h| h.trim() == "personid")
        .context("matches file needs a 'personid' column")?;
    let target_column = headers
        .iter()
        .position(|h| h.trim() == "ConsID")
        .context("matches file needs a 'ConsID' column")?;

    let mut links = Vec::new();
    for record in reader.records() {
        let record = record?;
        let source = record.get(source_column).and_then(parse_int_lossy);
        let target = record.get(target_column).and_then(parse_int_lossy);
        if let (Some(source_id), Some(target_id)) = (source, target) {
            links.push(EntityLink {
                target_id,
                source_id,
            });
        }
    }
    info!(links = links.len(), "manual matches loaded");
    Ok(links)
}
