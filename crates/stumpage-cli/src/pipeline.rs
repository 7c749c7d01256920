//! Unification pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: Run every source adapter in parallel
//! 2. **Harmonize**: Normalize product and unit labels, convert to $/ton
//! 3. **Merge**: Fold the fresh batches into any existing unified dataset
//! 4. **Deduplicate**: Keep the most complete record per key
//! 5. **Output**: Write the unified CSV and gather statistics
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use stumpage_ingest::{SourceConfig, SourceOutput, load_source};
use stumpage_model::{CanonicalRecord, MergePolicy};
use stumpage_transform::{
    ConversionStats, DatasetStats, MergeOutcome, SourceBatch, YearSpan, convert_records,
    deduplicate, merge_batches, normalize_record, read_unified, write_unified,
};

use crate::types::{RunSummary, SourceReport, SourceStatus};

/// Inputs for one unification run.
#[derive(Debug, Clone)]
pub struct UnifyOptions {
    pub raw_dir: PathBuf,
    pub output: PathBuf,
    pub sources: Vec<SourceConfig>,
    /// Merge into an existing unified file at `output`.
    pub merge_existing: bool,
    pub dry_run: bool,
    pub show_progress: bool,
}

impl UnifyOptions {
    pub fn new(raw_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output: output.into(),
            sources: Vec::new(),
            merge_existing: true,
            dry_run: false,
            show_progress: false,
        }
    }

    #[must_use]
    pub fn with_sources(mut self, sources: Vec<SourceConfig>) -> Self {
        self.sources = sources;
        self
    }
}

/// Default unified output beside the raw directory.
pub fn default_output_path(raw_dir: &Path) -> PathBuf {
    raw_dir
        .join("..")
        .join("processed")
        .join("stumpage_unified.csv")
}

// ============================================================================
// Stage 1: Load
// ============================================================================

/// One source after its adapter ran.
#[derive(Debug)]
pub struct LoadedSource {
    pub report: SourceReport,
    pub policy: MergePolicy,
    pub records: Vec<CanonicalRecord>,
}

fn year_span(records: &[CanonicalRecord]) -> Option<YearSpan> {
    let first = records.iter().map(|record| record.year).min()?;
    let last = records.iter().map(|record| record.year).max()?;
    Some(YearSpan { first, last })
}

fn load_one(config: &SourceConfig, raw_dir: &Path) -> LoadedSource {
    let span = info_span!("load", source = %config.code);
    let _guard = span.enter();

    let (status, output) = match load_source(config, raw_dir) {
        Ok(output) if output.records.is_empty() => {
            info!(
                location = %config.input.location().display(),
                missing = output.missing_input,
                "source empty"
            );
            (SourceStatus::Empty, output)
        }
        Ok(output) => (SourceStatus::Ok, output),
        Err(error) => {
            warn!(error = %error, "source failed; treating as empty");
            (
                SourceStatus::error(&error.to_string()),
                SourceOutput::default(),
            )
        }
    };

    LoadedSource {
        report: SourceReport {
            code: config.code.clone(),
            name: config.name.clone(),
            kind: config.input.kind(),
            status,
            records: output.records.len(),
            skipped: output.skipped,
            years: year_span(&output.records),
        },
        policy: config.merge.clone(),
        records: output.records,
    }
}

fn progress_bar(len: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} sources {msg}")
            .context("progress template")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

/// Runs every adapter in parallel; results keep the configured order.
pub fn load_sources(
    sources: &[SourceConfig],
    raw_dir: &Path,
    show_progress: bool,
) -> Result<Vec<LoadedSource>> {
    let bar = progress_bar(sources.len(), show_progress)?;
    let loaded: Vec<LoadedSource> = sources
        .par_iter()
        .map(|config| {
            let loaded = load_one(config, raw_dir);
            bar.set_message(config.code.clone());
            bar.inc(1);
            loaded
        })
        .collect();
    bar.finish_and_clear();
    Ok(loaded)
}

// ============================================================================
// Stage 2: Harmonize
// ============================================================================

/// Normalizes and converts every batch in place.
pub fn harmonize(loaded: &mut [LoadedSource]) -> ConversionStats {
    let mut totals = ConversionStats::default();
    for source in loaded.iter_mut() {
        let normalized: Vec<CanonicalRecord> = std::mem::take(&mut source.records)
            .into_iter()
            .map(normalize_record)
            .collect();
        let (converted, stats) = convert_records(normalized);
        source.records = converted;
        totals += stats;
    }
    info!(
        record_count = totals.records,
        converted = totals.converted,
        success_rate = totals.success_rate(),
        "records harmonized"
    );
    totals
}

// ============================================================================
// Stage 3: Merge
// ============================================================================

#[derive(Debug)]
pub struct MergeResult {
    pub records: Vec<CanonicalRecord>,
    pub existing_records: usize,
    pub outcomes: Vec<MergeOutcome>,
}

/// Folds the batches into the existing dataset, or into an empty one when
/// merging is off or no dataset exists yet.
pub fn merge(loaded: Vec<LoadedSource>, existing_path: Option<&Path>) -> Result<MergeResult> {
    let existing = match existing_path {
        Some(path) => read_unified(path)
            .with_context(|| format!("read existing dataset {}", path.display()))?,
        None => Vec::new(),
    };
    let existing_records = existing.len();
    let batches: Vec<SourceBatch> = loaded
        .into_iter()
        .map(|source| SourceBatch {
            code: source.report.code,
            policy: source.policy,
            records: source.records,
        })
        .collect();
    let (records, outcomes) = merge_batches(existing, batches);
    Ok(MergeResult {
        records,
        existing_records,
        outcomes,
    })
}

// ============================================================================
// Stages 4-5: Deduplicate and Output
// ============================================================================

/// Runs all stages and returns the run summary.
///
/// # Errors
///
/// Fails when every source came back empty, or when the existing dataset
/// cannot be read or the output cannot be written.
pub fn run_unify(options: &UnifyOptions) -> Result<RunSummary> {
    let run_span = info_span!("unify", raw_dir = %options.raw_dir.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let mut loaded = load_sources(&options.sources, &options.raw_dir, options.show_progress)?;
    let reports: Vec<SourceReport> = loaded.iter().map(|source| source.report.clone()).collect();
    let incoming: usize = reports.iter().map(|report| report.records).sum();
    if incoming == 0 {
        bail!(
            "no records loaded from {} configured sources under {}",
            options.sources.len(),
            options.raw_dir.display()
        );
    }

    let conversion = harmonize(&mut loaded);

    let existing_path = options.merge_existing.then_some(options.output.as_path());
    let MergeResult {
        records,
        existing_records,
        outcomes,
    } = merge(loaded, existing_path)?;

    let (records, duplicates_dropped) = deduplicate(records);

    if options.dry_run {
        info!(output = %options.output.display(), "dry run; output not written");
    } else {
        write_unified(&records, &options.output)
            .with_context(|| format!("write {}", options.output.display()))?;
    }
    let dataset = DatasetStats::from_records(&records);
    info!(
        record_count = dataset.records,
        duplicates_dropped,
        duration_ms = start.elapsed().as_millis(),
        "unification complete"
    );

    Ok(RunSummary {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        output: options.output.clone(),
        written: !options.dry_run,
        sources: reports,
        existing_records,
        conversion,
        merges: outcomes,
        duplicates_dropped,
        dataset,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};

    use stumpage_ingest::builtin_sources;
    use stumpage_model::PeriodType;

    use super::*;

    #[test]
    fn year_span_covers_all_records() {
        let records = vec![
            CanonicalRecord::new("GA", 2019, PeriodType::Quarterly),
            CanonicalRecord::new("GA", 2012, PeriodType::Quarterly),
            CanonicalRecord::new("GA", 2015, PeriodType::Quarterly),
        ];
        assert_eq!(
            year_span(&records),
            Some(YearSpan {
                first: 2012,
                last: 2019
            })
        );
        assert_eq!(year_span(&[]), None);
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn each_source_logs_one_load_event() {
        let dir = tempfile::tempdir().expect("temp dir");
        let csv = dir.path().join("al_forestry/al_stumpage_parsed.csv");
        fs::create_dir_all(csv.parent().expect("parent")).expect("create dir");
        fs::write(
            &csv,
            "year,region,species,product_type,price_avg,price_low,price_high,unit\n\
             2022,North,Pine,Sawtimber,28.00,25.00,31.00,$/ton\n",
        )
        .expect("write csv");
        let config = builtin_sources()
            .into_iter()
            .find(|source| source.code == "AL")
            .expect("AL source");

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let loaded = tracing::subscriber::with_default(subscriber, || load_one(&config, dir.path()));

        assert_eq!(loaded.report.status, SourceStatus::Ok);
        let logs = String::from_utf8(capture.0.lock().expect("lock").clone()).expect("utf8");
        assert_eq!(logs.matches("source loaded").count(), 1);
    }

    #[test]
    fn default_output_sits_beside_raw_dir() {
        let path = default_output_path(Path::new("data/raw"));
        assert_eq!(path, Path::new("data/raw/../processed/stumpage_unified.csv"));
    }
}
