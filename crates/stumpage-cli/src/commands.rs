use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{CellAlignment, Table};
use tracing::info;

use stumpage_cli::pipeline::{UnifyOptions, default_output_path, run_unify as run_pipeline};
use stumpage_cli::types::RunSummary;
use stumpage_ingest::{SourceConfig, SourceInput, builtin_sources, load_source_configs};
use stumpage_model::MergePolicy;
use stumpage_standards::{SpeciesGroup, all_factors, cord_factor, mbf_factor};

use crate::cli::{SourcesArgs, UnifyArgs};
use crate::summary::{align_column, apply_table_style};

fn configured_sources(path: Option<&Path>) -> Result<Vec<SourceConfig>> {
    match path {
        Some(path) => load_source_configs(path)
            .with_context(|| format!("load source configurations {}", path.display())),
        None => Ok(builtin_sources()),
    }
}

/// Keeps the sources named in `only`, in configured order.
fn select_sources(sources: Vec<SourceConfig>, only: &[String]) -> Result<Vec<SourceConfig>> {
    if only.is_empty() {
        return Ok(sources);
    }
    let unknown: Vec<&str> = only
        .iter()
        .filter(|code| {
            !sources
                .iter()
                .any(|source| source.code.eq_ignore_ascii_case(code))
        })
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("unknown source codes: {}", unknown.join(", "));
    }
    Ok(sources
        .into_iter()
        .filter(|source| only.iter().any(|code| source.code.eq_ignore_ascii_case(code)))
        .collect())
}

pub fn run_unify(args: &UnifyArgs) -> Result<RunSummary> {
    let sources = select_sources(configured_sources(args.sources.as_deref())?, &args.only)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.raw_dir));
    let options = UnifyOptions {
        merge_existing: !args.no_merge,
        dry_run: args.dry_run,
        show_progress: io::stderr().is_terminal(),
        ..UnifyOptions::new(&args.raw_dir, output)
    }
    .with_sources(sources);

    let summary = run_pipeline(&options)?;

    if let Some(path) = &args.summary_json {
        let json = serde_json::to_vec_pretty(&summary).context("serialize run summary")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "run summary written");
    }
    Ok(summary)
}

fn merge_label(policy: &MergePolicy) -> String {
    match policy {
        MergePolicy::Rebuild => "rebuild".to_string(),
        MergePolicy::MergeByYear => "merge by year".to_string(),
        MergePolicy::ReplaceMarked { marker } => format!("replace \"{marker}\""),
    }
}

fn period_label(input: &SourceInput) -> &'static str {
    match input {
        SourceInput::Table(table) => table.period_type.as_str(),
        SourceInput::Documents(documents) => documents.period_type.as_str(),
        SourceInput::Sales(_) | SourceInput::Usfs(_) => "annual",
    }
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let sources = configured_sources(args.sources.as_deref())?;
    if args.json {
        let json = serde_json::to_string_pretty(&sources).context("serialize sources")?;
        println!("{json}");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Code", "Name", "Kind", "Period", "Merge", "Input"]);
    apply_table_style(&mut table);
    for source in sources {
        table.add_row(vec![
            source.code.clone(),
            source.name.clone(),
            source.input.kind().to_string(),
            period_label(&source.input).to_string(),
            merge_label(&source.merge),
            source.input.location().display().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_factors() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        "Key", "Unit", "Tons", "Species group", "Product", "Source", "Notes",
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for factor in all_factors() {
        table.add_row(vec![
            factor.key.to_string(),
            factor.unit_from.to_string(),
            format!("{:.3}", factor.factor),
            factor.species_group.to_string(),
            factor.product.to_string(),
            factor.source.to_string(),
            factor.notes.to_string(),
        ]);
    }
    println!("{table}");
    let fallback = SpeciesGroup::MixedHardwood;
    println!(
        "Unmatched species use {} (cord: {:.2} tons, MBF: {:.2} tons).",
        fallback,
        cord_factor(fallback).factor,
        mbf_factor(fallback).factor
    );
    Ok(())
}
