//! Merging fresh source batches into an existing unified dataset.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use stumpage_model::{CanonicalRecord, MergePolicy};

/// One source's records from the current run.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub code: String,
    pub policy: MergePolicy,
    pub records: Vec<CanonicalRecord>,
}

/// What merging did for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub code: String,
    /// Existing rows removed.
    pub replaced: usize,
    /// Incoming rows added.
    pub appended: usize,
    /// Existing rows left in place because the batch was empty.
    pub retained: usize,
}

/// Rows of `existing` written by this source under the policy.
fn owned_by(policy: &MergePolicy, code: &str, record: &CanonicalRecord) -> bool {
    match policy {
        MergePolicy::ReplaceMarked { marker } => record
            .notes
            .as_deref()
            .is_some_and(|notes| notes.contains(marker.as_str())),
        MergePolicy::Rebuild | MergePolicy::MergeByYear => record.source == code,
    }
}

fn merge_batch(existing: &mut Vec<CanonicalRecord>, batch: SourceBatch) -> MergeOutcome {
    let SourceBatch {
        code,
        policy,
        records,
    } = batch;
    let owned = existing
        .iter()
        .filter(|record| owned_by(&policy, &code, record))
        .count();
    if records.is_empty() {
        return MergeOutcome {
            code,
            replaced: 0,
            appended: 0,
            retained: owned,
        };
    }

    let incoming = match policy {
        MergePolicy::MergeByYear if owned > 0 => {
            let known_years: BTreeSet<i32> = existing
                .iter()
                .filter(|record| owned_by(&policy, &code, record))
                .map(|record| record.year)
                .collect();
            let new_years: Vec<CanonicalRecord> = records
                .iter()
                .filter(|record| !known_years.contains(&record.year))
                .cloned()
                .collect();
            if new_years.is_empty() {
                existing.retain(|record| !owned_by(&policy, &code, record));
                records
            } else {
                debug!(code = %code, new_count = new_years.len(), "appending new years only");
                let appended = new_years.len();
                existing.extend(new_years);
                return MergeOutcome {
                    code,
                    replaced: 0,
                    appended,
                    retained: owned,
                };
            }
        }
        _ => {
            existing.retain(|record| !owned_by(&policy, &code, record));
            records
        }
    };
    let outcome = MergeOutcome {
        replaced: owned,
        appended: incoming.len(),
        retained: 0,
        code,
    };
    existing.extend(incoming);
    outcome
}

/// Merges batches into `existing` in order and sorts the result.
pub fn merge_batches(
    existing: Vec<CanonicalRecord>,
    batches: Vec<SourceBatch>,
) -> (Vec<CanonicalRecord>, Vec<MergeOutcome>) {
    let mut merged = existing;
    let outcomes: Vec<MergeOutcome> = batches
        .into_iter()
        .map(|batch| merge_batch(&mut merged, batch))
        .collect();
    for outcome in &outcomes {
        info!(
            code = %outcome.code,
            replaced = outcome.replaced,
            appended = outcome.appended,
            retained = outcome.retained,
            "source merged"
        );
    }
    sort_records(&mut merged);
    (merged, outcomes)
}

fn quarter_last(a: Option<u8>, b: Option<u8>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by source, year, then quarter with absent quarters last.
pub fn sort_records(records: &mut [CanonicalRecord]) {
    records.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then(a.year.cmp(&b.year))
            .then_with(|| quarter_last(a.quarter, b.quarter))
    });
}
