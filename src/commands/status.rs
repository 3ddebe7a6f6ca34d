use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::render::split_composite_key;
use crate::model::{ConsolidatedMetrics, Metric};
use crate::scenes::SCENE_NAMES;

pub fn run(args: StatusArgs) -> Result<()> {
    if !args.metrics_file.exists() {
        warn!(path = %args.metrics_file.display(), "consolidated metrics file missing");
        return Ok(());
    }

    let raw = fs::read(&args.metrics_file)
        .with_context(|| format!("failed to read {}", args.metrics_file.display()))?;
    let document: ConsolidatedMetrics = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", args.metrics_file.display()))?;

    info!(path = %args.metrics_file.display(), "loaded consolidated metrics");

    for metric in Metric::ALL {
        info!(
            metric = metric.as_str(),
            entries = document.metric(metric).len(),
            "metric entries"
        );
    }

    for (root, covered) in root_coverage(&document) {
        info!(
            root = %root,
            scenes = covered,
            expected = SCENE_NAMES.len(),
            "root coverage"
        );
    }

    Ok(())
}

/// Number of distinct scene ordinals recorded per root, across all metrics.
fn root_coverage(document: &ConsolidatedMetrics) -> BTreeMap<String, usize> {
    let mut ordinals: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();

    for metric in Metric::ALL {
        for key in document.metric(metric).keys() {
            let (root, ordinal) = split_composite_key(key);
            ordinals.entry(root).or_default().insert(ordinal);
        }
    }

    ordinals
        .into_iter()
        .map(|(root, seen)| (root, seen.len()))
        .collect()
}
