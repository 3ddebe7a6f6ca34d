use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::CollectArgs;
use crate::model::{ConsolidatedMetrics, SceneMetrics, parse_scene_results};
use crate::scenes::{SCENE_NAMES, scene_ordinal};
use crate::util::write_json_pretty;

pub fn run(args: CollectArgs) -> Result<()> {
    let document = build_document(&args.roots);

    write_json_pretty(&args.output, &document)?;
    info!(
        path = %args.output.display(),
        entries = document.total_entries(),
        "wrote consolidated metrics"
    );

    Ok(())
}

/// Sweeps every root for the fixed scene folders and accumulates whatever
/// parses cleanly. A root or scene that cannot be read contributes nothing;
/// the sweep itself never fails.
pub fn build_document(roots: &[PathBuf]) -> ConsolidatedMetrics {
    let mut document = ConsolidatedMetrics::default();

    for root in roots {
        if !root.exists() {
            warn!(root = %root.display(), "root directory does not exist, skipping");
            continue;
        }

        info!(root = %root.display(), "processing root directory");

        for scene in SCENE_NAMES {
            let Some(ordinal) = scene_ordinal(scene) else {
                continue;
            };
            let results_path = root.join(scene).join("results.json");

            if !results_path.exists() {
                warn!(path = %results_path.display(), "results file not found, skipping scene");
                continue;
            }

            match read_scene_results(&results_path) {
                Ok((run_id, metrics)) => {
                    let composite_key = format!("{}_{}", root.display(), ordinal);
                    document.insert_scene(&composite_key, &metrics);
                    info!(scene, ordinal, run = %run_id, "scene metrics extracted");
                }
                Err(err) => {
                    warn!(
                        path = %results_path.display(),
                        error = %format!("{err:#}"),
                        "failed to extract scene metrics, skipping scene"
                    );
                }
            }
        }
    }

    document
}

fn read_scene_results(path: &Path) -> Result<(String, SceneMetrics)> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_scene_results(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
