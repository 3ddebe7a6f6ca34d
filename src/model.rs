use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// The four scalar metrics tracked per scene.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Metric {
    Ssim,
    Psnr,
    Lpips,
    Size,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Ssim, Metric::Psnr, Metric::Lpips, Metric::Size];

    /// Key name as it appears in result files and the consolidated document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssim => "SSIM",
            Self::Psnr => "PSNR",
            Self::Lpips => "LPIPS",
            Self::Size => "size",
        }
    }

    /// Lowercased stem used in chart filenames.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Ssim => "ssim",
            Self::Psnr => "psnr",
            Self::Lpips => "lpips",
            Self::Size => "size",
        }
    }
}

/// Metric values of one run entry inside a scene's `results.json`.
/// Extra fields in the file are ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SceneMetrics {
    #[serde(rename = "SSIM")]
    pub ssim: f64,
    #[serde(rename = "PSNR")]
    pub psnr: f64,
    #[serde(rename = "LPIPS")]
    pub lpips: f64,
    pub size: f64,
}

impl SceneMetrics {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ssim => self.ssim,
            Metric::Psnr => self.psnr,
            Metric::Lpips => self.lpips,
            Metric::Size => self.size,
        }
    }
}

/// The consolidated document: one map per metric, keyed by `"<root>_<ordinal>"`.
///
/// `BTreeMap` keeps every serialization of the same data byte-identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidatedMetrics {
    #[serde(rename = "SSIM")]
    pub ssim: BTreeMap<String, f64>,
    #[serde(rename = "PSNR")]
    pub psnr: BTreeMap<String, f64>,
    #[serde(rename = "LPIPS")]
    pub lpips: BTreeMap<String, f64>,
    pub size: BTreeMap<String, f64>,
}

impl ConsolidatedMetrics {
    pub fn metric(&self, metric: Metric) -> &BTreeMap<String, f64> {
        match metric {
            Metric::Ssim => &self.ssim,
            Metric::Psnr => &self.psnr,
            Metric::Lpips => &self.lpips,
            Metric::Size => &self.size,
        }
    }

    pub fn metric_mut(&mut self, metric: Metric) -> &mut BTreeMap<String, f64> {
        match metric {
            Metric::Ssim => &mut self.ssim,
            Metric::Psnr => &mut self.psnr,
            Metric::Lpips => &mut self.lpips,
            Metric::Size => &mut self.size,
        }
    }

    /// Stores all four scalars of one scene under its composite key.
    pub fn insert_scene(&mut self, composite_key: &str, metrics: &SceneMetrics) {
        for metric in Metric::ALL {
            self.metric_mut(metric)
                .insert(composite_key.to_owned(), metrics.value(metric));
        }
    }

    pub fn total_entries(&self) -> usize {
        Metric::ALL
            .iter()
            .map(|metric| self.metric(*metric).len())
            .sum()
    }
}

/// Parses a scene's `results.json`: a single-entry object whose key is a
/// free-form run identifier (e.g. `ours_35000`) and whose value holds the
/// metric fields. Zero or multiple run entries violate the file contract.
pub fn parse_scene_results(raw: &[u8]) -> Result<(String, SceneMetrics)> {
    let runs: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(raw).context("invalid JSON")?;

    if runs.len() > 1 {
        bail!("expected exactly one run entry, found {}", runs.len());
    }

    let Some((run_id, value)) = runs.into_iter().next() else {
        bail!("expected exactly one run entry, found none");
    };

    let metrics: SceneMetrics = serde_json::from_value(value)
        .with_context(|| format!("run entry {run_id} is missing a metric field"))?;

    Ok((run_id, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scene_results_reads_the_single_run_entry() {
        let raw = br#"
        {
          "ours_35000": {
            "SSIM": 0.874,
            "PSNR": 27.41,
            "LPIPS": 0.112,
            "size": 734.5,
            "fps": 121.0
          }
        }
        "#;

        let (run_id, metrics) = parse_scene_results(raw).expect("valid single-entry file");
        assert_eq!(run_id, "ours_35000");
        assert_eq!(metrics.ssim, 0.874);
        assert_eq!(metrics.psnr, 27.41);
        assert_eq!(metrics.lpips, 0.112);
        assert_eq!(metrics.size, 734.5);
    }

    #[test]
    fn parse_scene_results_rejects_empty_object() {
        let err = parse_scene_results(b"{}").unwrap_err();
        assert!(err.to_string().contains("found none"));
    }

    #[test]
    fn parse_scene_results_rejects_multiple_run_entries() {
        let raw = br#"
        {
          "ours_7000": {"SSIM": 0.8, "PSNR": 25.0, "LPIPS": 0.2, "size": 300.0},
          "ours_35000": {"SSIM": 0.9, "PSNR": 27.0, "LPIPS": 0.1, "size": 700.0}
        }
        "#;

        let err = parse_scene_results(raw).unwrap_err();
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn parse_scene_results_reports_missing_metric_field() {
        let raw = br#"{"ours_35000": {"SSIM": 0.9, "PSNR": 27.0, "size": 700.0}}"#;

        let err = parse_scene_results(raw).unwrap_err();
        assert!(err.to_string().contains("ours_35000"));
    }

    #[test]
    fn consolidated_document_serializes_under_original_key_names() {
        let mut document = ConsolidatedMetrics::default();
        document.insert_scene(
            "runs/base_1",
            &SceneMetrics {
                ssim: 0.9,
                psnr: 27.0,
                lpips: 0.1,
                size: 512.0,
            },
        );

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&document).expect("serialize"))
                .expect("reparse");

        for key in ["SSIM", "PSNR", "LPIPS", "size"] {
            assert!(json[key]["runs/base_1"].as_f64().is_some(), "{key}");
        }
        assert_eq!(document.total_entries(), 4);
    }
}
