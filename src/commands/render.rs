use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use plotters::prelude::*;
use tracing::{info, warn};

use crate::cli::RenderArgs;
use crate::model::{ConsolidatedMetrics, Metric};
use crate::util::ensure_directory;

/// Per-directory series: ordinal -> value, keyed by root-directory name.
/// BTreeMap keeps directory iteration lexicographic, so chart layout and
/// legend order do not depend on the order of keys in the source document.
pub type SeriesGroup = BTreeMap<String, BTreeMap<u32, f64>>;

const SCENE_COUNT: u32 = 13;
const BAR_WIDTH: f64 = 0.15;

pub fn run(args: RenderArgs) -> Result<()> {
    let raw = fs::read(&args.metrics_file)
        .with_context(|| format!("failed to read {}", args.metrics_file.display()))?;
    let document: ConsolidatedMetrics = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", args.metrics_file.display()))?;

    ensure_directory(&args.output_dir)?;

    let mut charts_saved = 0_usize;
    for metric in Metric::ALL {
        let values = document.metric(metric);
        if values.is_empty() {
            warn!(metric = metric.as_str(), "no data for metric, skipping chart");
            continue;
        }

        let groups = group_by_directory(values);

        if args.style.includes_bars() {
            let path = args
                .output_dir
                .join(format!("{}_comparison.png", metric.file_stem()));
            draw_bar_chart(&path, metric, &groups)
                .map_err(|err| anyhow!("failed to render {}: {err}", path.display()))?;
            info!(path = %path.display(), "chart saved");
            charts_saved += 1;
        }

        if args.style.includes_lines() {
            let path = args
                .output_dir
                .join(format!("{}_line.png", metric.file_stem()));
            draw_line_chart(&path, metric, &groups)
                .map_err(|err| anyhow!("failed to render {}: {err}", path.display()))?;
            info!(path = %path.display(), "chart saved");
            charts_saved += 1;
        }
    }

    info!(
        charts = charts_saved,
        output_dir = %args.output_dir.display(),
        style = args.style.as_str(),
        "chart generation complete"
    );

    Ok(())
}

/// Splits a composite key on its last underscore into (directory, ordinal).
/// Keys without a numeric suffix are kept whole under ordinal 0.
pub fn split_composite_key(key: &str) -> (String, u32) {
    if let Some((prefix, suffix)) = key.rsplit_once('_') {
        if let Ok(ordinal) = suffix.parse::<u32>() {
            return (prefix.to_owned(), ordinal);
        }
    }
    (key.to_owned(), 0)
}

pub fn group_by_directory(values: &BTreeMap<String, f64>) -> SeriesGroup {
    let mut groups = SeriesGroup::new();
    for (key, value) in values {
        let (directory, ordinal) = split_composite_key(key);
        groups.entry(directory).or_default().insert(ordinal, *value);
    }
    groups
}

/// Bar heights for ordinals 1..=13, with missing ordinals drawn as zero.
/// A zero-height bar and a true zero reading are indistinguishable here,
/// matching the collector/renderer contract.
fn bar_values(series: &BTreeMap<u32, f64>) -> [f64; SCENE_COUNT as usize] {
    let mut values = [0.0; SCENE_COUNT as usize];
    for (ordinal, value) in series {
        if (1..=SCENE_COUNT).contains(ordinal) {
            values[(*ordinal - 1) as usize] = *value;
        }
    }
    values
}

fn draw_bar_chart(
    out_path: &Path,
    metric: Metric,
    groups: &SeriesGroup,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut y_max = 0.0_f64;
    for series in groups.values() {
        for value in bar_values(series) {
            y_max = y_max.max(value);
        }
    }
    if y_max <= 0.0 {
        y_max = 1.0;
    }

    let root = BitMapBackend::new(out_path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} comparison across runs", metric.as_str()),
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0_f64..(SCENE_COUNT as f64 + 1.0), 0.0_f64..(y_max * 1.05))?;

    chart
        .configure_mesh()
        .x_desc("Scene number")
        .y_desc(metric.as_str())
        .x_labels(SCENE_COUNT as usize + 1)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .draw()?;

    let dir_count = groups.len() as f64;
    for (idx, (directory, series)) in groups.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.8);
        let offset = (idx as f64 - dir_count / 2.0 + 0.5) * BAR_WIDTH;
        let values = bar_values(series);

        chart
            .draw_series((1..=SCENE_COUNT).map(|ordinal| {
                let x = ordinal as f64 + offset;
                let value = values[(ordinal - 1) as usize];
                Rectangle::new(
                    [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, value)],
                    color.filled(),
                )
            }))?
            .label(directory.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_line_chart(
    out_path: &Path,
    metric: Metric,
    groups: &SeriesGroup,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for series in groups.values() {
        for value in series.values() {
            y_min = y_min.min(*value);
            y_max = y_max.max(*value);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min) * 0.05).max(y_max.abs() * 0.01).max(1e-6);

    let root = BitMapBackend::new(out_path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} across scenes", metric.as_str()),
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            0.0_f64..(SCENE_COUNT as f64 + 1.0),
            (y_min - pad)..(y_max + pad),
        )?;

    chart
        .configure_mesh()
        .x_desc("Scene number")
        .y_desc(metric.as_str())
        .x_labels(SCENE_COUNT as usize + 1)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .draw()?;

    for (idx, (directory, series)) in groups.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|(ordinal, value)| (*ordinal as f64, *value))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(directory.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
