use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "gsmetrics",
    version,
    about = "Collect and chart per-scene metrics from reconstruction benchmark runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Collect(CollectArgs),
    Render(RenderArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Experiment root directories, each containing the benchmark scene folders.
    #[arg(long = "root", required = true)]
    pub roots: Vec<PathBuf>,

    #[arg(long, default_value = "extracted_metrics.json")]
    pub output: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ChartStyle {
    Bars,
    Lines,
    Both,
}

impl ChartStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Lines => "lines",
            Self::Both => "both",
        }
    }

    pub fn includes_bars(self) -> bool {
        matches!(self, Self::Bars | Self::Both)
    }

    pub fn includes_lines(self) -> bool {
        matches!(self, Self::Lines | Self::Both)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[arg(long, default_value = "extracted_metrics.json")]
    pub metrics_file: PathBuf,

    #[arg(long, default_value = "metric_graphs")]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = ChartStyle::Both)]
    pub style: ChartStyle,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "extracted_metrics.json")]
    pub metrics_file: PathBuf,
}
