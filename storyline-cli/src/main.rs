//! Storyline CLI Tool
//!
//! Command-line interface for detecting time-series features and playing
//! rule-table storylines against a console surface.

mod console;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use storyline_core::{Axis, SeriesCollection, TimeSeries, TimeSeriesPoint};
use storyline_detect::{Detector, DetectorKind};
use storyline_player::{
    AnimationController, BuilderProps, FeatureActionBuilder, PlaybackState, RuleTable,
};

use console::ConsoleSurface;

#[derive(Parser)]
#[command(name = "storyline")]
#[command(about = "Storyline - data-driven storytelling for time-series charts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DetectorArg {
    Peaks,
    Slopes,
    Current,
}

impl From<DetectorArg> for DetectorKind {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Peaks => DetectorKind::Peaks,
            DetectorArg::Slopes => DetectorKind::Slopes,
            DetectorArg::Current => DetectorKind::Current,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect features in a series and print them as JSON
    Detect {
        /// Input series JSON file
        input: PathBuf,

        /// Detector to run
        #[arg(long, value_enum, default_value = "peaks")]
        kind: DetectorArg,

        /// Metric name recorded on each feature
        #[arg(long, default_value = "value")]
        metric: String,

        /// Detection window size in points
        #[arg(long, default_value = "10")]
        window: usize,
    },

    /// Play a storyline: bind a rule table to detected features and
    /// animate the timeline on the console
    Play {
        /// Input series JSON file
        input: PathBuf,

        /// Rule table JSON file
        #[arg(short, long)]
        table: PathBuf,

        /// Detector to run
        #[arg(long, value_enum, default_value = "peaks")]
        kind: DetectorArg,

        /// Metric name used in label templates
        #[arg(long, default_value = "value")]
        metric: String,

        /// Detection window size in points
        #[arg(long, default_value = "10")]
        window: usize,

        /// Playback speed factor (2.0 = twice as fast, 0 = instant)
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },

    /// Show series information
    Info {
        /// Input series JSON file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect {
            input,
            kind,
            metric,
            window,
        } => detect(input, kind, metric, window),

        Commands::Play {
            input,
            table,
            kind,
            metric,
            window,
            speed,
        } => play(input, table, kind, metric, window, speed).await,

        Commands::Info { input } => info(input),
    }
}

/// On-disk series formats: either a bare point list or a named
/// multi-series document
#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesFile {
    Points(Vec<TimeSeriesPoint>),
    Series(Vec<SeriesDoc>),
}

#[derive(Deserialize)]
struct SeriesDoc {
    name: String,
    #[serde(default)]
    axis: Axis,
    points: Vec<TimeSeriesPoint>,
}

fn load_series(path: &PathBuf) -> Result<SeriesCollection> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let parsed: SeriesFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let series = match parsed {
        SeriesFile::Points(points) => {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "series".to_string());
            vec![TimeSeries::new(name, Axis::Left, points)?]
        }
        SeriesFile::Series(docs) => docs
            .into_iter()
            .map(|doc| TimeSeries::new(doc.name, doc.axis, doc.points))
            .collect::<storyline_core::Result<_>>()?,
    };
    Ok(SeriesCollection::new(series))
}

fn detect(input: PathBuf, kind: DetectorArg, metric: String, window: usize) -> Result<()> {
    let data = load_series(&input)?;
    let series = data.primary().context("Input contains no series")?;

    let detector = Detector::new(kind.into(), metric, window);
    let features = detector.run(series)?;

    println!("{}", serde_json::to_string_pretty(&features)?);
    Ok(())
}

async fn play(
    input: PathBuf,
    table_path: PathBuf,
    kind: DetectorArg,
    metric: String,
    window: usize,
    speed: f64,
) -> Result<()> {
    let data = load_series(&input)?;
    let table_file = File::open(&table_path)
        .with_context(|| format!("Failed to open {}", table_path.display()))?;
    let table = RuleTable::from_reader(BufReader::new(table_file))?;

    let timeline = FeatureActionBuilder::new()
        .table(table)
        .detector(Detector::new(kind.into(), metric, window))
        .data(data.clone())
        .properties(BuilderProps::default())
        .build()?;
    println!("Timeline: {} actions", timeline.len());

    let surface = Arc::new(ConsoleSurface::new(&data, speed)?);
    let mut controller = AnimationController::new(surface, data);
    controller.set_timeline(timeline)?;

    loop {
        let state = controller.play().await?;
        if state != PlaybackState::Paused {
            break;
        }
        print!("-- paused, press Enter to continue --");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
    }

    println!("Storyline finished");
    Ok(())
}

fn info(input: PathBuf) -> Result<()> {
    let data = load_series(&input)?;
    println!("Series: {}", data.len());
    for series in data.series() {
        let range = series
            .date_range()
            .map(|(a, b)| format!("{a} .. {b}"))
            .unwrap_or_else(|| "empty".to_string());
        println!(
            "  {}: {} points, {}, max {:?}",
            series.name,
            series.len(),
            range,
            series.max_y()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_point_list() {
        let json = r#"[ { "date": "2020-01-01", "y": 1.0 }, { "date": "2020-01-02", "y": 2.0 } ]"#;
        let parsed: SeriesFile = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, SeriesFile::Points(points) if points.len() == 2));
    }

    #[test]
    fn test_parses_named_series_document() {
        let json = r#"[ {
            "name": "England",
            "axis": "left",
            "points": [ { "date": "2020-01-01", "y": 1.0 } ]
        } ]"#;
        let parsed: SeriesFile = serde_json::from_str(json).unwrap();
        let SeriesFile::Series(docs) = parsed else {
            panic!("expected named series");
        };
        assert_eq!(docs[0].name, "England");
        assert_eq!(docs[0].axis, Axis::Left);
    }
}
