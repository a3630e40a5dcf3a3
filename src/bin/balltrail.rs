//! Replay a detection dump and write the per-frame ball annotation CSV.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use balltrail::integration::replay;
use balltrail::{CsvRecordSink, SelectionPolicy, SessionConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    FirstPassing,
    HighestConfidence,
}

impl From<Policy> for SelectionPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::FirstPassing => SelectionPolicy::FirstPassing,
            Policy::HighestConfidence => SelectionPolicy::HighestConfidence,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "balltrail", version, about)]
struct Args {
    /// JSON-lines detection dump, one frame per line
    input: PathBuf,

    /// Annotation CSV to write
    #[arg(short, long, default_value = "ball_annotations.csv")]
    output: PathBuf,

    /// Number of positions kept for the trail
    #[arg(long, default_value_t = 10)]
    history: usize,

    /// Left edge of the accepted band, as a fraction of frame width
    #[arg(long, default_value_t = 0.2)]
    left: f64,

    /// Right edge of the accepted band, as a fraction of frame width
    #[arg(long, default_value_t = 0.8)]
    right: f64,

    #[arg(long, value_enum, default_value_t = Policy::FirstPassing)]
    policy: Policy,

    /// Reject candidates that turn the trail by more than this many degrees
    #[arg(long)]
    max_turn: Option<f64>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();

    let config = SessionConfig::default()
        .with_history_capacity(args.history)
        .with_region(args.left, args.right)
        .with_policy(args.policy.into())
        .with_max_turn_degrees(args.max_turn);

    let input = File::open(&args.input)
        .with_context(|| format!("opening detection dump {}", args.input.display()))?;
    let sink = CsvRecordSink::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let stop = AtomicBool::new(false);
    replay(BufReader::new(input), config, sink, &stop, args.max_frames)
        .context("replay failed")?;

    info!(output = %args.output.display(), "annotations written");
    Ok(())
}
