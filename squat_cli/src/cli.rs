//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "squat", version, about = "Squat technique analysis from pose landmarks")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON, and log as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum InputFormat {
    /// Pick by file extension (.csv is CSV, anything else JSON lines)
    Auto,
    /// One JSON frame per line
    Jsonl,
    /// `timestamp_ms,landmark,x,y,z` rows
    Csv,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FaultArg {
    Head,
    Trunk,
    Knee,
    Heel,
}

impl From<FaultArg> for squat_sources::Fault {
    fn from(f: FaultArg) -> Self {
        match f {
            FaultArg::Head => squat_sources::Fault::Head,
            FaultArg::Trunk => squat_sources::Fault::Trunk,
            FaultArg::Knee => squat_sources::Fault::Knee,
            FaultArg::Heel => squat_sources::Fault::Heel,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a recorded landmark trace
    Analyze {
        /// Trace file (JSON lines or CSV)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
        format: InputFormat,
        /// Session duration for the errors-per-second report; defaults to the
        /// last frame timestamp
        #[arg(long, value_name = "SECONDS")]
        duration_s: Option<f64>,
        /// Read the trace on a separate thread
        #[arg(long, action = ArgAction::SetTrue)]
        threaded: bool,
        /// Include the per-frame timeline in the output
        #[arg(long, action = ArgAction::SetTrue)]
        timeline: bool,
    },
    /// Analyze a synthetic subject (demo and smoke test)
    Simulate {
        /// Repetitions the subject performs (at most 10000)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=10_000))]
        reps: u32,
        /// Frame rate; defaults to input.fps from the config
        #[arg(long, value_name = "FPS")]
        fps: Option<f64>,
        /// Inject a form fault (repeatable)
        #[arg(long = "fault", value_enum, value_name = "PART")]
        faults: Vec<FaultArg>,
        /// Coordinate jitter amplitude
        #[arg(long, value_name = "AMPLITUDE")]
        noise: Option<f64>,
        /// Include the per-frame timeline in the output
        #[arg(long, action = ArgAction::SetTrue)]
        timeline: bool,
    },
    /// Load and validate the config, then exit
    CheckConfig,
}
