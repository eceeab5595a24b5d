use squat_traits::LandmarkId;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("frame source error: {0}")]
    Source(String),
    #[error("frame source parse error at line {line}: {message}")]
    SourceParse { line: usize, message: String },
    #[error("analysis cancelled")]
    Cancelled,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Why a single classifier could not evaluate a frame.
///
/// Never fatal: the session reports "not deviated" for that part and keeps
/// the reason for logging and statistics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("landmark {0} missing or not finite")]
    MissingLandmark(LandmarkId),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
    #[error("{landmark} drifted {drift:.3} from its standing reference")]
    TrackingJump { landmark: LandmarkId, drift: f64 },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
