use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    /// The source failed earlier and will not produce more frames.
    #[error("frame source exhausted after an earlier failure")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, SourceError>;
