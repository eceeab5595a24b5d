//! Maps `Box<dyn Error>` from the `FrameSource` boundary to typed `AnalysisError`.
//!
//! `squat_traits::FrameSource` returns `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `squat_sources::SourceError` downcasting.

use crate::error::AnalysisError;

/// Map a trait-boundary error to a typed `AnalysisError`.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> AnalysisError {
    #[cfg(feature = "source-errors")]
    {
        if let Some(se) = e.downcast_ref::<squat_sources::SourceError>() {
            return match se {
                squat_sources::SourceError::Parse { line, message } => AnalysisError::SourceParse {
                    line: *line,
                    message: message.clone(),
                },
                other => AnalysisError::Source(other.to_string()),
            };
        }
    }

    AnalysisError::Source(e.to_string())
}
