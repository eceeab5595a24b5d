//! Human-readable error descriptions and structured JSON error formatting.

use squat_core::error::{AnalysisError, BuildError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid analysis configuration ({msg}).\nLikely causes: Out-of-range thresholds or tolerances in the TOML.\nHow to fix: Edit the config file (see etc/squat.toml), then rerun `squat check-config`."
            ),
        };
    }

    if let Some(ae) = err.downcast_ref::<AnalysisError>() {
        return match ae {
            AnalysisError::Config(msg) => format!(
                "What happened: Configuration rejected: {msg}.\nLikely causes: A missing file, a TOML syntax error, or a value outside its valid range.\nHow to fix: Fix the reported key and run `squat check-config`."
            ),
            AnalysisError::Source(msg) if msg.contains("trace CSV must have headers") => format!(
                "What happened: Invalid headers in trace CSV ({msg}).\nLikely causes: An export from another tool or a missing header row.\nHow to fix: The first row must be exactly 'timestamp_ms,landmark,x,y,z'."
            ),
            AnalysisError::Source(msg) => format!(
                "What happened: Could not read frames: {msg}.\nLikely causes: Wrong path, unreadable file, or a trace in a different format.\nHow to fix: Check the --input path and pass --format jsonl|csv explicitly."
            ),
            AnalysisError::SourceParse { line, message } => format!(
                "What happened: Malformed frame on line {line}: {message}.\nLikely causes: A truncated or hand-edited trace, or landmark names the analyzer does not know.\nHow to fix: Regenerate the trace or fix that line; each line must be one JSON frame."
            ),
            AnalysisError::Cancelled => "What happened: Analysis was cancelled; the result covers only the frames read before the interrupt.\nLikely causes: Ctrl-C or a termination signal.\nHow to fix: Rerun the command to analyze the whole trace.".to_string(),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("trace csv must have headers") {
        return "Invalid headers in trace CSV. Expected 'timestamp_ms,landmark,x,y,z'.".to_string();
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable reason names for JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::Config(_)) => "InvalidConfig",
        Some(AnalysisError::Source(_)) => "Source",
        Some(AnalysisError::SourceParse { .. }) => "SourceParse",
        Some(AnalysisError::Cancelled) => "Cancelled",
        None => "Error",
    }
}

/// Exit codes: 3 invalid configuration, 4 frame source failure, 130 cancelled, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match reason_name(err) {
        "InvalidConfig" => 3,
        "Source" | "SourceParse" => 4,
        "Cancelled" => 130,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = reason_name(err);
    match err.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::SourceParse { line, .. }) => json!({
            "reason": reason,
            "details": { "line": line },
            "message": humanize(err),
        })
        .to_string(),
        _ => json!({ "reason": reason, "message": humanize(err) }).to_string(),
    }
}
