//! Text and JSON rendering of analysis results.

use serde_json::json;
use squat_core::{BodyPart, RepetitionStatus, SessionReport, Verdict};

use crate::analyze::Finished;
use crate::feedback;

fn cell(deviated: bool, errors: u32) -> String {
    let tag = if deviated { "DEVIATION" } else { "ok" };
    format!("{tag} ({errors})")
}

pub fn print_text(done: &Finished) {
    let result = &done.run.result;
    let report = SessionReport::new(result, done.duration_s);
    let detected = result.repetitions_detected();

    for outcome in &done.run.timeline {
        println!("{}", json!(outcome));
    }
    println!(
        "Repetitions detected: {detected} ({} completed)",
        result.completed_repetitions()
    );
    if detected == 0 {
        println!("{}", feedback::NO_REPETITIONS);
    } else {
        println!();
        println!(
            "{:>3}  {:>8}  {:<14}{:<14}{:<14}{:<14}",
            "Rep", "End (s)", "Head", "Trunk", "Knee", "Heel"
        );
        for rec in result.slots().iter().take(usize::from(detected)) {
            let mark = if rec.status == RepetitionStatus::Incomplete {
                "*"
            } else {
                ""
            };
            println!(
                "{:>3}  {:>8.2}  {:<14}{:<14}{:<14}{:<14}",
                format!("{}{mark}", rec.index + 1),
                rec.timestamp_s,
                cell(rec.deviated.head, rec.error_totals.head),
                cell(rec.deviated.trunk, rec.error_totals.trunk),
                cell(rec.deviated.knee, rec.error_totals.knee),
                cell(rec.deviated.heel, rec.error_totals.heel),
            );
            for msg in feedback::for_repetition(rec) {
                println!("       - {msg}");
            }
        }
        if result
            .slots()
            .iter()
            .any(|r| r.status == RepetitionStatus::Incomplete)
        {
            println!("  * stream ended before returning to standing");
        }
    }

    println!();
    println!("Session verdict:");
    for row in &report.rows {
        let verdict = match row.verdict {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        };
        let flagged = row.deviated.iter().filter(|d| **d).count();
        let rate = row
            .errors_per_second
            .map(|r| format!(", {r:.2} errors/s"))
            .unwrap_or_default();
        println!(
            "  {:<6}{verdict} ({flagged} of 3 repetitions flagged{rate})",
            row.part.name()
        );
    }

    let stats = &done.run.stats;
    if stats.missing_detection + stats.out_of_order + stats.missing_reference > 0 {
        println!();
        println!(
            "Input: {} frames, {} without a body, {} without the tracked ear, {} out of order",
            stats.frames_seen, stats.missing_detection, stats.missing_reference, stats.out_of_order
        );
    }
}

pub fn json_value(done: &Finished) -> serde_json::Value {
    let result = &done.run.result;
    let report = SessionReport::new(result, done.duration_s);
    let feedback: Vec<Vec<&str>> = result
        .slots()
        .iter()
        .take(usize::from(result.repetitions_detected()))
        .map(feedback::for_repetition)
        .collect();
    let failed: Vec<&str> = BodyPart::ALL
        .into_iter()
        .filter(|p| result.part_failed(*p))
        .map(BodyPart::name)
        .collect();

    let mut v = json!({
        "repetitions_detected": result.repetitions_detected(),
        "completed_repetitions": result.completed_repetitions(),
        "repetitions": result.slots(),
        "failed_parts": failed,
        "feedback": feedback,
        "report": report,
        "stats": done.run.stats,
        "cancelled": done.run.cancelled,
    });
    if !done.run.timeline.is_empty() {
        v["timeline"] = json!(done.run.timeline);
    }
    v
}

pub fn print_json(done: &Finished) {
    println!("{}", json_value(done));
}
