//! Fixed coaching messages keyed by body part.

use squat_core::{BodyPart, RepetitionRecord};

pub const GOOD_FORM: &str = "Great execution! Keep it up.";

pub const NO_REPETITIONS: &str = "No repetition was detected. Make sure the squat goes deep enough and returns to standing, or adjust the phase thresholds.";

pub fn message(part: BodyPart) -> &'static str {
    match part {
        BodyPart::Trunk => {
            "Check your trunk angle: keep the chest open and the spine neutral. Avoid rounding the back too far forward or backward."
        }
        BodyPart::Knee => {
            "Watch your knee alignment: make sure the knees track over the feet without drifting too far past the toes."
        }
        BodyPart::Head => {
            "Mind your head position: keep a neutral gaze with the neck in line with the spine. Avoid looking too far up or down."
        }
        BodyPart::Heel => {
            "Keep your heels down: press them firmly into the floor for the whole movement. Adjust your stance if needed."
        }
    }
}

/// Messages for one repetition, in presentation order.
pub fn for_repetition(rec: &RepetitionRecord) -> Vec<&'static str> {
    const ORDER: [BodyPart; 4] = [BodyPart::Trunk, BodyPart::Knee, BodyPart::Head, BodyPart::Heel];
    let msgs: Vec<&'static str> = ORDER
        .into_iter()
        .filter(|p| *rec.deviated.get(*p))
        .map(message)
        .collect();
    if msgs.is_empty() {
        vec![GOOD_FORM]
    } else {
        msgs
    }
}
