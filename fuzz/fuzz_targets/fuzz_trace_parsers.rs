#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = squat_config::parse_frames_csv(data);
    if let Ok(text) = std::str::from_utf8(data) {
        for (idx, line) in text.lines().enumerate() {
            let _ = squat_sources::jsonl::parse_frame_line(line, idx + 1);
        }
    }
});
