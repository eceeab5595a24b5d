use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use squat_core::AnalysisSession;
use squat_core::mocks::ear_trace;
use squat_traits::Frame;

// Repeating squat ear trace with a little deterministic jitter.
fn synth_frames(n: usize, seed: u32) -> Vec<Frame> {
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let ys: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / 30.0;
            let depth = if i < 10 { 0.0 } else { 0.5 - 0.5 * (t * 2.0).cos() };
            0.40 + 0.06 * depth + (next_f64() - 0.5) * 0.002
        })
        .collect();
    ear_trace(&ys, 30.0)
}

pub fn bench_session(c: &mut Criterion) {
    let mut g = c.benchmark_group("session");
    // BENCH_SAMPLE_SIZE=10 cargo bench -p squat_core --bench session
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(10));
        }
    } else {
        g.sample_size(50);
    }

    for &n in &[300usize, 3_000] {
        let frames = synth_frames(n, 0xC0FFEE);
        g.bench_function(format!("process_{n}_frames"), |b| {
            b.iter_batched(
                || AnalysisSession::builder().build().unwrap(),
                |mut s| {
                    for f in &frames {
                        black_box(s.process_frame(f));
                    }
                    black_box(s.finalize(0.0))
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
