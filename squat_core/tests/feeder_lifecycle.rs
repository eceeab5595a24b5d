//! Feeder thread lifecycle: the producer thread must never outlive its
//! `FrameFeeder`, even when blocked on a full queue.

use squat_core::feeder::FrameFeeder;
use squat_core::mocks::{FailingSource, ear_trace};
use squat_sources::ReplaySource;
use std::time::Duration;

#[test]
fn feeder_delivers_everything_then_ends() {
    let frames = ear_trace(&[0.40; 25], 30.0);
    let feeder = FrameFeeder::spawn(ReplaySource::new(frames.clone()), 3);
    let mut got = Vec::new();
    while let Some(item) = feeder.recv() {
        got.push(item.unwrap());
    }
    assert_eq!(got, frames);
    assert!(feeder.recv().is_none());
}

#[test]
fn drop_with_full_queue_joins_producer() {
    // 1000 frames through a queue of 1: the producer is blocked on send.
    let feeder = FrameFeeder::spawn(ReplaySource::new(ear_trace(&[0.40; 1000], 30.0)), 1);
    std::thread::sleep(Duration::from_millis(20));
    let _ = feeder.recv();
    drop(feeder);
}

#[test]
fn many_feeders_do_not_leak() {
    for _ in 0..10 {
        let feeder = FrameFeeder::spawn(ReplaySource::new(ear_trace(&[0.40; 50], 30.0)), 2);
        std::thread::sleep(Duration::from_millis(2));
        drop(feeder);
    }
}

#[test]
fn error_is_forwarded_once() {
    let inner = ReplaySource::new(ear_trace(&[0.40; 10], 30.0));
    let feeder = FrameFeeder::spawn(FailingSource::new(inner, 2), 4);
    assert!(feeder.recv().unwrap().is_ok());
    assert!(feeder.recv().unwrap().is_ok());
    assert!(feeder.recv().unwrap().is_err());
    assert!(feeder.recv().is_none());
}
