//! # Handshake Benchmark
//!
//! Measures the two costs that bound the presenter's frame budget:
//! 1. A lone state push (lock, copy in, notify)
//! 2. A full request/acknowledge round trip against a live producer thread
//!
//! Target: the round trip must stay well under a 90 Hz frame (11.1 ms);
//! the push must be sub-microsecond.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prism_bridge::{FrameSubmission, HandshakeConfig, PresenterSession, ProducerSession, SharedRegion};
use prism_shared::math::{Mat4, Vec3};

fn spawn_echo_producer(
    region: Arc<SharedRegion>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut producer = ProducerSession::attach(region).expect("layout must match");
        let mut fulfilled = None;
        while !stop.load(Ordering::Acquire) {
            let system = producer.wait_for_request(Some(Duration::from_micros(200)));
            let request = system.sensor.input_frame_id;
            if fulfilled == Some(request) {
                continue;
            }
            let submission = FrameSubmission {
                texture_handle: request,
                ..FrameSubmission::default()
            };
            if producer.submit_frame(request, &submission).is_ok() {
                fulfilled = Some(request);
            }
        }
    })
}

/// Lone push: lock the presenter slot, copy 344 bytes in, notify.
fn bench_state_push(c: &mut Criterion) {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), HandshakeConfig::default())
            .expect("layout must match");

    c.bench_function("system_state_push", |b| {
        b.iter(|| {
            presenter.push_system_state();
            black_box(&presenter);
        });
    });
}

/// Full round trip: pose in, rendered layer out, against a producer that
/// answers as fast as it can.
fn bench_request_round_trip(c: &mut Criterion) {
    let region = SharedRegion::new();
    let config = HandshakeConfig {
        wait_interval_ms: 1,
        missed_cycle_limit: None,
    };
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), config).expect("layout must match");

    let stop = Arc::new(AtomicBool::new(false));
    let producer_thread = spawn_echo_producer(Arc::clone(&region), Arc::clone(&stop));

    let head = Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0));
    c.bench_function("frame_request_round_trip", |b| {
        b.iter(|| {
            let result = presenter
                .request_frame(black_box(&head))
                .expect("producer is alive");
            black_box(result);
        });
    });

    stop.store(true, Ordering::Release);
    producer_thread.join().expect("producer thread");
}

criterion_group!(benches, bench_state_push, bench_request_round_trip);
criterion_main!(benches);
