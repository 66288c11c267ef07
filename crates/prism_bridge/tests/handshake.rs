//! Threaded handshake scenarios: presenter and producer on independently
//! scheduled threads, exchanging state through one shared region.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use prism_bridge::{
    BridgeError, FrameSubmission, HandshakeConfig, PresenterSession, ProducerSession,
    SharedRegion,
};
use prism_shared::math::{Mat4, Vec3};
use prism_shared::wire::{LayerEyeRect, LayerKind, LayerState};

/// Short wait interval so tests recover quickly from lost wakeups.
fn test_config() -> HandshakeConfig {
    HandshakeConfig {
        wait_interval_ms: 5,
        missed_cycle_limit: None,
    }
}

fn half_rects() -> (LayerEyeRect, LayerEyeRect) {
    (
        LayerEyeRect {
            x: 0.0,
            y: 0.0,
            width: 0.5,
            height: 1.0,
        },
        LayerEyeRect {
            x: 0.5,
            y: 0.0,
            width: 0.5,
            height: 1.0,
        },
    )
}

/// Writes a primary layer directly into the region, bypassing the
/// producer session's ordering guards (for stale/duplicate scenarios).
fn publish_raw(region: &SharedRegion, input_frame_id: u64, frame_id: u64, texture_handle: u64) {
    let (left, right) = half_rects();
    let mut slot = region.lock_browser();
    let mut state = slot.snapshot();
    state.layers[0] = LayerState {
        frame_id,
        input_frame_id,
        texture_handle,
        kind: LayerKind::StereoImmersive as u32,
        left_eye_rect: left,
        right_eye_rect: right,
        ..LayerState::default()
    };
    slot.store(&state);
    slot.notify();
}

/// Spawns a producer thread that fulfills every new request until `stop`
/// is set. The texture handle encodes the request id for assertions.
fn spawn_echo_producer(
    region: Arc<SharedRegion>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut producer = ProducerSession::attach(region).expect("layout must match");
        let (left, right) = half_rects();
        let mut fulfilled = None;
        while !stop.load(Ordering::Acquire) {
            let system = producer.wait_for_request(Some(Duration::from_millis(2)));
            let request = system.sensor.input_frame_id;
            if fulfilled == Some(request) {
                continue;
            }
            let submission = FrameSubmission {
                texture_handle: 100 + request,
                left_eye_rect: left,
                right_eye_rect: right,
            };
            if producer.submit_frame(request, &submission).is_ok() {
                fulfilled = Some(request);
            }
        }
    })
}

#[test]
fn test_first_request_round_trip() {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), test_config()).expect("layout must match");
    assert_eq!(presenter.input_frame_id(), 0);

    let producer_region = Arc::clone(&region);
    let producer_thread = thread::spawn(move || {
        let mut producer = ProducerSession::attach(producer_region).expect("layout must match");
        let system = producer.wait_for_request(Some(Duration::from_millis(50)));
        assert_eq!(system.sensor.input_frame_id, 0);
        let (left, right) = half_rects();
        let submission = FrameSubmission {
            texture_handle: 42,
            left_eye_rect: left,
            right_eye_rect: right,
        };
        producer.submit_frame(0, &submission).expect("first fulfillment")
    });

    let head = Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0));
    let result = presenter.request_frame(&head).expect("producer is alive");
    let frame_id = producer_thread.join().expect("producer thread");

    assert_eq!(frame_id, 1);
    assert_eq!(result.surface_handle, 42);
    assert_eq!(result.left_eye.width, 0.5);
    assert_eq!(result.right_eye.x, 0.5);
    assert_eq!(presenter.input_frame_id(), 1);
    assert_eq!(presenter.last_submitted_frame_id(), 1);
    assert!(presenter.is_presenting());
}

#[test]
fn test_stale_acknowledgment_is_ignored() {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), test_config()).expect("layout must match");

    let raw_region = Arc::clone(&region);
    let writer = thread::spawn(move || {
        // Acknowledge request 0.
        publish_raw(&raw_region, 0, 1, 7);
        // Wait until request 1 is published...
        while raw_region.lock_system().snapshot().sensor.input_frame_id != 1 {
            thread::sleep(Duration::from_millis(1));
        }
        // ...then publish a stale acknowledgment followed by the real one.
        publish_raw(&raw_region, 0, 1, 7);
        thread::sleep(Duration::from_millis(10));
        publish_raw(&raw_region, 1, 2, 8);
    });

    let first = presenter.request_frame(&Mat4::IDENTITY).expect("ack for 0");
    assert_eq!(first.surface_handle, 7);

    // The stale input_frame_id = 0 acknowledgment must be looped past.
    let second = presenter.request_frame(&Mat4::IDENTITY).expect("ack for 1");
    assert_eq!(second.surface_handle, 8);
    assert_eq!(presenter.last_submitted_frame_id(), 2);
    assert_eq!(presenter.input_frame_id(), 2);

    writer.join().expect("writer thread");
}

#[test]
fn test_frame_ids_monotonic_across_many_requests() {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), test_config()).expect("layout must match");

    let stop = Arc::new(AtomicBool::new(false));
    let producer_thread = spawn_echo_producer(Arc::clone(&region), Arc::clone(&stop));

    let mut last_frame_id = 0;
    for request in 0..10 {
        let head = Mat4::from_rotation_y(request as f32 * 0.1);
        let result = presenter.request_frame(&head).expect("producer is alive");
        assert_eq!(result.surface_handle, 100 + request);

        // input_frame_id increases by exactly one per completed request.
        assert_eq!(presenter.input_frame_id(), request + 1);
        // frame ids never regress.
        assert!(presenter.last_submitted_frame_id() >= last_frame_id);
        last_frame_id = presenter.last_submitted_frame_id();
    }

    stop.store(true, Ordering::Release);
    producer_thread.join().expect("producer thread");
}

#[test]
fn test_pulled_snapshot_is_isolated_from_later_writes() {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), test_config()).expect("layout must match");

    publish_raw(&region, 0, 3, 10);
    presenter.pull_browser_state();
    assert_eq!(presenter.frame_result().surface_handle, 10);

    // Overwrite the shared slot; the mirror must keep the old values.
    publish_raw(&region, 1, 4, 20);
    assert_eq!(presenter.frame_result().surface_handle, 10);
    assert!(presenter.is_presenting());

    presenter.pull_browser_state();
    assert_eq!(presenter.frame_result().surface_handle, 20);
}

#[test]
fn test_unresponsive_producer_then_recovery() {
    let region = SharedRegion::new();
    let config = HandshakeConfig {
        wait_interval_ms: 5,
        missed_cycle_limit: Some(2),
    };
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), config).expect("layout must match");

    // Nobody is fulfilling: the bounded wait gives up...
    let err = presenter.request_frame(&Mat4::IDENTITY).unwrap_err();
    assert_eq!(err, BridgeError::ProducerUnresponsive { missed_cycles: 2 });
    assert_eq!(presenter.input_frame_id(), 0);

    // ...and the same request id is re-issued once a producer appears.
    let stop = Arc::new(AtomicBool::new(false));
    let producer_thread = spawn_echo_producer(Arc::clone(&region), Arc::clone(&stop));
    let result = presenter.request_frame(&Mat4::IDENTITY).expect("recovered");
    assert_eq!(result.surface_handle, 100);
    assert_eq!(presenter.input_frame_id(), 1);

    stop.store(true, Ordering::Release);
    producer_thread.join().expect("producer thread");
}

#[test]
fn test_presentation_end_wakes_blocked_request() {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), test_config()).expect("layout must match");

    let producer_region = Arc::clone(&region);
    let producer_thread = thread::spawn(move || {
        let mut producer = ProducerSession::attach(producer_region).expect("layout must match");
        let system = producer.wait_for_request(Some(Duration::from_millis(50)));
        producer.end_presentation(system.sensor.input_frame_id);
    });

    // The request completes with an idle layer rather than hanging.
    let result = presenter.request_frame(&Mat4::IDENTITY).expect("mode change");
    assert_eq!(result.surface_handle, 0);
    assert!(!presenter.is_presenting());

    producer_thread.join().expect("producer thread");
}

#[test]
fn test_stop_presenting_generation_is_visible_to_producer() {
    let region = SharedRegion::new();
    let mut presenter =
        PresenterSession::new(Arc::clone(&region), test_config()).expect("layout must match");
    let producer = ProducerSession::attach(Arc::clone(&region)).expect("layout must match");

    assert_eq!(
        producer.pull_system_state().display.presenting_generation,
        0
    );
    presenter.stop_presenting();
    assert_eq!(
        producer.pull_system_state().display.presenting_generation,
        1
    );
}
