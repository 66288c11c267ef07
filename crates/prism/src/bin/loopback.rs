//! # Loopback Demo
//!
//! Runs the full handshake in one process: a producer thread renders
//! placeholder frames against an in-process shared region while the main
//! thread ticks a `PresenterLoop`.
//!
//! World ticks → producer enters presentation → immersive ticks →
//! producer leaves presentation → world ticks. Watch the tracing output.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use prism::{
    DisplayDescriptor, GestureEvent, PresenterLoop, PrismConfig, TickHooks, TickOutcome,
};
use prism_bridge::{FrameResult, FrameSubmission, HandshakeConfig, ProducerSession, SharedRegion};
use prism_shared::math::Mat4;

/// Immersive frames the producer renders before ending presentation.
const IMMERSIVE_FRAMES: u64 = 5;

/// Presenter ticks to run in total.
const PRESENTER_TICKS: u32 = 30;

struct LoggingHooks;

impl TickHooks for LoggingHooks {
    fn draw_world(&mut self) {
        tracing::info!("world frame");
    }

    fn draw_immersive(&mut self, frame: &FrameResult) {
        tracing::info!(surface = frame.surface_handle, "immersive frame");
    }

    fn on_first_presenting_frame(&mut self) {
        tracing::info!("first presenting frame: compositor would pause here");
    }

    fn on_gesture(&mut self, gesture: GestureEvent) {
        tracing::info!(?gesture, "gesture");
    }
}

fn run_producer(region: Arc<SharedRegion>) {
    let mut producer = ProducerSession::attach(region).expect("layout must match");

    // Give the presenter a few world ticks before entering presentation.
    thread::sleep(Duration::from_millis(30));
    let system = producer.pull_system_state();
    producer.begin_presentation(system.sensor.input_frame_id);

    let mut fulfilled = None;
    let mut rendered = 0;
    loop {
        let system = producer.wait_for_request(Some(Duration::from_millis(10)));
        let request = system.sensor.input_frame_id;
        if fulfilled == Some(request) {
            continue;
        }
        if rendered >= IMMERSIVE_FRAMES {
            producer.end_presentation(request);
            break;
        }
        let submission = FrameSubmission {
            texture_handle: 0x1000 + request,
            ..FrameSubmission::default()
        };
        if producer.submit_frame(request, &submission).is_ok() {
            fulfilled = Some(request);
            rendered += 1;
        }
    }
    tracing::info!(rendered, "producer done");
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let region = SharedRegion::new();
    let config = PrismConfig {
        handshake: HandshakeConfig {
            wait_interval_ms: 10,
            missed_cycle_limit: Some(50),
        },
        display: Some(DisplayDescriptor {
            name: "PRISM Loopback".to_owned(),
            ..DisplayDescriptor::default()
        }),
        ..PrismConfig::default()
    };
    let mut looper =
        PresenterLoop::new(Arc::clone(&region), &config).expect("freshly built region");

    let producer_region = Arc::clone(&region);
    let producer_thread = thread::spawn(move || run_producer(producer_region));

    let sender = looper.gesture_sender();
    sender.push(GestureEvent::SwipeLeft);
    sender.push(GestureEvent::SwipeRight);

    let mut hooks = LoggingHooks;
    let mut immersive_seen = 0u32;
    for tick in 0..PRESENTER_TICKS {
        let head = Mat4::from_rotation_y(tick as f32 * 0.05);
        match looper.tick(&head, &mut hooks) {
            Ok(TickOutcome::Immersive) => immersive_seen += 1,
            Ok(_) => {}
            Err(err) => {
                tracing::error!(%err, "tick failed");
                break;
            }
        }
        thread::sleep(Duration::from_millis(10));
    }

    producer_thread.join().expect("producer thread");
    tracing::info!(immersive_seen, "loopback complete");
}
