use std::io::Cursor;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use liveroom::audio::graph::{AudioGraph, CaptureConfig, GraphError};
use liveroom::audio::{EncodedClip, SampleSink};

fn test_graph() -> (AudioGraph, mpsc::UnboundedReceiver<EncodedClip>) {
    let graph = AudioGraph::new(CaptureConfig {
        sample_rate: 16_000,
        window: Duration::from_millis(4000),
    });
    let (tx, rx) = mpsc::unbounded_channel();
    graph.set_dispatch(move |clip| {
        let _ = tx.send(clip);
    });
    (graph, rx)
}

#[tokio::test(start_paused = true)]
async fn empty_windows_are_skipped() {
    let (mut graph, mut rx) = test_graph();
    let _sink = graph.start().unwrap();

    // Two full windows with no samples: nothing must be dispatched.
    sleep(Duration::from_millis(8100)).await;
    assert!(rx.try_recv().is_err());

    graph.stop();
}

#[tokio::test(start_paused = true)]
async fn buffered_frames_flush_as_one_window() {
    let (mut graph, mut rx) = test_graph();
    let mut sink = graph.start().unwrap();

    sink.push(&[0.1f32; 1000]);
    sink.push(&[0.2f32; 600]);

    sleep(Duration::from_millis(4100)).await;

    let clip = rx.try_recv().expect("window should have flushed");
    assert_eq!(clip.mime_type, "audio/wav");

    let reader = hound::WavReader::new(Cursor::new(clip.data)).unwrap();
    assert_eq!(reader.spec().sample_rate, 16_000);
    assert_eq!(reader.len(), 1600);

    // The buffer was drained: the next window has nothing to flush.
    sleep(Duration::from_millis(4000)).await;
    assert!(rx.try_recv().is_err());

    graph.stop();
}

#[tokio::test(start_paused = true)]
async fn starting_twice_is_rejected() {
    let (mut graph, _rx) = test_graph();
    let _sink = graph.start().unwrap();
    assert!(graph.is_running());

    assert!(matches!(graph.start(), Err(GraphError::AlreadyRunning)));
    assert!(graph.is_running());

    graph.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_silences_dispatch() {
    let (mut graph, mut rx) = test_graph();
    let mut sink = graph.start().unwrap();

    sink.push(&[0.3f32; 100]);
    graph.stop();
    graph.stop();
    assert!(!graph.is_running());

    // Pending samples are discarded with the loop; no late flush.
    sleep(Duration::from_millis(9000)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn graph_restarts_after_stop() {
    let (mut graph, mut rx) = test_graph();
    let _sink = graph.start().unwrap();
    graph.stop();

    let mut sink = graph.start().unwrap();
    sink.push(&[0.4f32; 50]);
    sleep(Duration::from_millis(4100)).await;

    let clip = rx.try_recv().expect("restarted graph should flush");
    let reader = hound::WavReader::new(Cursor::new(clip.data)).unwrap();
    assert_eq!(reader.len(), 50);

    graph.stop();
}

#[tokio::test(start_paused = true)]
async fn dispatch_can_be_swapped_while_running() {
    let graph = AudioGraph::new(CaptureConfig {
        sample_rate: 16_000,
        window: Duration::from_millis(4000),
    });
    let (first_tx, mut first_rx) = mpsc::unbounded_channel();
    graph.set_dispatch(move |clip| {
        let _ = first_tx.send(clip);
    });

    let mut graph = graph;
    let mut sink = graph.start().unwrap();

    sink.push(&[0.1f32; 10]);
    sleep(Duration::from_millis(4100)).await;
    assert!(first_rx.try_recv().is_ok());

    let (second_tx, mut second_rx) = mpsc::unbounded_channel();
    graph.set_dispatch(move |clip| {
        let _ = second_tx.send(clip);
    });

    sink.push(&[0.2f32; 10]);
    sleep(Duration::from_millis(4000)).await;
    assert!(second_rx.try_recv().is_ok());
    assert!(first_rx.try_recv().is_err());

    graph.stop();
}
