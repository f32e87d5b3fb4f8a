use std::io::Cursor;
use std::time::Duration;

use tokio::time::sleep;

use liveroom::audio::SampleSink;
use liveroom::recorder::{MediaRecorder, WavTrackRecorder};

#[tokio::test(start_paused = true)]
async fn finished_take_contains_every_pushed_sample() {
    let recorder = WavTrackRecorder::new(16_000, Duration::from_millis(1000));
    let mut sink = recorder.sink();

    recorder.start();
    sink.push(&[0.1f32; 1600]);

    // One chunk cadence passes, then more samples arrive; stop must flush
    // the final partial chunk too.
    sleep(Duration::from_millis(1100)).await;
    sink.push(&[0.2f32; 400]);
    recorder.stop();

    let recording = recorder.recording().expect("take should exist");
    assert_eq!(recording.mime_type, "audio/wav");

    let reader = hound::WavReader::new(Cursor::new(recording.data)).unwrap();
    assert_eq!(reader.spec().sample_rate, 16_000);
    assert_eq!(reader.len(), 2000);
}

#[tokio::test(start_paused = true)]
async fn samples_pushed_while_stopped_are_ignored() {
    let recorder = WavTrackRecorder::new(16_000, Duration::from_millis(1000));
    let mut sink = recorder.sink();

    sink.push(&[0.1f32; 800]);
    recorder.start();
    recorder.stop();

    assert!(recorder.recording().is_none());
}

#[tokio::test(start_paused = true)]
async fn restart_discards_the_previous_take() {
    let recorder = WavTrackRecorder::new(16_000, Duration::from_millis(1000));
    let mut sink = recorder.sink();

    recorder.start();
    sink.push(&[0.1f32; 500]);
    recorder.stop();
    assert!(recorder.recording().is_some());

    recorder.start();
    sink.push(&[0.2f32; 120]);
    recorder.stop();

    let recording = recorder.recording().unwrap();
    let reader = hound::WavReader::new(Cursor::new(recording.data)).unwrap();
    assert_eq!(reader.len(), 120);
}
