use std::sync::Arc;
use std::time::Duration;

use liveroom::audio::capture::MicCapture;
use liveroom::audio::SampleSink;
use liveroom::config::SessionConfig;
use liveroom::recorder::{MediaRecorder, NullRecorder, WavTrackRecorder};
use liveroom::rng::ThreadRandom;
use liveroom::services::gemini::GeminiService;
use liveroom::services::voice::VoiceService;
use liveroom::services::{AgentFactory, CommentGenerator, Summarizer, SummaryStyle};
use liveroom::state::SharedState;
use liveroom::SessionController;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    tracing::info!("Liveroom console booting...");

    let mut config = SessionConfig::default();
    match MicCapture::default_sample_rate() {
        Ok(rate) => config.sample_rate = rate,
        Err(e) => tracing::warn!(error = %e, "could not probe input device, assuming default rate"),
    }

    let gemini = Arc::new(GeminiService::from_env());
    let voice = Arc::new(VoiceService::from_env());

    let audio_recorder = Arc::new(WavTrackRecorder::new(
        config.sample_rate,
        config.recorder_chunk,
    ));
    let recorder_sink = audio_recorder.sink();

    let mut controller = SessionController::new(
        config,
        gemini.clone() as Arc<dyn CommentGenerator>,
        gemini as Arc<dyn Summarizer>,
        voice as Arc<dyn AgentFactory>,
        Arc::new(NullRecorder),
        audio_recorder as Arc<dyn MediaRecorder>,
        Arc::new(ThreadRandom),
    );

    let frame_sink = controller.start()?;

    let _mic = match MicCapture::open(vec![
        Box::new(frame_sink) as Box<dyn SampleSink>,
        Box::new(recorder_sink),
    ]) {
        Ok(mic) => mic,
        Err(e) => {
            controller.capture_failed(&e.to_string());
            eprintln!("Cannot stream: {e}");
            return Ok(());
        }
    };

    let printer = tokio::spawn(print_feed(controller.state()));

    tracing::info!("Streaming. Press Ctrl+C to end the stream.");
    tokio::signal::ctrl_c().await?;

    controller.stop();
    printer.abort();

    println!("\n--- Stream ended, generating summary ---");
    let summary = controller.generate_summary(SummaryStyle::CasualBlogPost).await;
    println!("{summary}");

    Ok(())
}

/// Console stand-in for the chat panel: prints comments and raised hands
/// as they materialize.
async fn print_feed(state: SharedState) {
    let mut seen_comments = 0;
    let mut seen_hands = 0;

    loop {
        tokio::time::sleep(Duration::from_millis(250)).await;

        let session = state.lock().unwrap();
        for comment in session.comments.iter().skip(seen_comments) {
            let marker = if comment.is_question { "?" } else { " " };
            println!(
                "[{}]{} {}: {}",
                comment.timestamp.format("%H:%M:%S"),
                marker,
                comment.username,
                comment.text
            );
        }
        seen_comments = session.comments.len();

        if session.hands.len() > seen_hands {
            for hand in session.hands.iter().skip(seen_hands) {
                println!("  ** {} raised a hand: {}", hand.username, hand.reason);
            }
        }
        seen_hands = session.hands.len();

        if let Some(notice) = &session.notice {
            println!("  !! {notice}");
        }
    }
}
