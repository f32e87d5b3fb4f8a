use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use super::SampleSink;

/// Microphone adapter. Opens the default input device and forwards mono
/// f32 samples to every sink from the audio callback. The callback only
/// copies; buffering and timing live in the capture graph.
pub struct MicCapture {
    _stream: cpal::Stream,
    pub sample_rate: u32,
}

impl MicCapture {
    /// Sample rate the default input device would capture at, without
    /// opening a stream. Lets callers size the graph before starting it.
    pub fn default_sample_rate() -> Result<u32, anyhow::Error> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow::anyhow!("no input device available"))?;
        Ok(device.default_input_config()?.sample_rate().0)
    }

    pub fn open(mut sinks: Vec<Box<dyn SampleSink>>) -> Result<Self, anyhow::Error> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow::anyhow!("no input device available"))?;

        info!("audio input device: {}", device.name().unwrap_or_default());

        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;

        info!(
            "capture config: rate={}Hz channels={} format={:?}",
            sample_rate,
            channels,
            supported.sample_format()
        );

        let err_fn = |err| error!("input stream error: {}", err);
        let mut scratch: Vec<f32> = Vec::new();

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &supported.into(),
                move |data: &[f32], _: &_| {
                    // Channel 0 only; the graph expects mono.
                    scratch.clear();
                    scratch.extend(data.iter().step_by(channels.max(1)));
                    for sink in sinks.iter_mut() {
                        sink.push(&scratch);
                    }
                },
                err_fn,
                None,
            )?,
            cpal::SampleFormat::I16 => device.build_input_stream(
                &supported.into(),
                move |data: &[i16], _: &_| {
                    scratch.clear();
                    scratch.extend(
                        data.iter()
                            .step_by(channels.max(1))
                            .map(|&s| s as f32 / i16::MAX as f32),
                    );
                    for sink in sinks.iter_mut() {
                        sink.push(&scratch);
                    }
                },
                err_fn,
                None,
            )?,
            other => return Err(anyhow::anyhow!("unsupported sample format: {:?}", other)),
        };

        stream.play()?;

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }
}
