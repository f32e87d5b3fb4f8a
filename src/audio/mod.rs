pub mod capture;
pub mod graph;
pub mod wav;

use base64::engine::general_purpose;
use base64::Engine as _;

/// One window of microphone audio, encoded and ready for transport.
#[derive(Debug, Clone)]
pub struct EncodedClip {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
}

impl EncodedClip {
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            data: wav::encode(samples, sample_rate),
            mime_type: wav::WAV_MIME,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

/// Receives raw mono samples from the capture callback. Implementations
/// must only copy; the callback runs on the realtime audio thread.
pub trait SampleSink: Send {
    fn push(&mut self, samples: &[f32]);
}
