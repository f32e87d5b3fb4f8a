use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

pub const WAV_MIME: &str = "audio/wav";

/// Encode mono float samples as a standard RIFF/WAVE container: 44-byte
/// header, PCM, 1 channel, 16-bit little-endian. The comment-inference
/// endpoint sniffs the header, so the layout must stay canonical.
///
/// Samples outside [-1, 1] are saturated, not wrapped: -1.0 maps to -32768
/// and +1.0 to +32767.
pub fn encode(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).expect("in-memory wav writer cannot fail");
        for &sample in samples {
            writer
                .write_sample(sample_to_i16(sample))
                .expect("in-memory wav write cannot fail");
        }
        writer.finalize().expect("in-memory wav finalize cannot fail");
    }
    cursor.into_inner()
}

/// Asymmetric float-to-PCM conversion: negative values scale by 32768,
/// positive by 32767, so both rails are reachable.
fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::sample_to_i16;

    #[test]
    fn conversion_saturates_at_the_rails() {
        assert_eq!(sample_to_i16(1.0), i16::MAX);
        assert_eq!(sample_to_i16(-1.0), i16::MIN);
        assert_eq!(sample_to_i16(2.5), i16::MAX);
        assert_eq!(sample_to_i16(-7.0), i16::MIN);
        assert_eq!(sample_to_i16(0.0), 0);
    }
}
