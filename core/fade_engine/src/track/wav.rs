use std::{io::Read, path::Path};

use hound::WavReader;

use crate::track::{Track, TrackError};

/// `WavTrack` represents an in-memory, stereo-normalized PCM buffer loaded from a `.wav` file.
///
/// Supports:
/// - Mono and Stereo files (mono is duplicated into both channels)
/// - 16-bit integer or 32-bit float samples (converted to `f32`)
///
/// Does NOT support:
/// - More than 2 channels
/// - Sample rates ≠ output sample rate (no resampling)
///
/// # Example
/// ```no_run
/// use fade_engine::track::wav::WavTrack;
///
/// let track = WavTrack::from_file("assets/wav/piano.wav").unwrap();
/// ```
#[derive(Debug)]
pub struct WavTrack {
    /// file name
    name: String,
    /// Stereo frames
    samples: Vec<(f32, f32)>,
    /// Current read position (frame index)
    position: usize,
    /// Wrap back to the first frame at end of file
    looping: bool,
}

impl WavTrack {
    fn from_reader<R: Read>(reader: WavReader<R>, name: &str) -> Result<Self, TrackError> {
        let channels = reader.spec().channels;
        if channels == 0 || channels > 2 {
            return Err(TrackError::UnsupportedChannels(channels));
        }

        let samples = Self::decode_pcm_samples(reader)?;
        Ok(Self {
            name: name.to_owned(),
            samples,
            position: 0,
            looping: false,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| "untitled.wav".to_owned(), |n| n.to_string_lossy().into_owned());
        let reader = WavReader::open(path)?;
        Self::from_reader(reader, &name)
    }

    pub fn from_stream<R: Read>(stream: R) -> Result<Self, TrackError> {
        let reader = WavReader::new(stream)?;
        Self::from_reader(reader, "stream")
    }

    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    fn decode_pcm_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<(f32, f32)>, TrackError> {
        let spec = reader.spec();
        let raw_samples = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .into_samples::<i16>()
                .map(|s| s.map(|s| f32::from(s) / f32::from(i16::MAX)))
                .collect::<Result<Vec<f32>, _>>()?,
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()?,
        };

        Ok(Self::interleave_channels(raw_samples, spec.channels))
    }

    /// Converts raw f32 samples into stereo `(L, R)` frames.
    /// Mono is duplicated into both channels.
    fn interleave_channels(samples: Vec<f32>, channels: u16) -> Vec<(f32, f32)> {
        if channels == 1 {
            samples.into_iter().map(|s| (s, s)).collect()
        } else {
            samples
                .chunks_exact(2)
                .map(|chunk| (chunk[0], chunk[1]))
                .collect()
        }
    }

    #[cfg(test)]
    pub fn from_raw_samples(samples: Vec<(f32, f32)>) -> Self {
        Self {
            name: "raw-samples.wav".to_owned(),
            samples,
            position: 0,
            looping: false,
        }
    }
}

impl Track for WavTrack {
    fn name(&self) -> &str {
        &self.name
    }

    fn fill_next_samples(&mut self, next_samples: &mut [(f32, f32)]) {
        let mut written = 0;
        while written < next_samples.len() {
            if self.position >= self.samples.len() {
                if !self.looping || self.samples.is_empty() {
                    break;
                }
                self.position = 0;
            }

            let count = (next_samples.len() - written).min(self.samples.len() - self.position);
            next_samples[written..written + count]
                .copy_from_slice(&self.samples[self.position..self.position + count]);
            self.position += count;
            written += count;
        }

        next_samples[written..].fill((0.0, 0.0));
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::AUDIO_SAMPLE_EPSILON;

    use super::*;
    use hound::WavSpec;
    use std::io::Cursor;

    fn create_wav_buffer(spec: WavSpec, samples: &[i16]) -> Cursor<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        buffer.set_position(0);
        buffer
    }

    fn spec_with_channels(channels: u16) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn test_mono_wav_expands_to_stereo() {
        let buffer = create_wav_buffer(spec_with_channels(1), &[1000, -1000]);
        let mut track = WavTrack::from_stream(buffer).unwrap();

        let output = track.next_samples(2);
        assert_eq!(output.len(), 2);
        assert!((output[0].0 - output[0].1).abs() < AUDIO_SAMPLE_EPSILON); // L = R
        assert!((output[1].0 - output[1].1).abs() < AUDIO_SAMPLE_EPSILON);
        assert!(output[0].0 > 0.0 && output[1].0 < 0.0);
    }

    #[test]
    fn test_stereo_wav_keeps_channels_apart() {
        let buffer = create_wav_buffer(spec_with_channels(2), &[i16::MAX, 0]);
        let mut track = WavTrack::from_stream(buffer).unwrap();

        let output = track.next_samples(2);
        assert!((output[0].0 - 1.0).abs() < AUDIO_SAMPLE_EPSILON);
        assert_eq!(output[0].1, 0.0);
        assert_eq!(output[1], (0.0, 0.0)); // one frame only
    }

    #[test]
    fn test_returns_silence_after_end_of_file() {
        let buffer = create_wav_buffer(spec_with_channels(1), &[2000]);
        let mut track = WavTrack::from_stream(buffer).unwrap();

        let output = track.next_samples(3); // request more than exists
        assert_eq!(output.len(), 3);
        assert_ne!(output[0], (0.0, 0.0)); // actual sample
        assert_eq!(output[1], (0.0, 0.0)); // padded silence
        assert_eq!(output[2], (0.0, 0.0));
    }

    #[test]
    fn test_looping_wraps_to_start() {
        let mut track =
            WavTrack::from_raw_samples(vec![(1.0, 1.0), (0.5, 0.5)]).with_looping(true);

        let output = track.next_samples(5);
        assert_eq!(
            output,
            vec![(1.0, 1.0), (0.5, 0.5), (1.0, 1.0), (0.5, 0.5), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_invalid_channels_should_fail() {
        let buffer = create_wav_buffer(spec_with_channels(3), &[0; 6]);
        let result = WavTrack::from_stream(buffer);
        assert!(matches!(result, Err(TrackError::UnsupportedChannels(3))));
    }
}
