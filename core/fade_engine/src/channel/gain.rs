use crate::{channel::AudioChannel, track::Track};

/// A playable channel that applies a single gain to a stereo track.
#[derive(Debug)]
pub struct GainChannel {
    inner: Box<dyn Track>,
    /// Multiplies every frame (0.0 to 1.0, not enforced)
    volume: f32,
    playing: bool,
}

impl GainChannel {
    /// Creates a paused channel.
    pub fn new(inner: Box<dyn Track>, volume: f32) -> Self {
        Self {
            inner,
            volume,
            playing: false,
        }
    }

    /// Name of the track being played.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Renders the next frames. A paused channel outputs silence and does not
    /// advance its track.
    pub fn fill_next_samples(&mut self, next_samples: &mut [(f32, f32)]) {
        if !self.playing {
            next_samples.fill((0.0, 0.0));
            return;
        }

        self.inner.fill_next_samples(next_samples);

        for (l, r) in next_samples.iter_mut() {
            *l *= self.volume;
            *r *= self.volume;
        }
    }

    #[cfg(test)]
    pub(crate) fn next_samples(&mut self, frame_size: usize) -> Vec<(f32, f32)> {
        let mut samples = vec![(0.0, 0.0); frame_size];
        self.fill_next_samples(&mut samples);
        samples
    }
}

impl AudioChannel for GainChannel {
    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::AUDIO_SAMPLE_EPSILON,
        track::{constant::ConstantTrack, wav::WavTrack},
    };

    #[test]
    fn test_new_channel_is_paused_and_silent() {
        let mut channel = GainChannel::new(Box::new(ConstantTrack::new(1.0, 1.0)), 1.0);
        assert!(!channel.is_playing());
        assert_eq!(channel.next_samples(2), vec![(0.0, 0.0); 2]);
    }

    #[test]
    fn test_full_volume_preserves_sample() {
        let mut channel = GainChannel::new(Box::new(ConstantTrack::new(0.4, -0.4)), 1.0);
        channel.play();
        assert_eq!(channel.next_samples(1), vec![(0.4, -0.4)]);
    }

    #[test]
    fn test_half_volume_halves_both_sides() {
        let mut channel = GainChannel::new(Box::new(ConstantTrack::new(1.0, 0.5)), 0.5);
        channel.play();
        let samples = channel.next_samples(1);
        assert!((samples[0].0 - 0.5).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((samples[0].1 - 0.25).abs() < AUDIO_SAMPLE_EPSILON);
    }

    #[test]
    fn test_volume_write_applies_on_next_render() {
        let mut channel = GainChannel::new(Box::new(ConstantTrack::new(1.0, 1.0)), 1.0);
        channel.play();
        channel.set_volume(0.25);
        assert_eq!(channel.volume(), 0.25);
        assert_eq!(channel.next_samples(1), vec![(0.25, 0.25)]);
    }

    #[test]
    fn test_pause_retains_position() {
        let wav = WavTrack::from_raw_samples(vec![(1.0, 1.0), (0.5, 0.5), (0.25, 0.25)]);
        let mut channel = GainChannel::new(Box::new(wav), 1.0);
        channel.play();

        assert_eq!(channel.next_samples(1), vec![(1.0, 1.0)]);
        channel.pause();
        assert_eq!(channel.next_samples(1), vec![(0.0, 0.0)]);
        channel.play();
        assert_eq!(channel.next_samples(1), vec![(0.5, 0.5)]);
    }
}
