use thiserror::Error;

pub mod constant;
pub mod sinewave;
pub mod wav;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("failed to read WAV data: {0}")]
    Wav(#[from] hound::Error),

    #[error("only mono or stereo WAVs are supported, got {0} channels")]
    UnsupportedChannels(u16),
}

/// A track produces stereo audio frames (L, R)
pub trait Track
where
    Self: Send + std::fmt::Debug,
{
    fn name(&self) -> &str;

    fn fill_next_samples(&mut self, next_samples: &mut [(f32, f32)]);

    fn next_samples(&mut self, frame_size: usize) -> Vec<(f32, f32)> {
        let mut samples = vec![(0.0, 0.0); frame_size];
        self.fill_next_samples(&mut samples);
        samples
    }
}
