use cpal::Sample;

use crate::{
    channel::{SharedChannel, gain::GainChannel},
    device_manager::{AudioSource, AudioSourceBufferKind},
    scheduler::Scheduler,
};

/// Runs the update loop from the output callback: every buffer first ticks
/// the scheduler by the buffer's length, then renders the channel with the
/// volume it now has.
#[derive(Debug)]
pub struct Engine {
    scheduler: Scheduler,
    channel: SharedChannel<GainChannel>,
    /// scratch space reused across callbacks
    buffer: Vec<(f32, f32)>,
}

impl Engine {
    pub fn new(scheduler: Scheduler, channel: SharedChannel<GainChannel>) -> Self {
        Self {
            scheduler,
            channel,
            buffer: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn next_samples(&mut self, frame_size: usize) -> &[(f32, f32)] {
        self.scheduler.advance_frames(frame_size as u64);

        self.buffer.resize(frame_size, (0.0, 0.0));
        self.channel.lock().fill_next_samples(&mut self.buffer);
        &self.buffer
    }

    fn fill_interleaved<T>(data: &mut [T], frames: &[(f32, f32)], channels: usize)
    where
        T: cpal::FromSample<f32>,
    {
        for (frame, (l, r)) in data.chunks_mut(channels).zip(frames) {
            if let [only] = frame {
                *only = ((l + r) * 0.5).to_sample::<T>();
                continue;
            }
            for (i, sample) in frame.iter_mut().enumerate() {
                let raw_sample = match i {
                    0 => *l,
                    1 => *r,
                    _ => 0.0,
                };
                *sample = raw_sample.to_sample::<T>();
            }
        }
    }
}

impl AudioSource for Engine {
    fn fill_buffer(&mut self, buffer: AudioSourceBufferKind<'_>, channels: usize) {
        let channels = channels.max(1);

        match buffer {
            AudioSourceBufferKind::F32(data) => {
                let frames = self.next_samples(data.len() / channels);
                Self::fill_interleaved(data, frames, channels);
            }
            AudioSourceBufferKind::I16(data) => {
                let frames = self.next_samples(data.len() / channels);
                Self::fill_interleaved(data, frames, channels);
            }
            AudioSourceBufferKind::U16(data) => {
                let frames = self.next_samples(data.len() / channels);
                Self::fill_interleaved(data, frames, channels);
            }
        }
    }
}
