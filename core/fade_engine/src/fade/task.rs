use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::debug;

use crate::{
    channel::{AudioChannel, SharedChannel},
    scheduler::task::{Task, TaskId, TaskStatus},
};

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The controller's view of a running fade.
#[derive(Debug, Clone)]
pub struct FadeHandle {
    id: TaskId,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl FadeHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Stops the fade before its next tick. Volume already written stays.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }
}

/// One linear volume ramp from `start_volume` to `target_volume`.
pub struct FadeTask<C: AudioChannel> {
    id: TaskId,
    channel: SharedChannel<C>,
    start_volume: f32,
    target_volume: f32,
    /// seconds, always > 0
    duration: f64,
    /// pause the channel once a fade to silence lands
    change_play_status: bool,
    elapsed: f64,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl<C: AudioChannel> FadeTask<C> {
    pub fn new(
        channel: SharedChannel<C>,
        start_volume: f32,
        target_volume: f32,
        duration: f64,
        change_play_status: bool,
    ) -> Self {
        Self {
            id: TaskId::new(),
            channel,
            start_volume,
            target_volume,
            duration,
            change_play_status,
            elapsed: 0.0,
            cancelled: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> FadeHandle {
        FadeHandle {
            id: self.id,
            cancelled: Arc::clone(&self.cancelled),
            finished: Arc::clone(&self.finished),
        }
    }
}

impl<C: AudioChannel + 'static> Task for FadeTask<C> {
    fn id(&self) -> TaskId {
        self.id
    }

    fn tick(&mut self, delta: f64) -> TaskStatus {
        // The controller flips `cancelled` while holding this lock, so a
        // superseded fade never writes after its replacement has started.
        let mut channel = self.channel.lock();
        if self.cancelled.load(Ordering::Acquire) {
            return TaskStatus::Cancelled;
        }

        self.elapsed += delta;

        if self.elapsed >= self.duration {
            channel.set_volume(self.target_volume);
            if self.change_play_status && self.target_volume == 0.0 {
                channel.pause();
            }
            self.finished.store(true, Ordering::Release);
            debug!("fade {} reached {}", self.id, self.target_volume);
            return TaskStatus::Finished;
        }

        let progress = (self.elapsed / self.duration).clamp(0.0, 1.0) as f32;
        channel.set_volume(lerp(self.start_volume, self.target_volume, progress));
        TaskStatus::Running
    }
}

impl<C: AudioChannel> fmt::Debug for FadeTask<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FadeTask")
            .field("id", &self.id)
            .field("start_volume", &self.start_volume)
            .field("target_volume", &self.target_volume)
            .field("duration", &self.duration)
            .field("change_play_status", &self.change_play_status)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::{gain::GainChannel, shared},
        constants::AUDIO_SAMPLE_EPSILON,
        track::constant::ConstantTrack,
    };

    fn channel_at(volume: f32) -> SharedChannel<GainChannel> {
        shared(GainChannel::new(
            Box::new(ConstantTrack::new(1.0, 1.0)),
            volume,
        ))
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(0.2, 0.8, 0.0), 0.2);
        assert!((lerp(0.2, 0.8, 1.0) - 0.8).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((lerp(1.0, 0.0, 0.5) - 0.5).abs() < AUDIO_SAMPLE_EPSILON);
    }

    #[test]
    fn test_tick_interpolates_then_lands_exactly() {
        let channel = channel_at(0.0);
        let mut task = FadeTask::new(Arc::clone(&channel), 0.0, 0.3, 1.0, false);

        // 0.1 accumulated ten times is not exactly 1.0
        let mut status = TaskStatus::Running;
        let mut ticks = 0;
        while status == TaskStatus::Running {
            status = task.tick(0.1);
            ticks += 1;
            assert!(channel.lock().volume() <= 0.3);
        }

        assert_eq!(status, TaskStatus::Finished);
        assert!((10..=11).contains(&ticks));
        assert_eq!(channel.lock().volume(), 0.3);
        assert!(task.handle().is_finished());
    }

    #[test]
    fn test_overshooting_tick_is_clamped_to_target() {
        let channel = channel_at(1.0);
        let mut task = FadeTask::new(Arc::clone(&channel), 1.0, 0.0, 1.0, false);

        assert_eq!(task.tick(0.6), TaskStatus::Running);
        assert_eq!(task.tick(5.0), TaskStatus::Finished);
        assert_eq!(channel.lock().volume(), 0.0);
    }

    #[test]
    fn test_cancelled_task_does_not_write() {
        let channel = channel_at(0.5);
        let mut task = FadeTask::new(Arc::clone(&channel), 0.5, 1.0, 1.0, false);
        let handle = task.handle();

        handle.cancel();
        assert!(!handle.is_active());
        assert_eq!(task.tick(0.5), TaskStatus::Cancelled);
        assert_eq!(channel.lock().volume(), 0.5);
    }

    #[test]
    fn test_fade_to_silence_pauses_only_with_play_status() {
        let channel = channel_at(1.0);
        channel.lock().play();

        let mut task = FadeTask::new(Arc::clone(&channel), 1.0, 0.0, 0.5, false);
        task.tick(1.0);
        assert!(channel.lock().is_playing());

        channel.lock().set_volume(1.0);
        let mut task = FadeTask::new(Arc::clone(&channel), 1.0, 0.0, 0.5, true);
        task.tick(1.0);
        assert!(!channel.lock().is_playing());
    }
}
