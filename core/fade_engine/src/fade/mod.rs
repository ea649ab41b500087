//! Volume fades for a single channel.
//!
//! A [`FadeController`] turns fade requests into [`FadeTask`]s that a
//! [`Scheduler`](crate::scheduler::Scheduler) ticks once per update cycle.
//! At most one task per controller is alive: every request cancels the
//! previous one first, and the channel keeps whatever volume it had reached.

use std::sync::Arc;

use log::{debug, warn};

use crate::{
    channel::{AudioChannel, SharedChannel},
    config::FadeConfig,
    scheduler::{SchedulerLink, command::SchedulerCommand},
};

pub mod task;

pub use task::{FadeHandle, FadeTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Idle,
    Fading,
}

pub struct FadeController<C: AudioChannel + 'static> {
    channel: SharedChannel<C>,
    config: FadeConfig,
    link: SchedulerLink,
    active_fade: Option<FadeHandle>,
}

impl<C: AudioChannel + 'static> FadeController<C> {
    pub fn new(channel: SharedChannel<C>, config: FadeConfig, link: SchedulerLink) -> Self {
        Self {
            channel,
            config,
            link,
            active_fade: None,
        }
    }

    pub fn channel(&self) -> &SharedChannel<C> {
        &self.channel
    }

    pub fn config(&self) -> FadeConfig {
        self.config
    }

    /// Replaces the tunables. A fade already running keeps its parameters.
    pub fn set_config(&mut self, config: FadeConfig) {
        self.config = config;
    }

    pub fn state(&self) -> FadeState {
        if self.is_fading() {
            FadeState::Fading
        } else {
            FadeState::Idle
        }
    }

    pub fn is_fading(&self) -> bool {
        self.active_fade.as_ref().is_some_and(FadeHandle::is_active)
    }

    pub fn fade_in(&mut self) {
        self.fade_in_over(self.config.default_fade_length);
    }

    pub fn fade_in_over(&mut self, duration: f64) {
        self.fade_to_over(self.config.faded_in_volume, duration, false);
    }

    /// Starts playback if the channel is silent, then fades in.
    pub fn unpause(&mut self) {
        self.unpause_over(self.config.default_fade_length);
    }

    pub fn unpause_over(&mut self, duration: f64) {
        self.fade_to_over(self.config.faded_in_volume, duration, true);
    }

    pub fn fade_out(&mut self) {
        self.fade_out_over(self.config.default_fade_length);
    }

    pub fn fade_out_over(&mut self, duration: f64) {
        self.fade_to_over(0.0, duration, false);
    }

    /// Fades to silence, then pauses playback.
    pub fn pause(&mut self) {
        self.pause_over(self.config.default_fade_length);
    }

    pub fn pause_over(&mut self, duration: f64) {
        self.fade_to_over(0.0, duration, true);
    }

    pub fn fade_to(&mut self, target: f32, change_play_status: bool) {
        self.fade_to_over(target, self.config.default_fade_length, change_play_status);
    }

    /// Fades from the current volume to `target` over `duration` seconds.
    ///
    /// A non-positive duration is replaced by the configured default. `target`
    /// is passed through to the channel as is. With `change_play_status`,
    /// playback starts right away when the channel is silent and stops once a
    /// fade to zero lands.
    pub fn fade_to_over(&mut self, target: f32, duration: f64, change_play_status: bool) {
        let shared = Arc::clone(&self.channel);
        let mut channel = shared.lock();
        self.supersede();

        let duration = if duration > 0.0 {
            duration
        } else {
            warn!(
                "fade duration {duration} must be positive, using {}",
                self.config.default_fade_length
            );
            self.config.default_fade_length
        };

        if !self.link.is_running() {
            warn!("no update loop is running, ignoring fade to {target}");
            return;
        }

        let start_volume = channel.volume();
        let task = FadeTask::new(
            Arc::clone(&shared),
            start_volume,
            target,
            duration,
            change_play_status,
        );
        let handle = task.handle();

        // the task cannot tick before the lock is released, so play()
        // below still precedes its first volume write
        self.link.send(SchedulerCommand::Spawn(Box::new(task)));

        if change_play_status && start_volume == 0.0 {
            channel.play();
        }

        debug!(
            "fade {} started: {start_volume} -> {target} over {duration}s",
            handle.id()
        );
        self.active_fade = Some(handle);
    }

    /// Stops the running fade, leaving the volume where it is.
    pub fn cancel(&mut self) {
        let shared = Arc::clone(&self.channel);
        let _channel = shared.lock();
        self.supersede();
    }

    /// Must be called with the channel lock held.
    fn supersede(&mut self) {
        let Some(handle) = self.active_fade.take() else {
            return;
        };
        if !handle.is_active() {
            return;
        }

        // the scheduler drops the task on its next tick
        handle.cancel();
        debug!("fade {} cancelled", handle.id());
    }
}

impl<C: AudioChannel + 'static> Drop for FadeController<C> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<C: AudioChannel + 'static> std::fmt::Debug for FadeController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FadeController")
            .field("config", &self.config)
            .field("link", &self.link)
            .field("active_fade", &self.active_fade)
            .finish_non_exhaustive()
    }
}
