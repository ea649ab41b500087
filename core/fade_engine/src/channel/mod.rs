use std::sync::Arc;

use parking_lot::Mutex;

pub mod gain;

/// The output unit whose gain a fade controls.
///
/// Implementations do not validate volumes: whatever is written is what gets
/// applied. `pause` must retain the playback position so `play` resumes.
pub trait AudioChannel: Send {
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;
}

/// A channel handle shared between its owner, a fade controller and the
/// controller's running fade task.
pub type SharedChannel<C> = Arc<Mutex<C>>;

pub fn shared<C: AudioChannel>(channel: C) -> SharedChannel<C> {
    Arc::new(Mutex::new(channel))
}
