/// Tolerance for comparing rendered samples and gains in tests.
pub const AUDIO_SAMPLE_EPSILON: f32 = 1e-6;

/// Fade length used when a caller gives none, in seconds.
pub const DEFAULT_FADE_LENGTH: f64 = 1.0;
/// Ceiling volume for the fade-in shorthands.
pub const DEFAULT_FADED_IN_VOLUME: f32 = 1.0;

pub const MIN_FADE_LENGTH: f64 = 0.01;
pub const MAX_FADE_LENGTH: f64 = 5.0;
pub const MIN_FADED_IN_VOLUME: f32 = 0.01;
pub const MAX_FADED_IN_VOLUME: f32 = 1.0;

/// Capacity of each controller's command ring into the scheduler.
pub const SCHEDULER_COMMAND_CAPACITY: usize = 32;
