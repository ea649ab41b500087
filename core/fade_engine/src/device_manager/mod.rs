use thiserror::Error;

pub mod cpal_dm;

#[derive(Error, Clone, Debug)]
pub enum AudioDeviceError {
    #[error("no output device found")]
    DeviceNotFound,
    #[error("failed to build output stream: {0}")]
    StreamBuildFailed(String),
    #[error("failed to start output stream: {0}")]
    StreamStartFailed(String),
}

/// Output buffer handed over by the device, in its native sample format.
#[derive(Debug)]
pub enum AudioSourceBufferKind<'a> {
    F32(&'a mut [f32]),
    I16(&'a mut [i16]),
    U16(&'a mut [u16]),
}

/// Anything that can fill an interleaved device buffer.
pub trait AudioSource: Send {
    fn fill_buffer(&mut self, buffer: AudioSourceBufferKind<'_>, channels: usize);
}

pub trait AudioDeviceManager {
    fn start_output_stream(
        &mut self,
        audio_source: Box<dyn AudioSource>,
    ) -> Result<(), AudioDeviceError>;
}
