use super::AudioDeviceManager;
use crate::device_manager::{AudioDeviceError, AudioSource, AudioSourceBufferKind};
use cpal::{
    OutputCallbackInfo,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use log::{error, info};

pub struct CpalAudioDeviceManager {
    stream: Option<cpal::Stream>,
}

impl CpalAudioDeviceManager {
    pub fn new() -> Self {
        Self { stream: None }
    }

    fn default_device() -> Result<cpal::Device, AudioDeviceError> {
        cpal::default_host()
            .default_output_device()
            .ok_or(AudioDeviceError::DeviceNotFound)
    }

    /// Sample rate the default output device will run at.
    pub fn output_sample_rate(&self) -> Result<u32, AudioDeviceError> {
        let config = Self::default_device()?
            .default_output_config()
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;
        Ok(config.sample_rate().0)
    }

    fn build_output_stream<T, C>(
        device: &cpal::Device,
        config: cpal::SupportedStreamConfig,
        mut cb: C,
    ) -> Result<cpal::Stream, AudioDeviceError>
    where
        T: cpal::SizedSample,
        C: FnMut(&mut [T], usize) + Send + 'static,
    {
        let error_cb = move |err| {
            error!("stream error: {err}");
        };

        let channels = config.channels() as usize;
        let data_cb = move |data: &mut [T], _: &OutputCallbackInfo| {
            cb(data, channels);
        };

        device
            .build_output_stream(&config.into(), data_cb, error_cb, None)
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))
    }
}

impl Default for CpalAudioDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpalAudioDeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalAudioDeviceManager")
            .field("streaming", &self.stream.is_some())
            .finish()
    }
}

impl AudioDeviceManager for CpalAudioDeviceManager {
    fn start_output_stream(
        &mut self,
        mut audio_source: Box<dyn AudioSource>,
    ) -> Result<(), AudioDeviceError> {
        let device = Self::default_device()?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;

        info!(
            "opening output: {} Hz, {} channels, {}",
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_output_stream(&device, config, move |data, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::F32(data), channels);
                })?
            }
            cpal::SampleFormat::I16 => {
                Self::build_output_stream(&device, config, move |data, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::I16(data), channels);
                })?
            }
            cpal::SampleFormat::U16 => {
                Self::build_output_stream(&device, config, move |data, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::U16(data), channels);
                })?
            }
            format => {
                return Err(AudioDeviceError::StreamBuildFailed(format!(
                    "Unsupported sample format '{format}'"
                )));
            }
        };

        stream
            .play()
            .map_err(|e| AudioDeviceError::StreamStartFailed(e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }
}
