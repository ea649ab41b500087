use std::{path::PathBuf, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use fade_engine::{
    channel::{gain::GainChannel, shared},
    config::FadeConfig,
    device_manager::{AudioDeviceManager, cpal_dm::CpalAudioDeviceManager},
    engine::Engine,
    fade::FadeController,
    scheduler::Scheduler,
    track::{Track, sinewave::SineWaveTrack, wav::WavTrack},
};
use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fades a channel in and out on the default output device
#[derive(Parser, Debug)]
#[command(name = "fade_engine")]
#[command(version)]
struct Args {
    /// TOML file with `default_fade_length` and `faded_in_volume`
    #[arg(short, long, default_value = "fade_engine.toml")]
    config: PathBuf,

    /// WAV file to play in a loop; a sine tone is used otherwise
    #[arg(short, long)]
    wav: Option<PathBuf>,

    /// Seconds to hold between fades
    #[arg(long, default_value_t = 2.0)]
    hold: f64,
}

fn wait(seconds: f64) {
    thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fade_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = FadeConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let mut manager = CpalAudioDeviceManager::new();
    let sample_rate = manager
        .output_sample_rate()
        .context("Failed to query output device")?;

    let track: Box<dyn Track> = match &args.wav {
        Some(path) => Box::new(
            WavTrack::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .with_looping(true),
        ),
        None => Box::new(SineWaveTrack::new(440.0, sample_rate as f32, 0.3)),
    };
    let channel = shared(GainChannel::new(track, 0.0));
    let mut scheduler = Scheduler::new(f64::from(sample_rate));
    let mut controller = FadeController::new(Arc::clone(&channel), config, scheduler.link());
    info!("playing {}", controller.channel().lock().name());

    manager
        .start_output_stream(Box::new(Engine::new(scheduler, channel)))
        .context("Failed to start audio stream")?;

    let fade = config.default_fade_length;

    info!("unpausing to {}", config.faded_in_volume);
    controller.unpause();
    wait(fade + args.hold);

    info!("fading to half volume");
    controller.fade_to(config.faded_in_volume * 0.5, false);
    wait(fade + args.hold);

    info!("pausing");
    controller.pause();
    wait(fade + 0.1);

    Ok(())
}
