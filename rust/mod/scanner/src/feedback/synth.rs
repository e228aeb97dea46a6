use std::sync::mpsc;
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, StreamConfig};

use super::{Tone, ToneSink};
use crate::error::AudioError;

/// Sine tones on the default output device.
///
/// cpal streams are not `Send`, so a dedicated thread owns the device and
/// plays queued tones one after another.
pub struct SineTone {
    tx: mpsc::Sender<Tone>,
}

impl SineTone {
    pub fn open() -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<Tone>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);

        thread::Builder::new()
            .name("umscan-audio".into())
            .spawn(move || {
                let (device, config) = match output_device() {
                    Ok(found) => {
                        let _ = ready_tx.send(Ok(()));
                        found
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                for tone in rx {
                    if let Err(e) = play(&device, &config, tone) {
                        tracing::debug!(tone = %tone, "tone skipped: {}", e);
                    }
                }
            })
            .map_err(|e| AudioError::Thread(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| AudioError::Thread("exited before opening the device".into()))??;
        Ok(Self { tx })
    }
}

impl ToneSink for SineTone {
    fn play(&self, tone: Tone) {
        let _ = self.tx.send(tone);
    }
}

fn output_device() -> Result<(Device, StreamConfig), AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let supported = device
        .default_output_config()
        .map_err(|e| AudioError::Device(e.to_string()))?;
    if supported.sample_format() != SampleFormat::F32 {
        return Err(AudioError::UnsupportedFormat(format!("{:?}", supported.sample_format())));
    }
    Ok((device, supported.into()))
}

fn play(device: &Device, config: &StreamConfig, tone: Tone) -> Result<(), AudioError> {
    let rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let freq = tone.frequency();
    let total = (rate * tone.duration().as_secs_f32()) as usize;
    let mut n = 0usize;

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = if n < total {
                        // Short linear fade at both ends avoids clicks.
                        let fade = (n.min(total - n) as f32 / (rate * 0.01)).min(1.0);
                        (n as f32 * freq * std::f32::consts::TAU / rate).sin() * 0.2 * fade
                    } else {
                        0.0
                    };
                    n += 1;
                    for s in frame.iter_mut() {
                        *s = sample;
                    }
                }
            },
            |e| tracing::debug!("audio stream error: {}", e),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))?;
    stream.play().map_err(|e| AudioError::Stream(e.to_string()))?;
    thread::sleep(tone.duration());
    Ok(())
}
