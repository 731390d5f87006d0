// Audio engine - cpal output stream for metronome clicks
//
// The callback is real-time: no allocation, no blocking locks, no I/O.
// Tone requests arrive over a lock-free ring buffer as absolute sample
// positions; the callback mixes pre-generated click buffers when their
// start sample comes due. Requests are fire-and-forget - once pushed they
// play out, so stopping playback means not scheduling new ones.
//
// The stream's preferred sample format is detected at startup (F32 is
// native; I16/U16 devices get converted via cpal's FromSample).

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer};

use crate::audio::click::{ClickSound, ClickType};
use crate::audio::timing::AudioTiming;
use crate::messaging::channels::{ClickConsumer, ClickProducer, ScheduledClick};
use crate::sequencer::scheduler::ToneSink;

/// Upper bound on simultaneously sounding clicks.
/// At 300 BPM with 16 subdivisions, pulses are 12.5 ms apart and clicks are
/// 50 ms long, so at most four or five overlap; 32 leaves generous headroom.
const MAX_CLICK_VOICES: usize = 32;

/// Audio engine errors - all fatal for the stream, none for the sequence data
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoDevice,

    #[error("failed to query the output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
}

/// Mixes pending click voices into mono frames
///
/// Owned by the audio callback. `add` drops requests beyond the voice cap
/// instead of growing, keeping the callback allocation-free.
struct ClickMixer {
    sound: ClickSound,
    voices: Vec<ScheduledClick>,
}

impl ClickMixer {
    fn new(sound: ClickSound) -> Self {
        Self {
            sound,
            voices: Vec::with_capacity(MAX_CLICK_VOICES),
        }
    }

    fn add(&mut self, request: ScheduledClick) {
        if self.voices.len() < MAX_CLICK_VOICES {
            self.voices.push(request);
        }
    }

    /// Mixed sample value at the given absolute sample position
    fn sample_at(&self, position: u64) -> f32 {
        let mut mixed = 0.0;
        for voice in &self.voices {
            if position >= voice.start_sample {
                let offset = (position - voice.start_sample) as usize;
                if let Some(sample) = self.sound.get(voice.click).get(offset) {
                    mixed += sample;
                }
            }
        }
        mixed.clamp(-1.0, 1.0)
    }

    /// Drop voices fully played out before `position`
    fn retire_before(&mut self, position: u64) {
        let click_len = self.sound.len_samples() as u64;
        self.voices
            .retain(|voice| voice.start_sample + click_len > position);
    }
}

/// cpal-backed audio engine
///
/// Keeps the stream alive and exposes the shared timing clock. The stream
/// is not Send on every platform, so the engine stays on the thread that
/// created it.
pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    timing: AudioTiming,
}

impl AudioEngine {
    pub fn new(click_rx: ClickConsumer) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let timing = AudioTiming::new(sample_rate);
        let mixer = ClickMixer::new(ClickSound::new(sample_rate));

        let stream = match sample_format {
            SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, channels, click_rx, timing.clone(), mixer)
            }
            SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, channels, click_rx, timing.clone(), mixer)
            }
            SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, channels, click_rx, timing.clone(), mixer)
            }
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        stream.play()?;

        Ok(Self {
            _device: device,
            _stream: stream,
            timing,
        })
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut click_rx: ClickConsumer,
        timing: AudioTiming,
        mut mixer: ClickMixer,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                while let Some(request) = click_rx.try_pop() {
                    mixer.add(request);
                }

                let block_start = timing.current_sample();
                let frames = data.len() / channels;

                for (frame_index, frame) in data.chunks_mut(channels).enumerate() {
                    let mixed = mixer.sample_at(block_start + frame_index as u64);
                    let value = T::from_sample(mixed);
                    for out in frame.iter_mut() {
                        *out = value;
                    }
                }

                mixer.retire_before(block_start + frames as u64);
                timing.advance(frames);
            },
            move |err| {
                eprintln!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }

    /// Shared clock in the stream's time base
    pub fn timing(&self) -> AudioTiming {
        self.timing.clone()
    }

    pub fn sample_rate(&self) -> f32 {
        self.timing.sample_rate()
    }
}

/// Producer side of the click channel, as seen by the scheduler
pub struct ToneOutput {
    tx: ClickProducer,
    timing: AudioTiming,
}

impl ToneOutput {
    pub fn new(tx: ClickProducer, timing: AudioTiming) -> Self {
        Self { tx, timing }
    }
}

impl ToneSink for ToneOutput {
    fn schedule_tone(&mut self, at: f64, click: ClickType) {
        let start_sample = self.timing.seconds_to_samples(at);
        // A full queue means the callback has stalled; dropping the click is
        // safer than blocking the tick thread
        let _ = self.tx.try_push(ScheduledClick {
            start_sample,
            click,
        });
    }
}
