// Click tones - Pre-generated sine bursts for the metronome
// One buffer per click type, rendered once at stream startup

use std::f32::consts::PI;

/// Click pitch level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    /// Regular beat
    Regular,
    /// Accented beat (higher pitch)
    Accent,
}

impl ClickType {
    /// Tone frequency for this click
    pub fn frequency_hz(&self) -> f32 {
        match self {
            ClickType::Regular => 440.0,
            ClickType::Accent => 880.0,
        }
    }
}

/// Pre-generated click buffers for low CPU overhead in the audio callback
#[derive(Debug, Clone)]
pub struct ClickSound {
    regular_samples: Vec<f32>,
    accent_samples: Vec<f32>,
}

impl ClickSound {
    /// Duration of a click in milliseconds
    const CLICK_DURATION_MS: f32 = 50.0;

    /// Decay constant so the envelope falls to roughly 1/1000 of its
    /// starting level by the end of the click
    const DECAY: f32 = 6.9;

    pub fn new(sample_rate: f32) -> Self {
        let num_samples = ((Self::CLICK_DURATION_MS / 1000.0) * sample_rate) as usize;

        Self {
            regular_samples: Self::generate_click(
                sample_rate,
                num_samples,
                ClickType::Regular.frequency_hz(),
                0.4,
            ),
            accent_samples: Self::generate_click(
                sample_rate,
                num_samples,
                ClickType::Accent.frequency_hz(),
                0.6,
            ),
        }
    }

    /// Sine oscillator under an exponential decay envelope
    fn generate_click(
        sample_rate: f32,
        num_samples: usize,
        frequency: f32,
        amplitude: f32,
    ) -> Vec<f32> {
        let mut samples = Vec::with_capacity(num_samples);
        let phase_increment = 2.0 * PI * frequency / sample_rate;

        for i in 0..num_samples {
            let t = i as f32 / num_samples as f32;
            let envelope = (-t * Self::DECAY).exp();

            let phase = i as f32 * phase_increment;
            samples.push(phase.sin() * envelope * amplitude);
        }

        samples
    }

    /// Samples for the given click type
    pub fn get(&self, click: ClickType) -> &[f32] {
        match click {
            ClickType::Regular => &self.regular_samples,
            ClickType::Accent => &self.accent_samples,
        }
    }

    /// Click length in samples (same for both types)
    pub fn len_samples(&self) -> usize {
        self.regular_samples.len()
    }
}
