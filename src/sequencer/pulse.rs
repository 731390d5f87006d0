// Pulse - Tri-state value of one subdivision slot
// Silent / On / Accent, stored as 0/1/2 in session files

use crate::audio::click::ClickType;
use std::fmt;

/// State of a single pulse within a measure's pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Pulse {
    /// No sound on this slot
    Silent,
    /// Regular click
    On,
    /// Accented click (higher pitch)
    Accent,
}

impl Pulse {
    /// Next state in the edit cycle: Silent -> On -> Accent -> Silent
    pub fn cycled(self) -> Self {
        match self {
            Pulse::Silent => Pulse::On,
            Pulse::On => Pulse::Accent,
            Pulse::Accent => Pulse::Silent,
        }
    }

    /// Whether this pulse produces a sound trigger
    pub fn is_audible(self) -> bool {
        !matches!(self, Pulse::Silent)
    }

    /// Click type for audible pulses, None for Silent
    /// Total mapping: every variant resolves to either a click or silence
    pub fn click_type(self) -> Option<ClickType> {
        match self {
            Pulse::Silent => None,
            Pulse::On => Some(ClickType::Regular),
            Pulse::Accent => Some(ClickType::Accent),
        }
    }
}

impl From<Pulse> for u8 {
    fn from(pulse: Pulse) -> u8 {
        match pulse {
            Pulse::Silent => 0,
            Pulse::On => 1,
            Pulse::Accent => 2,
        }
    }
}

impl TryFrom<u8> for Pulse {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Pulse::Silent),
            1 => Ok(Pulse::On),
            2 => Ok(Pulse::Accent),
            other => Err(format!("invalid pulse value: {} (expected 0, 1 or 2)", other)),
        }
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pulse::Silent => "silent",
            Pulse::On => "on",
            Pulse::Accent => "accent",
        };
        write!(f, "{}", name)
    }
}
