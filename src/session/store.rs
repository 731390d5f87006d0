// Session persistence - save/load of {tempo, measures}
// One JSON document, validated atomically: a file with any invalid field
// is rejected whole rather than partially applied

use crate::sequencer::pattern::{MAX_TEMPO, MIN_TEMPO, Measure, PatternStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the user data dir where the session auto-save lives
const SESSION_DIR: &str = "rhythm-weaver";
const SESSION_FILE: &str = "session.json";

/// Session persistence errors - all recoverable, the in-memory sequence
/// is never touched on failure
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid session: {0}")]
    Invalid(String),

    #[error("no user data directory available on this platform")]
    NoDataDir,
}

/// The exact persisted shape: tempo plus measures, nothing else.
/// The editing index and playhead are deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionData {
    tempo: u32,
    measures: Vec<Measure>,
}

impl SessionData {
    pub fn from_store(store: &PatternStore) -> Self {
        Self {
            tempo: store.tempo(),
            measures: store.measures().to_vec(),
        }
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Check the document against the data model's ranges.
    /// Pulse values outside 0..=2 already fail during deserialization.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&self.tempo) {
            return Err(SessionError::Invalid(format!(
                "tempo {} outside {}..={}",
                self.tempo, MIN_TEMPO, MAX_TEMPO
            )));
        }
        for (index, measure) in self.measures.iter().enumerate() {
            if !measure.is_well_formed() {
                return Err(SessionError::Invalid(format!(
                    "measure {} has {} subdivisions but a pattern of length {}",
                    index,
                    measure.subdivisions(),
                    measure.pattern().len()
                )));
            }
        }
        Ok(())
    }

    /// Replace the store's contents with this session
    pub fn apply_to(self, store: &mut PatternStore) {
        store.replace_contents(self.tempo, self.measures);
    }
}

/// Serialize a store to the session JSON document
pub fn to_json(store: &PatternStore) -> Result<String, SessionError> {
    Ok(serde_json::to_string_pretty(&SessionData::from_store(
        store,
    ))?)
}

/// Parse and validate a session JSON document
pub fn from_json(json: &str) -> Result<SessionData, SessionError> {
    let data: SessionData = serde_json::from_str(json)?;
    data.validate()?;
    Ok(data)
}

/// Handle to the auto-save location
///
/// Written after every mutating action; read once at startup with a
/// fall-back to defaults so a corrupt file never blocks the application.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Auto-save under the platform's per-user data directory
    pub fn at_default_location() -> Result<Self, SessionError> {
        let data_dir = dirs::data_dir().ok_or(SessionError::NoDataDir)?;
        Ok(Self::new(data_dir.join(SESSION_DIR).join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the current sequence
    pub fn save(&self, store: &PatternStore) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, to_json(store)?)?;
        Ok(())
    }

    /// Load the saved session, falling back to an empty sequence at the
    /// default tempo when the file is missing, unreadable, or invalid
    pub fn load_or_default(&self) -> PatternStore {
        let mut store = PatternStore::new();
        if let Ok(data) = self.try_load() {
            data.apply_to(&mut store);
        }
        store
    }

    fn try_load(&self) -> Result<SessionData, SessionError> {
        let json = fs::read_to_string(&self.path)?;
        from_json(&json)
    }
}

/// Export the sequence to an arbitrary file (explicit save-as)
pub fn export_to_file(path: impl AsRef<Path>, store: &PatternStore) -> Result<(), SessionError> {
    fs::write(path, to_json(store)?)?;
    Ok(())
}

/// Import a session file. Errors are surfaced to the caller so the current
/// sequence stays untouched when the file is invalid.
pub fn import_from_file(path: impl AsRef<Path>) -> Result<SessionData, SessionError> {
    let json = fs::read_to_string(path)?;
    from_json(&json)
}
