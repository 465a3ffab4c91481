use crate::entities::{ScheduleNotes, TimetableGrid};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file exists but does not hold a document of the expected shape.
    Corrupt { path: PathBuf, reason: String },
    Serialize(serde_json::Error),
}

impl StoreError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to access {}: {source}", path.display()),
            Self::Corrupt { path, reason } => {
                write!(f, "corrupt save file {}: {reason}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

/// `Ok(None)` from `load` means nothing has been saved yet.
pub trait TimetableRepository {
    fn load(&self) -> Result<Option<TimetableGrid>, StoreError>;
    fn save(&self, grid: &TimetableGrid) -> Result<(), StoreError>;
}

pub trait NotesRepository {
    fn load(&self) -> Result<Option<ScheduleNotes>, StoreError>;
    fn save(&self, notes: &ScheduleNotes) -> Result<(), StoreError>;
}
