use crate::entities::{CellId, PERIODS, SCHOOL_DAYS, ScheduleNotes, TimetableGrid};
use crate::infrastructure::{
    DocumentKind, HookRegistry, NotesRepository, StoreError, TimetableRepository, WriteContext,
};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TIMETABLE_FILE: &str = "timetable.json";
pub const NOTES_FILE: &str = "schedule_notes.json";

const INDENT: &[u8] = b"    ";

/// Stores each document as a pretty-printed JSON file under `data_dir`.
#[derive(Clone)]
pub struct FileSystemRepository {
    data_dir: PathBuf,
    hook_registry: Arc<HookRegistry>,
}

impl FileSystemRepository {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            hook_registry: Arc::new(HookRegistry::new()),
        }
    }

    pub fn with_hooks(data_dir: PathBuf, hook_registry: HookRegistry) -> Self {
        Self {
            data_dir,
            hook_registry: Arc::new(hook_registry),
        }
    }

    pub fn timetable_path(&self) -> PathBuf {
        self.data_dir.join(TIMETABLE_FILE)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE)
    }

    fn read_document(&self, path: &Path) -> Result<Option<Value>, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let value = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Ok(Some(value))
    }

    fn write_document<T: Serialize>(
        &self,
        path: PathBuf,
        document: DocumentKind,
        value: &T,
    ) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = to_pretty_json(value)?;
        std::fs::write(&path, &content).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let context = WriteContext {
            document,
            path,
            content,
        };
        self.hook_registry.execute_write_hooks(&context);

        Ok(())
    }
}

/// Four-space indentation, matching files written by earlier versions.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn parse_timetable(value: &Value) -> Result<TimetableGrid, String> {
    let rows = value
        .as_array()
        .ok_or_else(|| "expected an array of periods".to_string())?;
    if rows.len() != PERIODS {
        return Err(format!("expected {PERIODS} periods, found {}", rows.len()));
    }

    let mut grid = TimetableGrid::empty();
    for (period, row) in rows.iter().enumerate() {
        let subjects = row
            .as_array()
            .ok_or_else(|| format!("period {} is not an array", period + 1))?;
        if subjects.len() != SCHOOL_DAYS {
            return Err(format!(
                "period {} has {} days, expected {SCHOOL_DAYS}",
                period + 1,
                subjects.len()
            ));
        }

        for (weekday, subject) in subjects.iter().enumerate() {
            let cell = CellId::new(period, weekday).map_err(|e| e.to_string())?;
            let subject = subject
                .as_str()
                .ok_or_else(|| format!("{cell} is not a string"))?;
            grid.set(cell, subject);
        }
    }

    Ok(grid)
}

fn parse_notes(value: &Value) -> Result<ScheduleNotes, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "expected an object of subject notes".to_string())?;

    let mut pairs = Vec::with_capacity(object.len());
    for (subject, note) in object {
        let note = note
            .as_str()
            .ok_or_else(|| format!("note for {subject:?} is not a string"))?;
        pairs.push((subject.clone(), note.to_string()));
    }

    Ok(ScheduleNotes::from_pairs(pairs))
}

impl TimetableRepository for FileSystemRepository {
    fn load(&self) -> Result<Option<TimetableGrid>, StoreError> {
        let path = self.timetable_path();
        let Some(value) = self.read_document(&path)? else {
            return Ok(None);
        };

        parse_timetable(&value)
            .map(Some)
            .map_err(|reason| StoreError::Corrupt { path, reason })
    }

    fn save(&self, grid: &TimetableGrid) -> Result<(), StoreError> {
        self.write_document(self.timetable_path(), DocumentKind::Timetable, grid)
    }
}

impl NotesRepository for FileSystemRepository {
    fn load(&self) -> Result<Option<ScheduleNotes>, StoreError> {
        let path = self.notes_path();
        let Some(value) = self.read_document(&path)? else {
            return Ok(None);
        };

        parse_notes(&value)
            .map(Some)
            .map_err(|reason| StoreError::Corrupt { path, reason })
    }

    fn save(&self, notes: &ScheduleNotes) -> Result<(), StoreError> {
        let object: serde_json::Map<String, Value> = notes
            .iter()
            .map(|(subject, note)| (subject.to_string(), Value::String(note.to_string())))
            .collect();
        self.write_document(
            self.notes_path(),
            DocumentKind::ScheduleNotes,
            &Value::Object(object),
        )
    }
}
