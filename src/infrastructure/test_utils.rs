/// Test utilities for store tests
///
/// `TestDataDir` gives each test its own temporary data directory and a
/// `FileSystemRepository` rooted in it. The directory is removed when the
/// harness is dropped.
///
/// `MemoryTimetable` and `MemoryNotes` are in-memory repositories whose
/// clones share state, so a test can hand one clone to a store and inspect
/// the other.
///
/// ```ignore
/// use crate::infrastructure::test_utils::test_harness::TestDataDir;
///
/// #[test]
/// fn my_test() {
///     let dir = TestDataDir::new();
///     let store = TimetableStore::load(Box::new(dir.repository())).unwrap();
///     // ...
/// }
/// ```
#[cfg(test)]
pub mod test_harness {
    use crate::entities::{ScheduleNotes, TimetableGrid};
    use crate::infrastructure::{
        FileSystemRepository, NotesRepository, StoreError, TimetableRepository,
    };
    use std::cell::{Cell, RefCell};
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempfile::TempDir;

    pub struct TestDataDir {
        temp_dir: TempDir,
    }

    impl TestDataDir {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp directory");
            Self { temp_dir }
        }

        pub fn path(&self) -> &Path {
            self.temp_dir.path()
        }

        pub fn repository(&self) -> FileSystemRepository {
            FileSystemRepository::new(self.path().to_path_buf())
        }

        pub fn write(&self, file_name: &str, content: &str) {
            std::fs::write(self.path().join(file_name), content).expect("Failed to write file");
        }

        pub fn read(&self, file_name: &str) -> String {
            std::fs::read_to_string(self.path().join(file_name)).expect("Failed to read file")
        }
    }

    #[derive(Clone, Default)]
    pub struct MemoryTimetable {
        grid: Rc<RefCell<Option<TimetableGrid>>>,
        saves: Rc<Cell<usize>>,
    }

    impl MemoryTimetable {
        pub fn saves(&self) -> usize {
            self.saves.get()
        }
    }

    impl TimetableRepository for MemoryTimetable {
        fn load(&self) -> Result<Option<TimetableGrid>, StoreError> {
            Ok(self.grid.borrow().clone())
        }

        fn save(&self, grid: &TimetableGrid) -> Result<(), StoreError> {
            *self.grid.borrow_mut() = Some(grid.clone());
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub struct MemoryNotes {
        notes: Rc<RefCell<Option<ScheduleNotes>>>,
    }

    impl NotesRepository for MemoryNotes {
        fn load(&self) -> Result<Option<ScheduleNotes>, StoreError> {
            Ok(self.notes.borrow().clone())
        }

        fn save(&self, notes: &ScheduleNotes) -> Result<(), StoreError> {
            *self.notes.borrow_mut() = Some(notes.clone());
            Ok(())
        }
    }

    /// Loads as a first run and fails every save.
    #[derive(Clone, Default)]
    pub struct FullDisk;

    impl FullDisk {
        fn error() -> StoreError {
            StoreError::Io {
                path: PathBuf::from("timetable.json"),
                source: std::io::Error::other("disk full"),
            }
        }
    }

    impl TimetableRepository for FullDisk {
        fn load(&self) -> Result<Option<TimetableGrid>, StoreError> {
            Ok(None)
        }

        fn save(&self, _grid: &TimetableGrid) -> Result<(), StoreError> {
            Err(Self::error())
        }
    }

    impl NotesRepository for FullDisk {
        fn load(&self) -> Result<Option<ScheduleNotes>, StoreError> {
            Ok(None)
        }

        fn save(&self, _notes: &ScheduleNotes) -> Result<(), StoreError> {
            Err(Self::error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_harness::*;

    #[test]
    fn data_dirs_are_isolated() {
        let first = TestDataDir::new();
        let second = TestDataDir::new();

        first.write("timetable.json", "[]");
        assert!(first.path().join("timetable.json").exists());
        assert!(!second.path().join("timetable.json").exists());
    }
}
