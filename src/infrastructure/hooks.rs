use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Timetable,
    ScheduleNotes,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timetable => write!(f, "timetable"),
            Self::ScheduleNotes => write!(f, "schedule notes"),
        }
    }
}

/// Context provided to write hooks
#[derive(Debug, Clone)]
pub struct WriteContext {
    pub document: DocumentKind,
    pub path: PathBuf,
    pub content: String,
}

/// Trait for plugins that respond to document write events
pub trait WriteHook: Send + Sync {
    /// Called after a document has been successfully written to disk
    fn on_document_written(&self, context: &WriteContext) -> Result<()>;

    /// Human-readable name for this hook
    fn name(&self) -> &str;
}

/// Registry for managing write hooks
pub struct HookRegistry {
    hooks: Vec<Box<dyn WriteHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn register<H>(&mut self, hook: H)
    where
        H: WriteHook + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Runs every hook; a failing hook is logged and the rest still run.
    pub fn execute_write_hooks(&self, context: &WriteContext) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_document_written(context) {
                log::warn!(
                    "event=write_hook_failed hook={:?} document={} error={:#}",
                    hook.name(),
                    context.document,
                    e
                );
            }
        }
    }

    pub fn list_hooks(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
