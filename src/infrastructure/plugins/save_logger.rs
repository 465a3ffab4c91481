use crate::infrastructure::{WriteContext, WriteHook};
use anyhow::Result;

/// Logs every document save through the `log` facade.
pub struct SaveLoggerHook;

impl WriteHook for SaveLoggerHook {
    fn on_document_written(&self, context: &WriteContext) -> Result<()> {
        log::info!(
            "event=document_saved document={} path={} bytes={}",
            context.document,
            context.path.display(),
            context.content.len()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "Save Logger"
    }
}
