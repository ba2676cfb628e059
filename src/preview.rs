//! Markdown preview of generated content
//!
//! A [`PreviewSlot`] holds at most one live preview. Showing a new preview
//! closes the previous one first, and the slot is cleared when the run that
//! owns it ends (or, failing that, when it is dropped).

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::{Result, ScribeError};

/// A preview currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    /// Where the preview lives (the backing file for the terminal surface)
    pub location_id: String,
    /// Markdown that was rendered
    pub content: String,
}

/// Something that can display markdown and later take it down again
pub trait PreviewSurface {
    fn show(&mut self, markdown: &str) -> Result<PreviewHandle>;
    fn close(&mut self, handle: PreviewHandle) -> Result<()>;
}

/// Single-slot owner of the live preview
pub struct PreviewSlot {
    surface: Box<dyn PreviewSurface>,
    current: Option<PreviewHandle>,
}

impl PreviewSlot {
    pub fn new(surface: Box<dyn PreviewSurface>) -> Self {
        Self {
            surface,
            current: None,
        }
    }

    /// Replace whatever is showing with `markdown`
    pub fn show(&mut self, markdown: &str) -> Result<&PreviewHandle> {
        self.clear()?;
        let handle = self.surface.show(markdown).map_err(into_preview_error)?;
        debug!(location = %handle.location_id, "preview shown");
        Ok(self.current.insert(handle))
    }

    /// Close the live preview, if any
    pub fn clear(&mut self) -> Result<()> {
        if let Some(handle) = self.current.take() {
            debug!(location = %handle.location_id, "closing preview");
            self.surface.close(handle).map_err(into_preview_error)?;
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }
}

impl Drop for PreviewSlot {
    fn drop(&mut self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "preview cleanup failed");
        }
    }
}

fn into_preview_error(err: ScribeError) -> ScribeError {
    match err {
        ScribeError::PreviewFailed(_) => err,
        other => ScribeError::PreviewFailed(other.to_string()),
    }
}

/// Prints the preview to the terminal and keeps a copy in a temp `.md` file
pub struct TerminalPreview {
    dir: Option<PathBuf>,
    files: HashMap<String, TempPath>,
}

impl TerminalPreview {
    /// Preview files go to the system temp directory
    pub fn new() -> Self {
        Self {
            dir: None,
            files: HashMap::new(),
        }
    }

    /// Preview files go to `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            files: HashMap::new(),
        }
    }

    fn create_file(&self, markdown: &str) -> std::io::Result<TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("scribe-preview-").suffix(".md").rand_bytes(12);

        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(markdown.as_bytes())?;
        file.flush()?;
        Ok(file.into_temp_path())
    }
}

impl Default for TerminalPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSurface for TerminalPreview {
    fn show(&mut self, markdown: &str) -> Result<PreviewHandle> {
        let path = self
            .create_file(markdown)
            .map_err(|e| ScribeError::PreviewFailed(e.to_string()))?;
        let location_id = path.display().to_string();

        println!();
        println!("─── Preview ─────────────────────────────────");
        println!("{}", markdown);
        println!("─────────────────────────────────────────────");
        println!("  (saved to {})", location_id);
        println!();

        self.files.insert(location_id.clone(), path);
        Ok(PreviewHandle {
            location_id,
            content: markdown.to_string(),
        })
    }

    fn close(&mut self, handle: PreviewHandle) -> Result<()> {
        match self.files.remove(&handle.location_id) {
            Some(path) => path
                .close()
                .map_err(|e| ScribeError::PreviewFailed(e.to_string())),
            None => Ok(()),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::testing::RecordingSurface;
    use super::*;

    #[test]
    fn test_second_show_closes_first() {
        let surface = RecordingSurface::default();
        let log = surface.log.clone();
        let mut slot = PreviewSlot::new(Box::new(surface));

        slot.show("first").unwrap();
        slot.show("second").unwrap();

        {
            let log = log.lock().unwrap();
            assert_eq!(log.shown, vec!["first", "second"]);
            assert_eq!(log.closed, 1);
            assert_eq!(log.live, 1);
            assert_eq!(log.max_live, 1);
        }
        assert_eq!(slot.current().unwrap().content, "second");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let surface = RecordingSurface::default();
        let log = surface.log.clone();
        let mut slot = PreviewSlot::new(Box::new(surface));

        slot.show("only").unwrap();
        slot.clear().unwrap();
        slot.clear().unwrap();
        drop(slot);

        let log = log.lock().unwrap();
        assert_eq!(log.closed, 1);
        assert_eq!(log.live, 0);
    }

    #[test]
    fn test_drop_closes_live_preview() {
        let surface = RecordingSurface::default();
        let log = surface.log.clone();
        {
            let mut slot = PreviewSlot::new(Box::new(surface));
            slot.show("left open").unwrap();
        }
        assert_eq!(log.lock().unwrap().live, 0);
    }

    #[test]
    fn test_surface_errors_become_preview_failures() {
        let surface = RecordingSurface {
            fail_show: true,
            ..RecordingSurface::default()
        };
        let mut slot = PreviewSlot::new(Box::new(surface));
        assert!(matches!(
            slot.show("x"),
            Err(ScribeError::PreviewFailed(_))
        ));
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_terminal_preview_files_are_unique_and_removed() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut slot = PreviewSlot::new(Box::new(TerminalPreview::in_dir(dir.path())));

        let first = slot.show("# one").unwrap().location_id.clone();
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "# one");
        let name = Path::new(&first).file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("scribe-preview-") && name.ends_with(".md"));

        let second = slot.show("# two").unwrap().location_id.clone();
        assert_ne!(first, second);
        assert!(!Path::new(&first).exists());
        assert!(Path::new(&second).exists());

        slot.clear().unwrap();
        assert!(!Path::new(&second).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
