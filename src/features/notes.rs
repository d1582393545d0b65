//! Notes generator view-model

use crate::cache::Cache;
use crate::data::{Feature, GeneratedNotes};
use crate::export::{self, ExportError, ExportFile, ExportFormat};
use crate::fallback::{self, Generated, GenerationError};

use super::{Notice, RequestToken, RequestTracker};

/// Lifecycle of the notes view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesStatus {
    Empty,
    Generating,
    Ready,
    Error,
}

/// State behind the notes generator screen
#[derive(Debug)]
pub struct NotesView {
    /// Content the user wants notes for
    pub input: String,
    notes: Option<GeneratedNotes>,
    status: NotesStatus,
    tracker: RequestTracker,
}

impl Default for NotesView {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesView {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            notes: None,
            status: NotesStatus::Empty,
            tracker: RequestTracker::new(),
        }
    }

    /// Creates the view, showing cached notes if there are any.
    ///
    /// No network call is made.
    pub fn mount(cache: &dyn Cache) -> (Self, Option<Notice>) {
        let mut view = Self::new();
        match fallback::cached_notes(cache).filter(|cached| !cached.artifact.is_empty()) {
            Some(cached) => {
                view.notes = Some(cached.artifact);
                view.status = NotesStatus::Ready;
                (
                    view,
                    Some(Notice::info("Loaded cached notes", "Offline mode enabled")),
                )
            }
            None => (view, None),
        }
    }

    pub fn status(&self) -> NotesStatus {
        self.status
    }

    /// Notes currently on display
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn can_generate(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Starts a generation request for the current input.
    ///
    /// Any request still in flight is superseded.
    pub fn begin_generate(&mut self) -> Result<RequestToken, GenerationError> {
        if !self.can_generate() {
            return Err(GenerationError::EmptyInput);
        }
        self.status = NotesStatus::Generating;
        Ok(self.tracker.issue())
    }

    /// Applies a generation outcome. Returns `None` when the outcome is stale.
    pub fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<Generated<GeneratedNotes>, GenerationError>,
    ) -> Option<Notice> {
        if !self.tracker.accept(token) {
            return None;
        }

        match outcome {
            Ok(generated) => {
                let notice = if generated.is_degraded() {
                    Notice::degraded(Feature::Notes, generated.source)
                } else {
                    Notice::info("Notes generated!", "Your AI-powered study notes are ready.")
                };
                self.notes = Some(generated.artifact);
                self.status = NotesStatus::Ready;
                Some(notice)
            }
            Err(error) => {
                self.status = NotesStatus::Error;
                Some(Notice::from_error(Feature::Notes, &error))
            }
        }
    }

    /// Clears the input; displayed notes are kept
    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// The displayed notes, for copying elsewhere
    pub fn copy_text(&self) -> Result<&str, ExportError> {
        match self.notes.as_deref() {
            Some(notes) if !notes.is_empty() => Ok(notes),
            _ => Err(ExportError::Empty("notes")),
        }
    }

    /// Builds a download of the displayed notes
    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, ExportError> {
        match self.notes.as_deref() {
            Some(notes) if !notes.is_empty() => export::notes_file(notes, format),
            _ => Err(ExportError::Empty("notes")),
        }
    }
}
