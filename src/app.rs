//! Application state management for studyaid
//!
//! This module contains the main application state, handling keyboard input,
//! dispatching generations to the background worker and applying their
//! outcomes to the three feature views.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::cli::StartupConfig;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::data::Feature;
use crate::export::{ExportError, ExportFile, ExportFormat};
use crate::features::{FlashcardsView, Notice, NotesStatus, NotesView, QuizView};
use crate::worker::{GenerationMessage, GenerationOutcome, GenerationWorker};

/// How keystrokes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys are commands
    #[default]
    Normal,
    /// Keys edit the current view's input text
    Editing,
}

/// Main application struct managing state and data
pub struct App {
    /// View currently on screen
    pub current_view: Feature,
    pub mode: InputMode,
    pub notes: NotesView,
    pub flashcards: FlashcardsView,
    pub quiz: QuizView,
    /// Most recent notification, shown in the status bar
    pub notice: Option<Notice>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Directory exports are written to
    pub export_dir: PathBuf,
    clipboard: Box<dyn Clipboard>,
    worker: GenerationWorker,
}

impl App {
    /// Creates the app, mounting the notes and flashcard views from the cache
    pub fn new(worker: GenerationWorker, export_dir: PathBuf) -> Self {
        let cache = worker.controller().cache();
        let (notes, notes_notice) = NotesView::mount(cache);
        let (flashcards, flashcards_notice) = FlashcardsView::mount(cache);

        Self {
            current_view: Feature::Notes,
            mode: InputMode::Normal,
            notes,
            flashcards,
            quiz: QuizView::new(),
            notice: notes_notice.or(flashcards_notice),
            show_help: false,
            should_quit: false,
            export_dir,
            clipboard: Box::new(SystemClipboard),
            worker,
        }
    }

    /// Replaces the clipboard notes are copied to
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    /// Creates the app with the view and prefilled input chosen on the command line
    pub fn with_startup_config(
        worker: GenerationWorker,
        export_dir: PathBuf,
        config: StartupConfig,
    ) -> Self {
        let mut app = Self::new(worker, export_dir);
        app.current_view = config.initial_view;
        if let Some(text) = config.prefill {
            *app.current_input_mut() = text;
        }
        app
    }

    /// Input text of the view on screen
    pub fn current_input(&self) -> &str {
        match self.current_view {
            Feature::Notes => &self.notes.input,
            Feature::Flashcards => &self.flashcards.input,
            Feature::Quiz => &self.quiz.input,
        }
    }

    fn current_input_mut(&mut self) -> &mut String {
        match self.current_view {
            Feature::Notes => &mut self.notes.input,
            Feature::Flashcards => &mut self.flashcards.input,
            Feature::Quiz => &mut self.quiz.input,
        }
    }

    /// Whether the view on screen is waiting for the backend
    pub fn is_generating(&self) -> bool {
        match self.current_view {
            Feature::Notes => self.notes.status() == NotesStatus::Generating,
            Feature::Flashcards => self.flashcards.is_generating(),
            Feature::Quiz => self.quiz.is_generating(),
        }
    }

    /// Handles keyboard input events
    ///
    /// Key bindings (normal mode):
    /// - `q`: Quit
    /// - `?`: Toggle help overlay
    /// - `Tab`/`Shift+Tab`: Next/previous view
    /// - `i`: Edit the input text (`Esc` leaves editing)
    /// - `g`: Generate from the input text
    /// - `c`: Clear the input text
    /// - Notes: `m`/`t` export Markdown/text, `y` copy to the clipboard
    /// - Flashcards: `Space`/`f` flip, `l`/`→` next, `h`/`←` previous,
    ///   `s` shuffle, `e`/`t` export CSV/text
    /// - Quiz: `1`-`9` answer, `Enter`/`n` next question, `r` retry
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.mode == InputMode::Editing {
            self.handle_editing_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.switch_view(1),
            KeyCode::BackTab => self.switch_view(Feature::ALL.len() - 1),
            KeyCode::Char('i') => self.mode = InputMode::Editing,
            KeyCode::Char('g') => self.generate(),
            KeyCode::Char('c') => self.clear_input(),
            _ => match self.current_view {
                Feature::Notes => self.handle_notes_key(key_event),
                Feature::Flashcards => self.handle_flashcards_key(key_event),
                Feature::Quiz => self.handle_quiz_key(key_event),
            },
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => self.current_input_mut().push('\n'),
            KeyCode::Backspace => {
                self.current_input_mut().pop();
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.current_input_mut().push(c);
            }
            _ => {}
        }
    }

    fn handle_notes_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('m') => self.export(self.notes.export(ExportFormat::Md)),
            KeyCode::Char('t') => self.export(self.notes.export(ExportFormat::Txt)),
            KeyCode::Char('y') => self.copy_notes(),
            _ => {}
        }
    }

    fn copy_notes(&mut self) {
        let copied = match self.notes.copy_text() {
            Ok(notes) => self.clipboard.set_text(notes).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        self.notice = Some(match copied {
            Ok(()) => {
                info!("Copied notes to clipboard");
                Notice::info("Copied to clipboard", "Notes copied!")
            }
            Err(e) => {
                warn!(error = %e, "Copy failed");
                Notice::error("Copy failed", e)
            }
        });
    }

    fn handle_flashcards_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char(' ') | KeyCode::Char('f') => self.flashcards.flip(),
            KeyCode::Char('l') | KeyCode::Right => self.flashcards.next(),
            KeyCode::Char('h') | KeyCode::Left => self.flashcards.prev(),
            KeyCode::Char('s') => {
                if let Some(notice) = self.flashcards.shuffle() {
                    self.notice = Some(notice);
                }
            }
            KeyCode::Char('e') => self.export(self.flashcards.export(ExportFormat::Csv)),
            KeyCode::Char('t') => self.export(self.flashcards.export(ExportFormat::Txt)),
            _ => {}
        }
    }

    fn handle_quiz_key(&mut self, key_event: KeyEvent) {
        let result = match key_event.code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.quiz.select_answer(index).map(|_| ())
            }
            KeyCode::Enter | KeyCode::Char('n') => self.quiz.next(),
            KeyCode::Char('r') => self.quiz.retry(),
            _ => Ok(()),
        };
        if let Err(e) = result {
            debug!(error = %e, "Ignoring quiz action");
        }
    }

    /// Cycles through the views by `step` positions
    fn switch_view(&mut self, step: usize) {
        let position = Feature::ALL
            .iter()
            .position(|f| *f == self.current_view)
            .unwrap_or(0);
        self.current_view = Feature::ALL[(position + step) % Feature::ALL.len()];
    }

    fn clear_input(&mut self) {
        match self.current_view {
            Feature::Notes => self.notes.clear(),
            Feature::Flashcards => self.flashcards.clear(),
            Feature::Quiz => self.quiz.clear(),
        }
    }

    /// Starts a generation for the view on screen
    ///
    /// Must be called from within a tokio runtime when the input is non-empty.
    pub fn generate(&mut self) {
        let feature = self.current_view;
        let started = match feature {
            Feature::Notes => self.notes.begin_generate(),
            Feature::Flashcards => self.flashcards.begin_generate(),
            Feature::Quiz => self.quiz.begin_generate(),
        };

        match started {
            Ok(token) => {
                info!(%feature, token = token.value(), "Generation requested");
                self.notice = None;
                self.worker
                    .spawn(feature, token, self.current_input().to_string());
            }
            Err(e) => self.notice = Some(Notice::from_error(feature, &e)),
        }
    }

    /// Applies every generation outcome that has arrived, without blocking
    pub fn process_messages(&mut self) {
        while let Some(message) = self.worker.try_recv() {
            self.apply_message(message);
        }
    }

    /// Applies one generation outcome to its view
    pub fn apply_message(&mut self, message: GenerationMessage) {
        let GenerationMessage { token, outcome } = message;
        let feature = outcome.feature();
        let notice = match outcome {
            GenerationOutcome::Notes(result) => self.notes.apply(token, result),
            GenerationOutcome::Flashcards(result) => self.flashcards.apply(token, result),
            GenerationOutcome::Quiz(result) => self.quiz.apply(token, result),
        };

        match notice {
            Some(notice) => self.notice = Some(notice),
            None => debug!(%feature, token = token.value(), "Discarding stale outcome"),
        }
    }

    /// Writes an export to the export directory and reports the result
    fn export(&mut self, file: Result<ExportFile, ExportError>) {
        let written = file.and_then(|file| file.write_to(&self.export_dir));
        self.notice = Some(match written {
            Ok(path) => {
                info!(path = %path.display(), "Exported");
                Notice::info("Exported", format!("Saved {}", path.display()))
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                Notice::error("Export failed", e.to_string())
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, MemoryCache};
    use crate::data::{Flashcard, GenerationClient, QuizQuestion};
    use crate::fallback::{FallbackController, Generated};
    use crate::features::{NoticeLevel, QuizState};
    use crate::clipboard::ClipboardError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records the last copied text
    #[derive(Clone, Default)]
    struct RecordingClipboard(Arc<Mutex<Option<String>>>);

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            *self.0.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(client: GenerationClient, cache: MemoryCache) -> App {
        let controller = FallbackController::new(client, Arc::new(cache));
        App::new(GenerationWorker::new(controller), PathBuf::from("."))
    }

    fn offline_app() -> App {
        app_with(GenerationClient::default(), MemoryCache::new())
    }

    fn type_text(app: &mut App, text: &str) {
        app.handle_key(key_event(KeyCode::Char('i')));
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Esc));
    }

    async fn wait_until_idle(app: &mut App) {
        for _ in 0..100 {
            app.process_messages();
            if !app.is_generating() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("generation did not finish");
    }

    fn quiz_question(id: i64, answer: &str) -> QuizQuestion {
        QuizQuestion {
            id,
            question: format!("Question {}", id),
            options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_app_starts_on_notes_view() {
        let app = offline_app();
        assert_eq!(app.current_view, Feature::Notes);
        assert_eq!(app.mode, InputMode::Normal);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_tab_cycles_views() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.current_view, Feature::Flashcards);
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.current_view, Feature::Quiz);
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.current_view, Feature::Notes);
    }

    #[test]
    fn test_backtab_cycles_backwards() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(app.current_view, Feature::Quiz);
    }

    #[test]
    fn test_editing_mode_types_into_current_view() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Tab));
        type_text(&mut app, "qx");
        app.handle_key(key_event(KeyCode::Char('i')));
        app.handle_key(key_event(KeyCode::Backspace));
        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.flashcards.input, "q");
        assert!(app.notes.input.is_empty());
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn test_editing_mode_does_not_quit() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Char('i')));
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.notes.input, "q");
    }

    #[test]
    fn test_clear_resets_input() {
        let mut app = offline_app();
        type_text(&mut app, "cells");
        app.handle_key(key_event(KeyCode::Char('c')));
        assert!(app.notes.input.is_empty());
    }

    #[test]
    fn test_generate_with_empty_input_shows_error() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Char('g')));

        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "No content provided");
        assert_eq!(app.notes.status(), NotesStatus::Empty);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.current_view, Feature::Notes);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_q_quits() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_mount_shows_cached_notes() {
        let cache = MemoryCache::new();
        cache.put("generatedNotes", "Cached notes").unwrap();
        let app = app_with(GenerationClient::default(), cache);

        assert_eq!(app.notes.notes(), Some("Cached notes"));
        assert_eq!(app.notice.as_ref().unwrap().title, "Loaded cached notes");
    }

    #[test]
    fn test_startup_config_selects_view_and_prefill() {
        let controller = FallbackController::new(
            GenerationClient::default(),
            Arc::new(MemoryCache::new()),
        );
        let app = App::with_startup_config(
            GenerationWorker::new(controller),
            PathBuf::from("."),
            StartupConfig {
                initial_view: Feature::Quiz,
                prefill: Some("Chapter 4".to_string()),
            },
        );

        assert_eq!(app.current_view, Feature::Quiz);
        assert_eq!(app.quiz.input, "Chapter 4");
    }

    #[test]
    fn test_flashcard_keys_drive_deck() {
        let cache = MemoryCache::new();
        cache
            .put(
                "flashcards",
                r#"[{"id":1,"front":"Q1","back":"A1"},{"id":2,"front":"Q2","back":"A2"}]"#,
            )
            .unwrap();
        let mut app = app_with(GenerationClient::default(), cache);
        app.handle_key(key_event(KeyCode::Tab));

        app.handle_key(key_event(KeyCode::Char(' ')));
        assert_eq!(app.flashcards.deck().unwrap().visible_text(), "A1");

        app.handle_key(key_event(KeyCode::Right));
        let deck = app.flashcards.deck().unwrap();
        assert_eq!(deck.current_index(), 1);
        assert!(!deck.is_flipped());

        app.handle_key(key_event(KeyCode::Char('h')));
        assert_eq!(app.flashcards.deck().unwrap().current_index(), 0);

        app.handle_key(key_event(KeyCode::Char('s')));
        assert_eq!(app.notice.as_ref().unwrap().title, "Shuffled");
    }

    #[test]
    fn test_quiz_keys_answer_and_complete() {
        let mut app = offline_app();
        app.current_view = Feature::Quiz;
        app.quiz.input = "photosynthesis".to_string();
        let token = app.quiz.begin_generate().unwrap();
        app.quiz.apply(
            token,
            Ok(Generated::live(vec![
                quiz_question(1, "B"),
                quiz_question(2, "C"),
            ])),
        );

        app.handle_key(key_event(KeyCode::Char('2')));
        app.handle_key(key_event(KeyCode::Enter));
        app.handle_key(key_event(KeyCode::Char('1')));
        app.handle_key(key_event(KeyCode::Char('n')));

        match app.quiz.state() {
            QuizState::Complete(session) => assert_eq!(session.score(), 1),
            other => panic!("Unexpected state: {other:?}"),
        }

        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(matches!(app.quiz.state(), QuizState::Answering(_)));
        assert_eq!(app.quiz.session().unwrap().score(), 0);
    }

    #[test]
    fn test_quiz_out_of_range_key_is_ignored() {
        let mut app = offline_app();
        app.current_view = Feature::Quiz;
        app.quiz.input = "x".to_string();
        let token = app.quiz.begin_generate().unwrap();
        app.quiz
            .apply(token, Ok(Generated::live(vec![quiz_question(1, "A")])));

        app.handle_key(key_event(KeyCode::Char('9')));
        assert_eq!(app.quiz.session().unwrap().selected(), None);
    }

    #[test]
    fn test_export_flashcards_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = offline_app();
        app.export_dir = temp_dir.path().to_path_buf();
        app.current_view = Feature::Flashcards;
        app.flashcards.input = "x".to_string();
        let token = app.flashcards.begin_generate().unwrap();
        app.flashcards.apply(
            token,
            Ok(Generated::live(vec![Flashcard {
                id: 1,
                front: "Front".to_string(),
                back: "Back".to_string(),
            }])),
        );

        app.handle_key(key_event(KeyCode::Char('e')));

        let content = std::fs::read_to_string(temp_dir.path().join("flashcards.csv")).unwrap();
        assert_eq!(content, "\"Front\",\"Back\"");
        assert_eq!(app.notice.as_ref().unwrap().title, "Exported");
    }

    #[test]
    fn test_export_without_notes_reports_error() {
        let mut app = offline_app();
        app.handle_key(key_event(KeyCode::Char('m')));

        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Export failed");
    }

    #[test]
    fn test_copy_notes_to_clipboard() {
        let cache = MemoryCache::new();
        cache.put("generatedNotes", "# Cells").unwrap();
        let clipboard = RecordingClipboard::default();
        let mut app = app_with(GenerationClient::default(), cache).with_clipboard(clipboard.clone());

        app.handle_key(key_event(KeyCode::Char('y')));

        assert_eq!(clipboard.0.lock().unwrap().as_deref(), Some("# Cells"));
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.title, "Copied to clipboard");
        assert_eq!(notice.message, "Notes copied!");
    }

    #[test]
    fn test_copy_without_notes_reports_error() {
        let clipboard = RecordingClipboard::default();
        let mut app = offline_app().with_clipboard(clipboard.clone());

        app.handle_key(key_event(KeyCode::Char('y')));

        assert!(clipboard.0.lock().unwrap().is_none());
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Copy failed");
    }

    #[tokio::test]
    async fn test_generate_applies_worker_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/notes")
            .with_status(200)
            .with_body(r#"{"notes": "Fresh notes"}"#)
            .create_async()
            .await;
        let mut app = app_with(GenerationClient::new(server.url()), MemoryCache::new());

        type_text(&mut app, "cells");
        app.handle_key(key_event(KeyCode::Char('g')));
        assert!(app.is_generating());

        wait_until_idle(&mut app).await;

        assert_eq!(app.notes.notes(), Some("Fresh notes"));
        assert_eq!(app.notice.as_ref().unwrap().title, "Notes generated!");
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_cache() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/flashcards")
            .with_status(503)
            .create_async()
            .await;
        let cache = MemoryCache::new();
        cache
            .put("flashcards", r#"[{"id":1,"front":"Old","back":"Card"}]"#)
            .unwrap();
        let mut app = app_with(GenerationClient::new(server.url()), cache);
        app.handle_key(key_event(KeyCode::Tab));

        type_text(&mut app, "cells");
        app.handle_key(key_event(KeyCode::Char('g')));
        wait_until_idle(&mut app).await;

        assert_eq!(app.flashcards.deck().unwrap().current_card().front, "Old");
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Degraded);
    }
}
