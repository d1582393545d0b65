//! Export of generated content as downloadable text files
//!
//! Projections are pure functions of the current artifact; `ExportFile::write_to`
//! is the only part that touches the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;

use crate::data::Flashcard;

/// MIME type for every exported file
pub const MIME_TYPE: &str = "text/plain";

pub const FLASHCARDS_CSV: &str = "flashcards.csv";
pub const FLASHCARDS_TXT: &str = "flashcards.txt";
pub const NOTES_MD: &str = "study-notes.md";
pub const NOTES_TXT: &str = "study-notes.txt";

/// Errors that can occur when exporting
#[derive(Debug, Error)]
pub enum ExportError {
    /// There is nothing to export yet
    #[error("No {0} to export")]
    Empty(&'static str),

    /// The format does not apply to this kind of content
    #[error("Cannot export {what} as {format:?}")]
    Unsupported {
        what: &'static str,
        format: ExportFormat,
    },

    /// Writing the file failed
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated front/back rows (flashcards)
    Csv,
    /// Plain text (flashcards or notes)
    Txt,
    /// Markdown (notes)
    Md,
}

/// A file ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub content: String,
}

impl ExportFile {
    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Writes the file into `dir`, creating the directory if needed
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Quotes a CSV field, doubling embedded quotes
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One `"front","back"` row per card, joined by newlines
pub fn flashcards_csv(cards: &[Flashcard]) -> String {
    cards
        .iter()
        .map(|card| format!("{},{}", csv_field(&card.front), csv_field(&card.back)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Q:`/`A:` blocks separated by blank lines
pub fn flashcards_txt(cards: &[Flashcard]) -> String {
    cards
        .iter()
        .map(|card| format!("Q: {}\nA: {}\n", card.front, card.back))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn flashcards_file(cards: &[Flashcard], format: ExportFormat) -> Result<ExportFile, ExportError> {
    if cards.is_empty() {
        return Err(ExportError::Empty("flashcards"));
    }
    match format {
        ExportFormat::Csv => Ok(ExportFile {
            file_name: FLASHCARDS_CSV,
            content: flashcards_csv(cards),
        }),
        ExportFormat::Txt => Ok(ExportFile {
            file_name: FLASHCARDS_TXT,
            content: flashcards_txt(cards),
        }),
        ExportFormat::Md => Err(ExportError::Unsupported {
            what: "flashcards",
            format,
        }),
    }
}

pub fn notes_file(notes: &str, format: ExportFormat) -> Result<ExportFile, ExportError> {
    let file_name = match format {
        ExportFormat::Md => NOTES_MD,
        ExportFormat::Txt => NOTES_TXT,
        ExportFormat::Csv => {
            return Err(ExportError::Unsupported {
                what: "notes",
                format,
            })
        }
    };
    Ok(ExportFile {
        file_name,
        content: notes.to_string(),
    })
}
