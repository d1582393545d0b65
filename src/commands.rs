//! Headless subcommands
//!
//! Each subcommand makes one request and prints the result to stdout.
//! Degraded results are announced on stderr so piped output stays clean.

use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::cli::{CliError, Command};
use crate::data::{Artifact, BackendError, Feature};
use crate::export::{self, ExportError, ExportFormat};
use crate::fallback::{FallbackController, GenerationError};
use crate::features::Notice;

/// Errors surfaced by a headless run
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs `command`, reading generation input from its file or stdin
pub async fn run(
    command: &Command,
    controller: &FallbackController,
    export_dir: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        Command::Notes(args) => {
            let text = args.read_input()?;
            generate(Feature::Notes, &text, args.export, controller, export_dir, out, err).await
        }
        Command::Flashcards(args) => {
            let text = args.read_input()?;
            generate(Feature::Flashcards, &text, args.export, controller, export_dir, out, err)
                .await
        }
        Command::Quiz(args) => {
            let text = args.read_input()?;
            generate(Feature::Quiz, &text, args.export, controller, export_dir, out, err).await
        }
        Command::Ping => {
            let message = controller.client().ping().await?;
            writeln!(out, "{}", message)?;
            Ok(())
        }
        Command::Pack(args) => {
            let request = args.to_request()?;
            let pack = controller.client().generate_study_pack(&request).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&pack)?)?;
            Ok(())
        }
    }
}

/// Rejects `format` for `feature` before any request is made
pub fn check_export(feature: Feature, format: ExportFormat) -> Result<(), ExportError> {
    match (feature, format) {
        (Feature::Notes, ExportFormat::Md | ExportFormat::Txt) => Ok(()),
        (Feature::Flashcards, ExportFormat::Txt | ExportFormat::Csv) => Ok(()),
        (Feature::Notes, _) => Err(ExportError::Unsupported {
            what: "notes",
            format,
        }),
        (Feature::Flashcards, _) => Err(ExportError::Unsupported {
            what: "flashcards",
            format,
        }),
        (Feature::Quiz, _) => Err(ExportError::Unsupported {
            what: "quiz",
            format,
        }),
    }
}

/// Generates `feature` for `text` and prints or exports the artifact
pub async fn generate(
    feature: Feature,
    text: &str,
    export_format: Option<ExportFormat>,
    controller: &FallbackController,
    export_dir: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), CommandError> {
    if let Some(format) = export_format {
        check_export(feature, format)?;
    }

    let generated = controller.generate_with_fallback(feature, text).await?;
    if generated.is_degraded() {
        let notice = Notice::degraded(feature, generated.source);
        writeln!(err, "{}: {}", notice.title, notice.message)?;
    }

    match export_format {
        Some(format) => {
            let file = match &generated.artifact {
                Artifact::Notes(notes) => export::notes_file(notes, format)?,
                Artifact::Flashcards(cards) => export::flashcards_file(cards, format)?,
                Artifact::Quiz(_) => {
                    return Err(ExportError::Unsupported {
                        what: "quiz",
                        format,
                    }
                    .into())
                }
            };
            let path = file.write_to(export_dir)?;
            info!(path = %path.display(), "Exported {}", feature);
            writeln!(out, "Exported to {}", path.display())?;
        }
        None => match &generated.artifact {
            Artifact::Notes(notes) => writeln!(out, "{}", notes)?,
            Artifact::Flashcards(cards) => writeln!(out, "{}", export::flashcards_txt(cards))?,
            Artifact::Quiz(questions) => {
                writeln!(out, "{}", serde_json::to_string_pretty(questions)?)?
            }
        },
    }
    Ok(())
}
