//! Command-line interface parsing for studyaid
//!
//! Without a subcommand the interactive TUI starts. The `notes`, `flashcards`,
//! `quiz`, `ping` and `pack` subcommands run one request headlessly and print
//! the result to stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::LogFormat;
use crate::data::pack::{DEFAULT_LEVEL, DEFAULT_NUM_QUESTIONS};
use crate::data::{Feature, StudyPackRequest, DEFAULT_BACKEND_URL};
use crate::export::ExportFormat;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified view name is not recognized
    #[error("Invalid view: '{0}'. Valid views: notes, flashcards, quiz")]
    InvalidView(String),

    /// `pack` needs at least one source of material
    #[error("A study pack needs at least one of --topic, --link or --file")]
    EmptyPack,

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// studyaid - generate study notes, flashcards and quizzes from your material
#[derive(Parser, Debug)]
#[command(name = "studyaid")]
#[command(about = "AI study aids: notes, flashcards and quizzes from your material")]
#[command(version)]
pub struct Cli {
    /// Base URL of the generation backend
    #[arg(
        long,
        global = true,
        env = "STUDYAID_BACKEND_URL",
        default_value = DEFAULT_BACKEND_URL
    )]
    pub backend_url: String,

    /// Directory for cached notes and flashcards
    #[arg(long, global = true, env = "STUDYAID_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory exported files are written to
    #[arg(
        long,
        global = true,
        env = "STUDYAID_EXPORT_DIR",
        value_name = "DIR",
        default_value = "."
    )]
    pub export_dir: PathBuf,

    /// Log filter, e.g. `debug` or `studyaid=trace`
    #[arg(long, global = true, env = "STUDYAID_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// View to open the TUI on
    ///
    /// Valid views: notes, flashcards, quiz
    #[arg(long, value_name = "VIEW")]
    pub view: Option<String>,

    /// File whose contents prefill the input of the opening view
    #[arg(long, value_name = "FILE")]
    pub prefill: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Headless subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate study notes
    Notes(GenerateArgs),
    /// Generate flashcards
    Flashcards(GenerateArgs),
    /// Generate a quiz
    Quiz(GenerateArgs),
    /// Check that the backend is reachable
    Ping,
    /// Generate a combined study pack from a topic, link or file
    Pack(PackArgs),
}

impl Command {
    /// The feature a generation subcommand targets
    pub fn feature(&self) -> Option<Feature> {
        match self {
            Command::Notes(_) => Some(Feature::Notes),
            Command::Flashcards(_) => Some(Feature::Flashcards),
            Command::Quiz(_) => Some(Feature::Quiz),
            Command::Ping | Command::Pack(_) => None,
        }
    }
}

/// Arguments shared by the generation subcommands
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Read the material from FILE; `-` or no value reads stdin
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the result to the export directory instead of stdout
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,
}

impl GenerateArgs {
    /// Whether the material comes from stdin
    pub fn reads_stdin(&self) -> bool {
        match &self.input {
            None => true,
            Some(path) => path.as_os_str() == "-",
        }
    }

    /// Reads the material from a file or stdin
    pub fn read_input(&self) -> Result<String, CliError> {
        match &self.input {
            Some(path) if !self.reads_stdin() => Ok(std::fs::read_to_string(path)?),
            _ => Ok(std::io::read_to_string(std::io::stdin())?),
        }
    }
}

/// Arguments for `pack`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PackArgs {
    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long)]
    pub link: Option<String>,

    /// File uploaded as source material
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Target reading level
    #[arg(long, default_value = DEFAULT_LEVEL)]
    pub level: String,

    /// Leave the quiz out of the pack
    #[arg(long)]
    pub no_quiz: bool,

    #[arg(long, default_value_t = DEFAULT_NUM_QUESTIONS)]
    pub num_questions: u32,
}

impl PackArgs {
    /// Builds the pack request, requiring at least one source
    pub fn to_request(&self) -> Result<StudyPackRequest, CliError> {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let topic = non_empty(&self.topic);
        let link = non_empty(&self.link);
        if topic.is_none() && link.is_none() && self.file.is_none() {
            return Err(CliError::EmptyPack);
        }

        Ok(StudyPackRequest {
            topic,
            link,
            file: self.file.clone(),
            level: self.level.clone(),
            include_quiz: !self.no_quiz,
            num_questions: self.num_questions,
        })
    }
}

/// Configuration derived from CLI arguments for TUI startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// View shown first
    pub initial_view: Feature,
    /// Text placed in the opening view's input
    pub prefill: Option<String>,
}

/// Parses a view name argument into a Feature.
pub fn parse_view_arg(s: &str) -> Result<Feature, CliError> {
    Feature::from_str(s).ok_or_else(|| CliError::InvalidView(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments, reading the prefill file.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_view = match &cli.view {
            Some(view) => parse_view_arg(view)?,
            None => Feature::default(),
        };
        let prefill = match &cli.prefill {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };

        Ok(StartupConfig {
            initial_view,
            prefill,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_arg_aliases() {
        assert_eq!(parse_view_arg("notes").unwrap(), Feature::Notes);
        assert_eq!(parse_view_arg("cards").unwrap(), Feature::Flashcards);
        assert_eq!(parse_view_arg("Quiz").unwrap(), Feature::Quiz);
    }

    #[test]
    fn test_parse_view_arg_invalid() {
        let err = parse_view_arg("essay").unwrap_err();
        assert!(err.to_string().contains("Invalid view"));
        assert!(err.to_string().contains("essay"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["studyaid"]);
        assert!(cli.command.is_none());
        assert!(cli.view.is_none());
        assert_eq!(cli.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_parse_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["studyaid", "ping", "--backend-url", "http://example:9000"]);
        assert_eq!(cli.command, Some(Command::Ping));
        assert_eq!(cli.backend_url, "http://example:9000");
    }

    #[test]
    fn test_cli_parse_generate_subcommand() {
        let cli = Cli::parse_from(["studyaid", "flashcards", "-i", "bio.txt", "--export", "csv"]);
        let Some(Command::Flashcards(args)) = &cli.command else {
            panic!("expected flashcards subcommand");
        };
        assert_eq!(args.input, Some(PathBuf::from("bio.txt")));
        assert_eq!(args.export, Some(ExportFormat::Csv));
        assert!(!args.reads_stdin());
        assert_eq!(cli.command.as_ref().unwrap().feature(), Some(Feature::Flashcards));
    }

    #[test]
    fn test_generate_args_dash_reads_stdin() {
        let cli = Cli::parse_from(["studyaid", "notes", "--input", "-"]);
        let Some(Command::Notes(args)) = cli.command else {
            panic!("expected notes subcommand");
        };
        assert!(args.reads_stdin());
    }

    #[test]
    fn test_read_input_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("material.txt");
        std::fs::write(&path, "Photosynthesis converts light").unwrap();

        let args = GenerateArgs {
            input: Some(path),
            export: None,
        };
        assert_eq!(args.read_input().unwrap(), "Photosynthesis converts light");
    }

    #[test]
    fn test_pack_defaults() {
        let cli = Cli::parse_from(["studyaid", "pack", "--topic", "Mitosis"]);
        let Some(Command::Pack(args)) = cli.command else {
            panic!("expected pack subcommand");
        };
        let request = args.to_request().unwrap();
        assert_eq!(request.topic.as_deref(), Some("Mitosis"));
        assert_eq!(request.level, DEFAULT_LEVEL);
        assert!(request.include_quiz);
        assert_eq!(request.num_questions, DEFAULT_NUM_QUESTIONS);
    }

    #[test]
    fn test_pack_no_quiz_and_count() {
        let cli = Cli::parse_from([
            "studyaid",
            "pack",
            "--link",
            "https://example.com/cells",
            "--no-quiz",
            "--num-questions",
            "5",
        ]);
        let Some(Command::Pack(args)) = cli.command else {
            panic!("expected pack subcommand");
        };
        let request = args.to_request().unwrap();
        assert!(!request.include_quiz);
        assert_eq!(request.num_questions, 5);
    }

    #[test]
    fn test_pack_requires_a_source() {
        let cli = Cli::parse_from(["studyaid", "pack", "--topic", "  "]);
        let Some(Command::Pack(args)) = cli.command else {
            panic!("expected pack subcommand");
        };
        assert!(matches!(args.to_request(), Err(CliError::EmptyPack)));
    }

    #[test]
    fn test_startup_config_default_view() {
        let cli = Cli::parse_from(["studyaid"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_view, Feature::Notes);
        assert!(config.prefill.is_none());
    }

    #[test]
    fn test_startup_config_with_view() {
        let cli = Cli::parse_from(["studyaid", "--view", "quiz"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_view, Feature::Quiz);
    }

    #[test]
    fn test_startup_config_invalid_view() {
        let cli = Cli::parse_from(["studyaid", "--view", "invalid"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_startup_config_reads_prefill() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("lecture.txt");
        std::fs::write(&path, "Lecture 3").unwrap();

        let cli = Cli::parse_from(["studyaid", "--prefill", path.to_str().unwrap()]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.prefill.as_deref(), Some("Lecture 3"));
    }
}
