//! Core data models for StudyAid
//!
//! This module contains the artifact types produced by the generation backend
//! (notes, flashcards, quiz questions) and the `Feature` selector that ties each
//! artifact to its endpoint and cache key.

pub mod client;
pub mod pack;

pub use client::{BackendError, GenerationClient, DEFAULT_BACKEND_URL};
pub use pack::StudyPackRequest;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generated study notes, treated as opaque markdown or plain text
pub type GeneratedNotes = String;

/// One of the three generation features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    #[default]
    Notes,
    Flashcards,
    Quiz,
}

impl Feature {
    /// All features in display order
    pub const ALL: [Feature; 3] = [Feature::Notes, Feature::Flashcards, Feature::Quiz];

    /// Backend endpoint path for this feature
    pub fn endpoint(self) -> &'static str {
        match self {
            Feature::Notes => "/notes",
            Feature::Flashcards => "/flashcards",
            Feature::Quiz => "/quiz",
        }
    }

    /// Cache key holding the last successful artifact.
    ///
    /// Quiz results are session-only and have no cache slot.
    pub fn cache_key(self) -> Option<&'static str> {
        match self {
            Feature::Notes => Some("generatedNotes"),
            Feature::Flashcards => Some("flashcards"),
            Feature::Quiz => None,
        }
    }

    /// Human-readable name used in notices and titles
    pub fn label(self) -> &'static str {
        match self {
            Feature::Notes => "notes",
            Feature::Flashcards => "flashcards",
            Feature::Quiz => "quiz",
        }
    }

    /// Parses a feature name, accepting a few aliases
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "notes" | "note" => Some(Feature::Notes),
            "flashcards" | "flashcard" | "cards" => Some(Feature::Flashcards),
            "quiz" | "quizzes" => Some(Feature::Quiz),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Identifier, unique within a set
    pub id: i64,
    /// Prompt side of the card
    pub front: String,
    /// Answer side of the card
    pub back: String,
}

/// A single multiple-choice quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    /// Answer choices in display order
    pub options: Vec<String>,
    /// The correct choice; compared to options by exact string equality
    pub answer: String,
}

impl QuizQuestion {
    /// Whether the option at `index` is the correct answer
    pub fn is_correct(&self, index: usize) -> bool {
        self.options
            .get(index)
            .is_some_and(|option| *option == self.answer)
    }
}

/// The feature-specific output of a generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Notes(GeneratedNotes),
    Flashcards(Vec<Flashcard>),
    Quiz(Vec<QuizQuestion>),
}

impl Artifact {
    /// The feature that produced this artifact
    pub fn feature(&self) -> Feature {
        match self {
            Artifact::Notes(_) => Feature::Notes,
            Artifact::Flashcards(_) => Feature::Flashcards,
            Artifact::Quiz(_) => Feature::Quiz,
        }
    }
}
