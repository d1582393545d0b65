//! Generation with offline fallback
//!
//! `FallbackController` wraps the generation client with the only
//! error-recovery policy in the application: a successful generation is
//! written through to the cache, and a failed one is answered from the cache
//! when an earlier artifact exists. Quiz generation has no cache slot, so a
//! quiz failure is always surfaced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::cache::Cache;
use crate::data::{
    Artifact, BackendError, Feature, Flashcard, GeneratedNotes, GenerationClient, QuizQuestion,
};

/// Errors surfaced by a generation attempt
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Input was empty or whitespace; no request was made
    #[error("No content provided. Enter some text first!")]
    EmptyInput,

    /// The backend failed and no cached artifact could stand in
    #[error("Failed to generate {feature}: {source}")]
    Unavailable {
        feature: Feature,
        #[source]
        source: BackendError,
    },
}

/// Where a returned artifact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Fresh from the backend
    Live,
    /// Served from the cache because the backend call failed (degraded mode)
    Cache {
        /// When the cached entry was written, if known
        cached_at: Option<DateTime<Utc>>,
    },
}

/// An artifact tagged with its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    pub artifact: T,
    pub source: Source,
}

impl<T> Generated<T> {
    pub fn live(artifact: T) -> Self {
        Self {
            artifact,
            source: Source::Live,
        }
    }

    /// Whether this artifact was served from the cache
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, Source::Cache { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            artifact: f(self.artifact),
            source: self.source,
        }
    }
}

/// Artifacts that have a cache slot and a string encoding for it
trait CachedArtifact: Sized {
    fn encode(&self) -> Result<String, serde_json::Error>;
    fn decode(raw: &str) -> Option<Self>;
}

impl CachedArtifact for GeneratedNotes {
    fn encode(&self) -> Result<String, serde_json::Error> {
        Ok(self.clone())
    }

    fn decode(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| raw.to_string())
    }
}

impl CachedArtifact for Vec<Flashcard> {
    fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw)
            .inspect_err(|e| warn!(error = %e, "Cached flashcards are unreadable"))
            .ok()
    }
}

fn load<T: CachedArtifact>(cache: &dyn Cache, feature: Feature) -> Option<Generated<T>> {
    let key = feature.cache_key()?;
    let artifact = T::decode(&cache.get(key)?)?;
    Some(Generated {
        artifact,
        source: Source::Cache {
            cached_at: cache.cached_at(key),
        },
    })
}

/// Reads the cached notes, if any
pub fn cached_notes(cache: &dyn Cache) -> Option<Generated<GeneratedNotes>> {
    load(cache, Feature::Notes)
}

/// Reads the cached flashcard set, if any
pub fn cached_flashcards(cache: &dyn Cache) -> Option<Generated<Vec<Flashcard>>> {
    load(cache, Feature::Flashcards)
}

fn validate(text: &str) -> Result<&str, GenerationError> {
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyInput);
    }
    Ok(text)
}

/// Runs generation calls with write-through caching and cache fallback
#[derive(Clone)]
pub struct FallbackController {
    client: GenerationClient,
    cache: Arc<dyn Cache>,
}

impl FallbackController {
    pub fn new(client: GenerationClient, cache: Arc<dyn Cache>) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    /// Generates the artifact for `feature`, falling back to the cache on failure
    pub async fn generate_with_fallback(
        &self,
        feature: Feature,
        text: &str,
    ) -> Result<Generated<Artifact>, GenerationError> {
        match feature {
            Feature::Notes => self.notes(text).await.map(|g| g.map(Artifact::Notes)),
            Feature::Flashcards => self
                .flashcards(text)
                .await
                .map(|g| g.map(Artifact::Flashcards)),
            Feature::Quiz => self.quiz(text).await.map(|g| g.map(Artifact::Quiz)),
        }
    }

    pub async fn notes(&self, text: &str) -> Result<Generated<GeneratedNotes>, GenerationError> {
        let text = validate(text)?;
        let result = self.client.request_notes(text).await;
        self.settle(Feature::Notes, result)
    }

    pub async fn flashcards(
        &self,
        text: &str,
    ) -> Result<Generated<Vec<Flashcard>>, GenerationError> {
        let text = validate(text)?;
        let result = self.client.request_flashcards(text).await;
        self.settle(Feature::Flashcards, result)
    }

    /// Generates a quiz; there is no cached fallback for quizzes
    pub async fn quiz(&self, text: &str) -> Result<Generated<Vec<QuizQuestion>>, GenerationError> {
        let text = validate(text)?;
        match self.client.request_quiz(text).await {
            Ok(questions) => {
                info!(questions = questions.len(), "Generated quiz");
                Ok(Generated::live(questions))
            }
            Err(source) => {
                error!(error = %source, "Quiz generation failed");
                Err(GenerationError::Unavailable {
                    feature: Feature::Quiz,
                    source,
                })
            }
        }
    }

    fn settle<T: CachedArtifact>(
        &self,
        feature: Feature,
        result: Result<T, BackendError>,
    ) -> Result<Generated<T>, GenerationError> {
        match result {
            Ok(artifact) => {
                self.store(feature, &artifact);
                info!(%feature, "Generated from backend");
                Ok(Generated::live(artifact))
            }
            Err(source) => match load::<T>(self.cache.as_ref(), feature) {
                Some(cached) => {
                    warn!(%feature, error = %source, "Backend failed, serving cached copy");
                    Ok(cached)
                }
                None => {
                    error!(%feature, error = %source, "Backend failed and nothing is cached");
                    Err(GenerationError::Unavailable { feature, source })
                }
            },
        }
    }

    fn store<T: CachedArtifact>(&self, feature: Feature, artifact: &T) {
        let Some(key) = feature.cache_key() else {
            return;
        };

        let written = artifact
            .encode()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .and_then(|value| self.cache.put(key, &value));

        if let Err(e) = written {
            warn!(%feature, error = %e, "Failed to cache generated artifact");
        }
    }
}
