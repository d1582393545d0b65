//! Study backend API client
//!
//! This module issues generation requests to the AI backend and parses the
//! responses into typed artifacts. Exactly one network attempt is made per
//! call; retries and caching are left to the caller.

use std::collections::HashSet;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{Feature, Flashcard, GeneratedNotes, QuizQuestion, StudyPackRequest};

/// Default backend location, matching the development server
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Errors that can occur when talking to the study backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not valid JSON for the endpoint
    #[error("Failed to parse backend response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but violated the artifact invariants
    #[error("Invalid backend response: {0}")]
    Schema(String),

    /// Local file for an upload could not be read
    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Request body shared by the notes, flashcards, and quiz endpoints
#[derive(Debug, Serialize)]
struct ContentRequest<'a> {
    content: &'a str,
}

/// `POST /notes` response
#[derive(Debug, Deserialize)]
struct NotesResponse {
    notes: String,
}

/// `POST /flashcards` response
#[derive(Debug, Deserialize)]
struct FlashcardsResponse {
    flashcards: Vec<FlashcardItem>,
}

#[derive(Debug, Deserialize)]
struct FlashcardItem {
    id: Option<i64>,
    front: String,
    back: String,
}

/// `POST /quiz` response
#[derive(Debug, Deserialize)]
struct QuizResponse {
    quiz: Vec<QuizItem>,
}

#[derive(Debug, Deserialize)]
struct QuizItem {
    id: Option<i64>,
    question: String,
    #[serde(default)]
    options: Vec<String>,
    answer: String,
}

/// `GET /ping` response
#[derive(Debug, Deserialize)]
struct PingResponse {
    message: String,
}

/// Client for the study generation backend
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http_client: Client,
    base_url: String,
}

impl Default for GenerationClient {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl GenerationClient {
    /// Creates a new client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a new client with a custom HTTP client
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    /// The backend base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Generates study notes for the given content
    pub async fn request_notes(&self, text: &str) -> Result<GeneratedNotes, BackendError> {
        let response: NotesResponse = self.post_content(Feature::Notes, text).await?;
        Ok(response.notes)
    }

    /// Generates a flashcard set for the given content
    ///
    /// Cards without an `id` are assigned their zero-based position in the
    /// response. Duplicate ids are rejected.
    pub async fn request_flashcards(&self, text: &str) -> Result<Vec<Flashcard>, BackendError> {
        let response: FlashcardsResponse = self.post_content(Feature::Flashcards, text).await?;
        parse_flashcards(response.flashcards)
    }

    /// Generates a quiz for the given content
    ///
    /// Questions without `options` get an empty option list.
    pub async fn request_quiz(&self, text: &str) -> Result<Vec<QuizQuestion>, BackendError> {
        let response: QuizResponse = self.post_content(Feature::Quiz, text).await?;
        parse_quiz(response.quiz)
    }

    /// Checks that the backend is reachable
    pub async fn ping(&self) -> Result<String, BackendError> {
        let response = self.http_client.get(self.url("/ping")).send().await?;
        let response: PingResponse = read_json(response).await?;
        Ok(response.message)
    }

    /// Requests a combined study pack through the multipart `/generate` endpoint
    ///
    /// The response shape is defined by the backend and returned untouched.
    pub async fn generate_study_pack(
        &self,
        request: &StudyPackRequest,
    ) -> Result<serde_json::Value, BackendError> {
        let form = request.to_form().await?;
        debug!(url = %self.url("/generate"), "Requesting study pack");

        let response = self
            .http_client
            .post(self.url("/generate"))
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    async fn post_content<T: DeserializeOwned>(
        &self,
        feature: Feature,
        text: &str,
    ) -> Result<T, BackendError> {
        let url = self.url(feature.endpoint());
        debug!(%feature, %url, chars = text.len(), "Sending generation request");

        let response = self
            .http_client
            .post(&url)
            .json(&ContentRequest { content: text })
            .send()
            .await?;

        read_json(response).await.inspect_err(|e| {
            warn!(%feature, error = %e, "Generation request failed");
        })
    }
}

/// Checks the status and decodes the body of a backend response
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}

fn parse_flashcards(items: Vec<FlashcardItem>) -> Result<Vec<Flashcard>, BackendError> {
    let cards: Vec<Flashcard> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| Flashcard {
            id: item.id.unwrap_or(index as i64),
            front: item.front,
            back: item.back,
        })
        .collect();

    let mut seen = HashSet::with_capacity(cards.len());
    if let Some(card) = cards.iter().find(|card| !seen.insert(card.id)) {
        return Err(BackendError::Schema(format!(
            "duplicate flashcard id {}",
            card.id
        )));
    }

    Ok(cards)
}

fn parse_quiz(items: Vec<QuizItem>) -> Result<Vec<QuizQuestion>, BackendError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            // An empty option list is tolerated; otherwise the answer must be
            // exactly one of the options.
            let matches = item.options.iter().filter(|o| **o == item.answer).count();
            if !item.options.is_empty() && matches != 1 {
                return Err(BackendError::Schema(format!(
                    "question {} has {} options equal to its answer",
                    index, matches
                )));
            }

            Ok(QuizQuestion {
                id: item.id.unwrap_or(index as i64),
                question: item.question,
                options: item.options,
                answer: item.answer,
            })
        })
        .collect()
}
