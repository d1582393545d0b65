//! Background generation worker
//!
//! Runs fallback generations on tokio tasks and reports each outcome over a
//! channel, tagged with the request token, so the main loop can apply results
//! without blocking on the network.

use tokio::sync::mpsc;
use tracing::debug;

use crate::data::{Feature, Flashcard, GeneratedNotes, QuizQuestion};
use crate::fallback::{FallbackController, Generated, GenerationError};
use crate::features::RequestToken;

/// Result of one generation, by feature
#[derive(Debug)]
pub enum GenerationOutcome {
    Notes(Result<Generated<GeneratedNotes>, GenerationError>),
    Flashcards(Result<Generated<Vec<Flashcard>>, GenerationError>),
    Quiz(Result<Generated<Vec<QuizQuestion>>, GenerationError>),
}

impl GenerationOutcome {
    pub fn feature(&self) -> Feature {
        match self {
            GenerationOutcome::Notes(_) => Feature::Notes,
            GenerationOutcome::Flashcards(_) => Feature::Flashcards,
            GenerationOutcome::Quiz(_) => Feature::Quiz,
        }
    }
}

/// Message sent from a generation task to the main loop
#[derive(Debug)]
pub struct GenerationMessage {
    pub token: RequestToken,
    pub outcome: GenerationOutcome,
}

/// Spawns generation tasks and collects their outcomes
pub struct GenerationWorker {
    controller: FallbackController,
    sender: mpsc::Sender<GenerationMessage>,
    /// Channel for receiving generation outcomes
    receiver: mpsc::Receiver<GenerationMessage>,
}

impl GenerationWorker {
    pub fn new(controller: FallbackController) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            controller,
            sender,
            receiver,
        }
    }

    pub fn controller(&self) -> &FallbackController {
        &self.controller
    }

    /// Starts generating `feature` for `text` on a background task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, feature: Feature, token: RequestToken, text: String) {
        let controller = self.controller.clone();
        let tx = self.sender.clone();

        debug!(%feature, token = token.value(), "Spawning generation task");
        tokio::spawn(async move {
            let outcome = match feature {
                Feature::Notes => GenerationOutcome::Notes(controller.notes(&text).await),
                Feature::Flashcards => {
                    GenerationOutcome::Flashcards(controller.flashcards(&text).await)
                }
                Feature::Quiz => GenerationOutcome::Quiz(controller.quiz(&text).await),
            };

            if tx.send(GenerationMessage { token, outcome }).await.is_err() {
                debug!(%feature, "Receiver dropped before generation finished");
            }
        });
    }

    /// Checks for a finished generation without blocking
    pub fn try_recv(&mut self) -> Option<GenerationMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished generation
    pub async fn recv(&mut self) -> Option<GenerationMessage> {
        self.receiver.recv().await
    }
}
