//! Quiz player view-model
//!
//! Quizzes are session-only: they are never cached, and `retry` replays the
//! same questions without asking the backend again.

use thiserror::Error;

use crate::data::{Feature, QuizQuestion};
use crate::fallback::{Generated, GenerationError};

use super::{Notice, RequestToken, RequestTracker};

/// Actions that are not valid in the current quiz state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizActionError {
    #[error("No question is being answered")]
    NoActiveQuestion,

    #[error("This question has already been answered")]
    AlreadyAnswered,

    #[error("Select an answer first")]
    NotAnswered,

    #[error("Option {index} does not exist (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("There is no quiz to retry")]
    NothingToRetry,
}

/// How an option should be rendered after an answer is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFeedback {
    /// No answer selected yet, or an unselected wrong option
    Neutral,
    Correct,
    Incorrect,
}

/// Progress through one run of a quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: usize,
    selected: Option<usize>,
}

impl QuizSession {
    /// Starts a session at the first question; `None` for an empty quiz
    pub fn new(questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            current: 0,
            score: 0,
            selected: None,
        })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The question being answered; `None` once every question is done
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Records the answer for the current question. Returns whether it was correct.
    pub fn select_answer(&mut self, index: usize) -> Result<bool, QuizActionError> {
        let question = self
            .questions
            .get(self.current)
            .ok_or(QuizActionError::NoActiveQuestion)?;
        if self.selected.is_some() {
            return Err(QuizActionError::AlreadyAnswered);
        }
        if index >= question.options.len() {
            return Err(QuizActionError::OptionOutOfRange {
                index,
                len: question.options.len(),
            });
        }

        let correct = question.is_correct(index);
        self.selected = Some(index);
        if correct {
            self.score += 1;
        }
        Ok(correct)
    }

    /// Moves past an answered question. Returns `true` when the quiz is finished.
    pub fn next(&mut self) -> Result<bool, QuizActionError> {
        if self.is_finished() {
            return Err(QuizActionError::NoActiveQuestion);
        }
        if self.selected.is_none() {
            return Err(QuizActionError::NotAnswered);
        }
        self.current += 1;
        self.selected = None;
        Ok(self.is_finished())
    }

    /// Restarts from the first question with a zero score
    pub fn retry(&mut self) {
        self.current = 0;
        self.score = 0;
        self.selected = None;
    }

    /// Feedback for option `index` of the current question
    pub fn option_feedback(&self, index: usize) -> OptionFeedback {
        let (Some(question), Some(selected)) = (self.current_question(), self.selected) else {
            return OptionFeedback::Neutral;
        };
        if question.is_correct(index) {
            OptionFeedback::Correct
        } else if index == selected {
            OptionFeedback::Incorrect
        } else {
            OptionFeedback::Neutral
        }
    }
}

/// Lifecycle of the quiz view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Empty,
    /// A request is in flight; the state before it is kept aside
    Generating { previous: Box<QuizState> },
    Answering(QuizSession),
    Complete(QuizSession),
}

/// State behind the quiz generator screen
#[derive(Debug)]
pub struct QuizView {
    pub input: String,
    state: QuizState,
    tracker: RequestTracker,
}

impl Default for QuizView {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizView {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: QuizState::Empty,
            tracker: RequestTracker::new(),
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// The session being answered or just completed
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Answering(session) | QuizState::Complete(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, QuizState::Generating { .. })
    }

    pub fn can_generate(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Starts a generation request, superseding any request in flight
    pub fn begin_generate(&mut self) -> Result<RequestToken, GenerationError> {
        if !self.can_generate() {
            return Err(GenerationError::EmptyInput);
        }
        let previous = match std::mem::replace(&mut self.state, QuizState::Empty) {
            QuizState::Generating { previous } => previous,
            other => Box::new(other),
        };
        self.state = QuizState::Generating { previous };
        Ok(self.tracker.issue())
    }

    /// Applies a generation outcome. Returns `None` when the outcome is stale.
    pub fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<Generated<Vec<QuizQuestion>>, GenerationError>,
    ) -> Option<Notice> {
        if !self.tracker.accept(token) {
            return None;
        }

        let previous = match std::mem::replace(&mut self.state, QuizState::Empty) {
            QuizState::Generating { previous } => *previous,
            other => other,
        };

        let notice = match outcome {
            Ok(generated) => {
                let count = generated.artifact.len();
                match QuizSession::new(generated.artifact) {
                    Some(session) => {
                        self.state = QuizState::Answering(session);
                        Notice::info("Quiz ready!", format!("Generated {} questions.", count))
                    }
                    None => Notice::info("No questions", "The backend returned an empty quiz."),
                }
            }
            Err(error) => {
                self.state = previous;
                match error {
                    GenerationError::EmptyInput => Notice::from_error(Feature::Quiz, &error),
                    GenerationError::Unavailable { .. } => {
                        Notice::error("Error", "Could not generate quiz.")
                    }
                }
            }
        };
        Some(notice)
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn select_answer(&mut self, index: usize) -> Result<bool, QuizActionError> {
        match &mut self.state {
            QuizState::Answering(session) => session.select_answer(index),
            _ => Err(QuizActionError::NoActiveQuestion),
        }
    }

    /// Moves to the next question, completing the quiz after the last one
    pub fn next(&mut self) -> Result<(), QuizActionError> {
        let QuizState::Answering(session) = &mut self.state else {
            return Err(QuizActionError::NoActiveQuestion);
        };
        if session.next()? {
            if let QuizState::Answering(session) =
                std::mem::replace(&mut self.state, QuizState::Empty)
            {
                self.state = QuizState::Complete(session);
            }
        }
        Ok(())
    }

    /// Replays the current quiz from the start without regenerating it
    pub fn retry(&mut self) -> Result<(), QuizActionError> {
        match std::mem::replace(&mut self.state, QuizState::Empty) {
            QuizState::Answering(mut session) | QuizState::Complete(mut session) => {
                session.retry();
                self.state = QuizState::Answering(session);
                Ok(())
            }
            other => {
                self.state = other;
                Err(QuizActionError::NothingToRetry)
            }
        }
    }
}
