//! Flashcard viewer view-model
//!
//! A `Deck` is never empty, so `0 <= current < len` holds for as long as the
//! view is in `Viewing`. Navigation wraps in both directions.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cache::Cache;
use crate::data::{Feature, Flashcard};
use crate::export::{self, ExportError, ExportFile, ExportFormat};
use crate::fallback::{self, Generated, GenerationError};

use super::{Notice, RequestToken, RequestTracker};

/// A non-empty flashcard set with a cursor and flip state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
}

impl Deck {
    /// Creates a deck positioned at the first card; `None` for an empty set
    pub fn new(cards: Vec<Flashcard>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            cards,
            current: 0,
            flipped: false,
        })
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; decks are non-empty by construction
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current_card(&self) -> &Flashcard {
        &self.cards[self.current]
    }

    /// Text of the visible side of the current card
    pub fn visible_text(&self) -> &str {
        let card = self.current_card();
        if self.flipped {
            &card.back
        } else {
            &card.front
        }
    }

    /// One-based position and total, as in "Card 1 of 5"
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, self.cards.len())
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Advances to the next card, wrapping to the first
    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.cards.len();
        self.flipped = false;
    }

    /// Goes back to the previous card, wrapping to the last
    pub fn prev(&mut self) {
        let len = self.cards.len();
        self.current = (self.current + len - 1) % len;
        self.flipped = false;
    }

    /// Randomly permutes the cards and returns to the first, front side up
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.current = 0;
        self.flipped = false;
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }
}

/// Lifecycle of the flashcard view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashcardsState {
    Empty,
    /// A request is in flight; the deck on display before it is kept aside
    Generating { previous: Option<Deck> },
    Viewing(Deck),
}

/// State behind the flashcard creator screen
#[derive(Debug)]
pub struct FlashcardsView {
    pub input: String,
    state: FlashcardsState,
    tracker: RequestTracker,
}

impl Default for FlashcardsView {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardsView {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: FlashcardsState::Empty,
            tracker: RequestTracker::new(),
        }
    }

    /// Creates the view, showing cached flashcards if there are any
    pub fn mount(cache: &dyn Cache) -> (Self, Option<Notice>) {
        let mut view = Self::new();
        match fallback::cached_flashcards(cache).and_then(|cached| Deck::new(cached.artifact)) {
            Some(deck) => {
                view.state = FlashcardsState::Viewing(deck);
                (
                    view,
                    Some(Notice::info("Loaded cached flashcards", "Offline mode enabled")),
                )
            }
            None => (view, None),
        }
    }

    pub fn state(&self) -> &FlashcardsState {
        &self.state
    }

    /// The deck being viewed, if any
    pub fn deck(&self) -> Option<&Deck> {
        match &self.state {
            FlashcardsState::Viewing(deck) => Some(deck),
            _ => None,
        }
    }

    fn deck_mut(&mut self) -> Option<&mut Deck> {
        match &mut self.state {
            FlashcardsState::Viewing(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, FlashcardsState::Generating { .. })
    }

    pub fn can_generate(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Starts a generation request, superseding any request in flight
    pub fn begin_generate(&mut self) -> Result<RequestToken, GenerationError> {
        if !self.can_generate() {
            return Err(GenerationError::EmptyInput);
        }
        let previous = match std::mem::replace(&mut self.state, FlashcardsState::Empty) {
            FlashcardsState::Viewing(deck) => Some(deck),
            FlashcardsState::Generating { previous } => previous,
            FlashcardsState::Empty => None,
        };
        self.state = FlashcardsState::Generating { previous };
        Ok(self.tracker.issue())
    }

    /// Applies a generation outcome. Returns `None` when the outcome is stale.
    pub fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<Generated<Vec<Flashcard>>, GenerationError>,
    ) -> Option<Notice> {
        if !self.tracker.accept(token) {
            return None;
        }

        let previous = match std::mem::replace(&mut self.state, FlashcardsState::Empty) {
            FlashcardsState::Generating { previous } => previous,
            FlashcardsState::Viewing(deck) => Some(deck),
            FlashcardsState::Empty => None,
        };

        match outcome {
            Ok(generated) => {
                let degraded = generated.is_degraded();
                let source = generated.source;
                let count = generated.artifact.len();
                let notice = match Deck::new(generated.artifact) {
                    Some(deck) => {
                        self.state = FlashcardsState::Viewing(deck);
                        if degraded {
                            Notice::degraded(Feature::Flashcards, source)
                        } else {
                            Notice::info("Flashcards ready!", format!("Generated {} cards.", count))
                        }
                    }
                    None => Notice::info("No flashcards", "The backend returned an empty set."),
                };
                Some(notice)
            }
            Err(error) => {
                if let Some(deck) = previous {
                    self.state = FlashcardsState::Viewing(deck);
                }
                Some(Notice::from_error(Feature::Flashcards, &error))
            }
        }
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn flip(&mut self) {
        if let Some(deck) = self.deck_mut() {
            deck.flip();
        }
    }

    pub fn next(&mut self) {
        if let Some(deck) = self.deck_mut() {
            deck.next();
        }
    }

    pub fn prev(&mut self) {
        if let Some(deck) = self.deck_mut() {
            deck.prev();
        }
    }

    /// Shuffles the deck locally; nothing is requested or cached
    pub fn shuffle(&mut self) -> Option<Notice> {
        let deck = self.deck_mut()?;
        deck.shuffle();
        Some(Notice::info("Shuffled", "Cards randomized for better learning."))
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, ExportError> {
        let cards = self.deck().map(Deck::cards).unwrap_or_default();
        export::flashcards_file(cards, format)
    }
}
