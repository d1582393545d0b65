//! Flashcard deck rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::features::{Deck, FlashcardsState, FlashcardsView};

use super::render_placeholder;

const TITLE: &str = " Flashcards ";

pub fn render(frame: &mut Frame, view: &FlashcardsView, area: Rect) {
    match view.state() {
        FlashcardsState::Generating { .. } => {
            render_placeholder(frame, area, TITLE, "Generating flashcards...")
        }
        FlashcardsState::Viewing(deck) => render_deck(frame, deck, area),
        FlashcardsState::Empty => render_placeholder(
            frame,
            area,
            TITLE,
            "Add your content above and press g to create flashcards.",
        ),
    }
}

fn render_deck(frame: &mut Frame, deck: &Deck, area: Rect) {
    let (position, total) = deck.progress();
    let (side, color) = if deck.is_flipped() {
        ("Answer", Color::Green)
    } else {
        ("Question", Color::Cyan)
    };

    let block = Block::default()
        .title(format!(" Card {} / {} ", position, total))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let label = Paragraph::new(Span::styled(
        side,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(label, chunks[0]);

    let text = Paragraph::new(Line::from(deck.visible_text().to_string()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, chunks[1]);

    let hint = Paragraph::new(Span::styled(
        "Space to flip",
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[2]);
}
