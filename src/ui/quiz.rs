//! Quiz rendering
//!
//! Options are numbered for the `1`-`9` answer keys. Once an answer is
//! selected, the correct option turns green and a wrong pick turns red.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::features::{OptionFeedback, QuizSession, QuizState, QuizView};

use super::render_placeholder;

const TITLE: &str = " Quiz ";

pub fn render(frame: &mut Frame, view: &QuizView, area: Rect) {
    match view.state() {
        QuizState::Generating { .. } => render_placeholder(frame, area, TITLE, "Generating quiz..."),
        QuizState::Answering(session) => render_question(frame, session, area),
        QuizState::Complete(session) => render_complete(frame, session, area),
        QuizState::Empty => render_placeholder(
            frame,
            area,
            TITLE,
            "Add your content above and press g to generate a quiz.",
        ),
    }
}

fn feedback_style(feedback: OptionFeedback) -> Style {
    match feedback {
        OptionFeedback::Neutral => Style::default(),
        OptionFeedback::Correct => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        OptionFeedback::Incorrect => Style::default().fg(Color::Red),
    }
}

fn render_question(frame: &mut Frame, session: &QuizSession, area: Rect) {
    let Some(question) = session.current_question() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            question.question.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (index, option) in question.options.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("  {}. {}", index + 1, option),
            feedback_style(session.option_feedback(index)),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Score: {} / {}", session.score(), session.total()),
        Style::default().fg(Color::DarkGray),
    )));
    if session.selected().is_some() {
        lines.push(Line::from(Span::styled(
            "Press Enter for the next question",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(format!(
            " Question {} of {} ",
            session.current_index() + 1,
            session.total()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_complete(frame: &mut Frame, session: &QuizSession, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Quiz complete!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "You scored {} out of {}",
            session.score(),
            session.total()
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry or g for a new quiz",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(TITLE).borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
