//! UI rendering module for studyaid
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod flashcards;
pub mod help_overlay;
pub mod notes;
pub mod quiz;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::data::Feature;
use crate::features::NoticeLevel;

pub use help_overlay::render as render_help_overlay;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    render_input(frame, app, body[0]);
    match app.current_view {
        Feature::Notes => notes::render(frame, &app.notes, body[1]),
        Feature::Flashcards => flashcards::render(frame, &app.flashcards, body[1]),
        Feature::Quiz => quiz::render(frame, &app.quiz, body[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Feature::ALL
        .iter()
        .map(|feature| Line::from(tab_title(*feature)))
        .collect();
    let selected = Feature::ALL
        .iter()
        .position(|f| *f == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" studyaid "))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn tab_title(feature: Feature) -> &'static str {
    match feature {
        Feature::Notes => "Notes",
        Feature::Flashcards => "Flashcards",
        Feature::Quiz => "Quiz",
    }
}

/// Input box for the view on screen, highlighted while editing
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == InputMode::Editing;
    let (title, border) = if editing {
        (" Content (editing, Esc to finish) ", Color::Yellow)
    } else {
        (" Content (i to edit) ", Color::DarkGray)
    };

    let input = app.current_input();
    let paragraph = if input.is_empty() && !editing {
        Paragraph::new(Span::styled(
            "Paste or type your study material here...",
            Style::default().fg(Color::DarkGray),
        ))
    } else if editing {
        Paragraph::new(format!("{}_", input))
    } else {
        Paragraph::new(input.to_string())
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
}

/// Last notice, or key hints when there is none
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Cyan,
                NoticeLevel::Degraded => Color::Yellow,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", notice.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(notice.message.clone()),
            ])
        }
        None => Line::from(Span::styled(
            key_hints(app.current_view),
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn key_hints(view: Feature) -> &'static str {
    match view {
        Feature::Notes => "g generate  m/t export md/txt  y copy  Tab switch  ? help  q quit",
        Feature::Flashcards => {
            "g generate  space flip  h/l prev/next  s shuffle  e/t export  ? help  q quit"
        }
        Feature::Quiz => "g generate  1-9 answer  Enter next  r retry  ? help  q quit",
    }
}

/// Renders a centered one-line placeholder inside a titled block
pub(crate) fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
    .block(Block::default().title(title.to_string()).borders(Borders::ALL))
    .alignment(ratatui::layout::Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
