//! Notes view rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::features::{NotesStatus, NotesView};

use super::render_placeholder;

const TITLE: &str = " Study Notes ";

pub fn render(frame: &mut Frame, view: &NotesView, area: Rect) {
    match (view.status(), view.notes()) {
        (NotesStatus::Generating, _) => {
            render_placeholder(frame, area, TITLE, "Generating notes...")
        }
        (_, Some(notes)) => {
            let border = if view.status() == NotesStatus::Error {
                Color::Red
            } else {
                Color::Green
            };
            let paragraph = Paragraph::new(notes.to_string())
                .block(
                    Block::default()
                        .title(TITLE)
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
        (NotesStatus::Error, None) => render_placeholder(
            frame,
            area,
            TITLE,
            "Could not generate notes. Press g to try again.",
        ),
        _ => render_placeholder(
            frame,
            area,
            TITLE,
            "Add your content above and press g to generate notes.",
        ),
    }
}
