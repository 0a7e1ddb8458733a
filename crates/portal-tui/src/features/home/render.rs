//! Home screen view.

use portal_core::session::home_lines;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::render::{SPINNER_FRAMES, render_card};
use crate::state::AppState;

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 12;

pub fn render_home(frame: &mut Frame, app: &AppState, area: Rect) {
    let inner = render_card(frame, area, "Home", CARD_WIDTH, CARD_HEIGHT);
    let home = &app.home;

    let mut lines = Vec::new();
    if home.resolving {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        lines.push(Line::from(Span::styled(
            format!("{spinner} Loading profile"),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        let mut text = home_lines(home.profile.as_ref()).into_iter();
        if let Some(greeting) = text.next() {
            lines.push(Line::from(Span::styled(
                greeting,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        lines.extend(text.map(Line::from));
    }

    if let Some(notice) = &home.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }

    if home.signed_out {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Signed out.",
            Style::default().fg(Color::Green),
        )));
    }

    lines.push(Line::from(""));
    let hint = if home.image_url().is_some() {
        "l logout · o open image · q quit"
    } else {
        "l logout · q quit"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
