//! Login screen view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{LoginAction, LoginState};
use crate::render::{SPINNER_FRAMES, render_card};
use crate::state::AppState;

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 14;

pub fn render_login(frame: &mut Frame, app: &AppState, area: Rect) {
    let inner = render_card(frame, area, "portal", CARD_WIDTH, CARD_HEIGHT);
    let pending = app.tasks.google_sign_in.is_running();

    let mut lines = vec![
        Line::from(Span::styled(
            "Sign in to continue",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(menu_lines(&app.login, pending));
    lines.push(Line::from(""));

    if pending {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        lines.push(Line::from(Span::styled(
            format!("{spinner} Waiting for Google sign-in in your browser (Esc to cancel)"),
            Style::default().fg(Color::Yellow),
        )));
        if let Some(url) = &app.login.auth_url {
            lines.push(Line::from(Span::styled(
                url.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(Span::styled(
        "↑/↓ select · Enter choose · g Google · u guest · q quit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        inner,
    );
}

fn menu_lines(login: &LoginState, pending: bool) -> Vec<Line<'static>> {
    LoginAction::ALL
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let selected = idx == login.selected;
            let marker = if selected { "› " } else { "  " };
            let disabled = *action == LoginAction::Google && (!login.google_ready || pending);

            let mut style = Style::default();
            if disabled {
                style = style.fg(Color::DarkGray);
            } else if selected {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }

            let mut spans = vec![Span::styled(format!("{marker}{}", action.label()), style)];
            if *action == LoginAction::Google && !login.google_ready {
                spans.push(Span::styled(
                    "  (set google.client_id)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}
