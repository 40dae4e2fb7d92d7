use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, DetailState, EditField, Screen};

pub fn render_detail(f: &mut Frame, area: Rect, app: &AppState) {
    let Screen::Detail { id, state, .. } = &app.screen else {
        return;
    };

    let block = Block::default()
        .title(format!("Member {id}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let lines: Vec<Line> = match state {
        DetailState::Loading => vec![
            Line::raw(""),
            Line::styled("Loading…", Style::default().fg(app.theme.text)),
        ],
        DetailState::NotFound => vec![
            Line::raw(""),
            Line::styled(
                "Member not found.",
                Style::default().fg(app.theme.err).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled("Esc / Enter: back", Style::default().fg(app.theme.text)),
        ],
        DetailState::Viewing(u) => vec![
            Line::raw(""),
            field_line(app, "Name", &u.full_name()),
            field_line(app, "Email", &u.email),
            field_line(app, "Avatar", &u.avatar),
            Line::raw(""),
            Line::styled("e: edit   Esc: back", Style::default().fg(app.theme.text)),
        ],
        DetailState::Editing { draft, .. } => {
            let mut lines = vec![Line::raw("")];
            for (field, value) in [
                (EditField::FirstName, &draft.first_name),
                (EditField::LastName, &draft.last_name),
                (EditField::Email, &draft.email),
            ] {
                let marker = if draft.focus == field { "▶ " } else { "  " };
                let style = if draft.focus == field {
                    Style::default()
                        .fg(app.theme.highlight)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(app.theme.text)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{marker}{:<11}", field.label()), style),
                    Span::styled(value.clone(), Style::default().fg(app.theme.text)),
                ]));
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Tab: next field   Enter: save   Esc: cancel",
                Style::default().fg(app.theme.text),
            ));
            lines
        }
    };

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(p, area);
}

fn field_line(app: &AppState, label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {label:<9}"),
            Style::default().fg(app.theme.title),
        ),
        Span::styled(value.to_string(), Style::default().fg(app.theme.text)),
    ])
}
