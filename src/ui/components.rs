//! Shared UI components (status bar, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, Keymap, NoticeLevel};
use crate::form::{FormField, NewMemberForm};

/// Render the bottom status bar with mode, counts and the current notice.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
        InputMode::Edit => "EDIT",
    };
    let mut spans = vec![Span::raw(format!(
        "mode: {mode}  members:{}/{}  rows/page:{}",
        app.visible.len(),
        app.registry.len(),
        app.rows_per_page
    ))];
    if let Some(notice) = app.active_notice() {
        let color = match notice.level {
            NoticeLevel::Info => app.theme.ok,
            NoticeLevel::Error => app.theme.err,
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    let p = Paragraph::new(Line::from(spans)).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the "new member" form modal with per-field errors inline.
pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, form: &NewMemberForm) {
    let fields = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Avatar,
    ];

    let mut lines: Vec<Line> = vec![Line::raw("")];
    for field in fields {
        let value = match field {
            FormField::FirstName => &form.draft.first_name,
            FormField::LastName => &form.draft.last_name,
            FormField::Email => &form.draft.email,
            FormField::Avatar => &form.draft.avatar,
        };
        let marker = if form.focus == field { "▶ " } else { "  " };
        let style = if form.focus == field {
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
        if let Some(err) = form.errors.for_field(field) {
            lines.push(Line::styled(
                format!("    {err}"),
                Style::default().fg(app.theme.err),
            ));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab: next field   Enter: add   Esc: cancel",
        Style::default().fg(app.theme.text),
    ));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));
    let rect = centered_rect(56, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("New member")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the delete confirmation. `selected` 0 is Yes, 1 is No.
pub fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, name: &str, selected: usize) {
    let rect = centered_rect(46, 7, area);
    let pick = |idx: usize, label: &str| {
        if selected == idx {
            Span::styled(
                format!("▶ {label}"),
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!("  {label}"), Style::default().fg(app.theme.text))
        }
    };
    let lines = vec![
        Line::raw(""),
        Line::styled(
            format!("Remove {name} from the directory?"),
            Style::default().fg(app.theme.text),
        ),
        Line::raw(""),
        Line::from(vec![pick(0, "Yes"), Span::raw("    "), pick(1, "No")]),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Collect the active bindings into (label, keys) rows for the help
/// modal: general commands first, then navigation. Multiple keys bound to
/// the same action are joined, duplicates collapse.
fn help_rows(keymap: &Keymap) -> (Vec<(&'static str, String)>, Vec<(&'static str, String)>) {
    use std::collections::{BTreeMap, BTreeSet};

    let mut general: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in keymap.all_bindings() {
        let key = Keymap::format_key(mods, code);
        let (section, label) = match action {
            KeyAction::Quit => (&mut general, "Quit"),
            KeyAction::StartSearch => (&mut general, "Search"),
            KeyAction::NewMember => (&mut general, "New member"),
            KeyAction::DeleteSelection => (&mut general, "Remove member"),
            KeyAction::OpenSelection => (&mut general, "Open member"),
            KeyAction::Edit => (&mut general, "Edit member"),
            KeyAction::Back => (&mut general, "Back"),
            KeyAction::OpenHelp => (&mut general, "Help"),
            KeyAction::MoveUp => (&mut navigation, "Move up"),
            KeyAction::MoveDown => (&mut navigation, "Move down"),
            KeyAction::MoveLeftPage => (&mut navigation, "Page left"),
            KeyAction::MoveRightPage => (&mut navigation, "Page right"),
            KeyAction::PageUp => (&mut navigation, "Page up"),
            KeyAction::PageDown => (&mut navigation, "Page down"),
            KeyAction::Ignore => continue,
        };
        section.entry(label).or_default().insert(key);
    }

    let join = |m: BTreeMap<&'static str, BTreeSet<String>>| {
        m.into_iter()
            .map(|(label, keys)| {
                (label, keys.into_iter().collect::<Vec<_>>().join(", "))
            })
            .collect::<Vec<_>>()
    };
    (join(general), join(navigation))
}

/// Render the help modal listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let (general, navigation) = help_rows(&app.keymap);

    let tip = |label: &str, keys: &str| {
        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(
                keys.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "General:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for (label, keys) in &general {
        lines.push(tip(label, keys));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Navigation:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in &navigation {
        lines.push(tip(label, keys));
    }
    lines.push(Line::raw(""));
    lines.push(tip("Close help", "Esc / Enter"));

    let width = 60u16.min(area.width.saturating_sub(4)).max(40);
    let height = (lines.len() as u16 + 2)
        .min(area.height.saturating_sub(4))
        .max(10);
    let rect = centered_rect(width, height, area);

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
