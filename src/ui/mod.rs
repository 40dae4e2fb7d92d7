pub mod components;
pub mod detail;
pub mod directory;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}▏", app.search_query),
        _ if !app.search_query.is_empty() => format!("  Search: {}", app.search_query),
        _ => String::new(),
    };
    let p = Paragraph::new(format!(
        "memberdir{prompt}  members:{}/{}  — /: search; n: new; Enter: open; Del: remove; ?: help; q: quit",
        app.visible.len(),
        app.registry.len()
    ))
    .block(
        Block::default()
            .title("memberdir")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    if matches!(app.screen, Screen::Directory) {
        directory::render_members_table(f, root[1], app);
    } else {
        detail::render_detail(f, root[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        let area = f.area();
        render_modal(f, area, app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(ModalState::NewMember(form)) => {
            components::render_form_modal(f, area, app, form);
        }
        Some(ModalState::ConfirmDelete { name, selected, .. }) => {
            components::render_confirm_modal(f, area, app, name, *selected);
        }
        Some(ModalState::Help) => components::render_help_modal(f, area, app),
        None => {}
    }
}
