use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::{
    AppState, DetailState, InputMode, ModalState, Screen, keymap::KeyAction,
};
use crate::form::NewMemberForm;
use crate::search::apply_search;
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
) -> Result<()> {
    app.request_load();

    loop {
        // Drain completed network work before drawing; outcomes whose view
        // has gone away are dropped inside apply_response.
        while let Some(response) = app.net.poll() {
            app.apply_response(response);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => handle_normal_key(&mut app, key),
                        InputMode::Search => handle_search_key(&mut app, key.code),
                        InputMode::Modal => handle_modal_key(&mut app, key.code),
                        InputMode::Edit => handle_edit_key(&mut app, key.code),
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    if action == KeyAction::Quit {
        app.should_quit = true;
        return;
    }
    if action == KeyAction::OpenHelp {
        app.modal = Some(ModalState::Help);
        app.input_mode = InputMode::Modal;
        return;
    }
    match &app.screen {
        Screen::Directory => handle_directory_action(app, action),
        Screen::Detail { state, .. } => match action {
            KeyAction::Back => app.back_to_directory(),
            KeyAction::Edit => app.start_edit(),
            // On NotFound the only offered action is going back.
            KeyAction::OpenSelection => {
                if matches!(state, DetailState::NotFound) {
                    app.back_to_directory();
                }
            }
            _ => {}
        },
    }
}

fn handle_directory_action(app: &mut AppState, action: KeyAction) {
    let rpp = app.rows_per_page.max(1);
    match action {
        KeyAction::StartSearch => {
            app.input_mode = InputMode::Search;
        }
        KeyAction::NewMember => {
            app.modal = Some(ModalState::NewMember(NewMemberForm::new()));
            app.input_mode = InputMode::Modal;
        }
        KeyAction::DeleteSelection => app.confirm_delete_selected(),
        KeyAction::OpenSelection => app.open_selected(),
        KeyAction::MoveUp => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.visible.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::MoveLeftPage | KeyAction::PageUp => {
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        KeyAction::MoveRightPage | KeyAction::PageDown => {
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.visible.len().saturating_sub(1));
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            apply_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            apply_search(app);
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            apply_search(app);
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.save_edit(),
        _ => {
            if let Screen::Detail {
                state: DetailState::Editing { draft, .. },
                ..
            } = &mut app.screen
            {
                match code {
                    KeyCode::Tab => draft.focus = draft.focus.next(),
                    KeyCode::Backspace => {
                        draft.focused_value_mut().pop();
                    }
                    KeyCode::Char(c) => draft.focused_value_mut().push(c),
                    _ => {}
                }
            }
        }
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::NewMember(form)) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter => {
                // One create at a time; a second Enter while the first is
                // in flight would double-submit.
                if app.create_ticket.is_none() {
                    app.submit_new_member();
                }
            }
            KeyCode::Backspace => {
                form.focused_value_mut().pop();
            }
            KeyCode::Char(c) => form.focused_value_mut().push(c),
            _ => {}
        },
        Some(ModalState::ConfirmDelete { id, selected, .. }) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                if *selected == 0 {
                    let id = id.clone();
                    app.close_modal();
                    app.request_delete(id);
                } else {
                    app.close_modal();
                }
            }
            _ => {}
        },
        Some(ModalState::Help) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => app.close_modal(),
            _ => {}
        },
        None => {
            app.input_mode = InputMode::Normal;
        }
    }
}
