//! Application state types and entry glue.
//!
//! Holds the registry, the derived search view, the active screen
//! (directory or per-member detail), modal state and transient notices,
//! plus helpers to construct defaults and to run the event loop
//! (re-exported as `run`).

pub mod config;
pub mod keymap;
pub mod update;

use std::time::{Duration, Instant};

use ratatui::style::Color;
use tracing::{debug, error, warn};

use crate::api::UserRecord;
use crate::form::NewMemberForm;
use crate::net::{NetClient, NetOutcome, NetRequest, NetResponse, Ticket};
use crate::registry::Registry;
use crate::search::apply_search;

pub use keymap::Keymap;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
    Edit,
}

/// Which screen fills the frame.
pub enum Screen {
    Directory,
    Detail {
        id: String,
        ticket: Ticket,
        state: DetailState,
    },
}

/// Per-member detail view lifecycle.
///
/// `Loading` covers the window between navigation and the fetch outcome.
/// A failed or empty fetch lands in `NotFound`, which only offers a way
/// back. Edits live in a working copy and are committed onto the locally
/// held record only; they do not write back to the registry or the
/// external source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Viewing(UserRecord),
    Editing {
        committed: UserRecord,
        draft: EditDraft,
    },
    NotFound,
}

/// Editable field of the detail working copy. Avatar is not editable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditField {
    FirstName,
    LastName,
    Email,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            Self::FirstName => Self::LastName,
            Self::LastName => Self::Email,
            Self::Email => Self::FirstName,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
        }
    }
}

/// Working copy of the editable fields during the Editing state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub focus: EditField,
}

impl EditDraft {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            focus: EditField::FirstName,
        }
    }

    /// Commit the working copy onto the committed record, keeping id and
    /// avatar untouched. No validation happens on this path (observed
    /// upstream behavior, kept as is).
    pub fn commit(self, committed: UserRecord) -> UserRecord {
        UserRecord {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            ..committed
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            EditField::FirstName => &mut self.first_name,
            EditField::LastName => &mut self.last_name,
            EditField::Email => &mut self.email,
        }
    }
}

/// Modal dialogs layered over the current screen.
pub enum ModalState {
    NewMember(NewMemberForm),
    ConfirmDelete {
        id: String,
        name: String,
        selected: usize,
    },
    Help,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient status-bar message; expires instead of demanding a dismissal.
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub at: Instant,
}

const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight: Color,
    pub ok: Color,
    pub err: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight: Color::Yellow,
            ok: Color::Green,
            err: Color::Red,
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys
    /// fall back to `dark`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::dark();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight" => theme.highlight = color,
                    "ok" => theme.ok = color,
                    "err" => theme.err = color,
                    _ => {}
                }
            }
        }
        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        // Byte-sliced below, so reject anything that is not plain ASCII.
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                other => format!("{:?}", other),
            }
        }
        let mut buf = String::new();
        buf.push_str("# memberdir theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight", self.highlight);
        kv("ok", self.ok);
        kv("err", self.err);
        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default
    /// theme and return it. On parse errors, return `dark`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::dark);
        }
        if let Some(existing) = config_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::dark);
        }
        let t = Self::dark();
        let _ = t.write_file(path);
        t
    }
}

/// Resolve a config file name against the working directory first, then
/// `$XDG_CONFIG_HOME/memberdir/` (or `~/.config/memberdir/`).
pub fn config_read_path(name: &str) -> Option<String> {
    if std::path::Path::new(name).exists() {
        return Some(name.to_string());
    }
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| std::path::PathBuf::from(h).join(".config"))
        })?;
    let candidate = base.join("memberdir").join(name);
    if candidate.exists() {
        Some(candidate.to_string_lossy().into_owned())
    } else {
        None
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub registry: Registry,
    /// Derived view: registry filtered by the current search query.
    pub visible: Vec<UserRecord>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub screen: Screen,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub notice: Option<Notice>,
    pub net: NetClient,
    pub load_ticket: Option<Ticket>,
    pub create_ticket: Option<Ticket>,
    pub delete_pending: Option<(Ticket, String)>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(net: NetClient, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            registry: Registry::new(),
            visible: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            screen: Screen::Directory,
            modal: None,
            theme,
            keymap,
            notice: None,
            net,
            load_ticket: None,
            create_ticket: None,
            delete_pending: None,
            should_quit: false,
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
            at: Instant::now(),
        });
    }

    /// Notice still worth showing, if any.
    pub fn active_notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| n.at.elapsed() < NOTICE_TTL)
    }

    /// Kick off (or redo) the bulk load of the directory.
    pub fn request_load(&mut self) {
        self.load_ticket = Some(self.net.submit(NetRequest::LoadDirectory));
    }

    /// Navigate to the detail screen for `id` and start its fetch.
    pub fn open_detail(&mut self, id: String) {
        let ticket = self.net.submit(NetRequest::FetchUser { id: id.clone() });
        self.screen = Screen::Detail {
            id,
            ticket,
            state: DetailState::Loading,
        };
        self.input_mode = InputMode::Normal;
    }

    pub fn open_selected(&mut self) {
        if let Some(record) = self.visible.get(self.selected_index) {
            let id = record.id.clone();
            self.open_detail(id);
        }
    }

    pub fn back_to_directory(&mut self) {
        self.screen = Screen::Directory;
        self.input_mode = InputMode::Normal;
    }

    /// Viewing -> Editing: copy current field values into a working copy.
    pub fn start_edit(&mut self) {
        if let Screen::Detail { state, .. } = &mut self.screen {
            if let DetailState::Viewing(record) = state {
                let draft = EditDraft::from_record(record);
                *state = DetailState::Editing {
                    committed: record.clone(),
                    draft,
                };
                self.input_mode = InputMode::Edit;
            }
        }
    }

    /// Editing -> Viewing (save): commit the working copy onto the locally
    /// held record. The registry and external source are not touched.
    pub fn save_edit(&mut self) {
        if let Screen::Detail { state, .. } = &mut self.screen {
            if let DetailState::Editing { committed, draft } = state {
                let updated = draft.clone().commit(committed.clone());
                *state = DetailState::Viewing(updated);
                self.input_mode = InputMode::Normal;
            }
        }
    }

    /// Editing -> Viewing (cancel): discard the working copy.
    pub fn cancel_edit(&mut self) {
        if let Screen::Detail { state, .. } = &mut self.screen {
            if let DetailState::Editing { committed, .. } = state {
                *state = DetailState::Viewing(committed.clone());
                self.input_mode = InputMode::Normal;
            }
        }
    }

    /// Open the delete confirmation for the selected row.
    pub fn confirm_delete_selected(&mut self) {
        if let Some(record) = self.visible.get(self.selected_index) {
            self.modal = Some(ModalState::ConfirmDelete {
                id: record.id.clone(),
                name: record.full_name(),
                selected: 1,
            });
            self.input_mode = InputMode::Modal;
        }
    }

    /// Ask the backend to delete `id`; the registry mutates only once the
    /// outcome confirms it.
    pub fn request_delete(&mut self, id: String) {
        let ticket = self.net.submit(NetRequest::DeleteUser { id: id.clone() });
        self.delete_pending = Some((ticket, id));
    }

    /// Close any open modal. Closing the creation form abandons its
    /// in-flight create: the ticket no longer matches, so the outcome is
    /// dropped when it arrives and a fresh form can submit right away.
    pub fn close_modal(&mut self) {
        if matches!(self.modal, Some(ModalState::NewMember(_))) {
            self.create_ticket = None;
        }
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Validate the open creation form and, if clean, submit the create.
    /// With validation errors the form stays open and shows them in place.
    pub fn submit_new_member(&mut self) {
        let Some(ModalState::NewMember(form)) = &mut self.modal else {
            return;
        };
        if !form.check() {
            return;
        }
        let draft = form.draft.clone();
        self.create_ticket = Some(self.net.submit(NetRequest::CreateUser { draft }));
    }

    /// Apply one network outcome to the state, dropping it when its ticket
    /// no longer matches the pending request for that concern (the view
    /// that asked has navigated away or been superseded).
    pub fn apply_response(&mut self, response: NetResponse) {
        match response.outcome {
            NetOutcome::DirectoryLoaded(result) => {
                if self.load_ticket != Some(response.ticket) {
                    debug!(ticket = ?response.ticket, "dropping stale directory load");
                    return;
                }
                self.load_ticket = None;
                match result {
                    Ok(records) => {
                        self.registry.replace_all(records);
                        apply_search(self);
                    }
                    Err(e) => {
                        error!(error = %e, "directory load failed");
                        self.registry.clear();
                        apply_search(self);
                        self.notify(NoticeLevel::Error, "Could not load the directory");
                    }
                }
            }
            NetOutcome::UserFetched(result) => {
                let Screen::Detail { ticket, state, .. } = &mut self.screen else {
                    debug!(ticket = ?response.ticket, "dropping fetch for a closed detail view");
                    return;
                };
                if *ticket != response.ticket {
                    debug!(ticket = ?response.ticket, "dropping stale detail fetch");
                    return;
                }
                *state = match result {
                    Ok(Some(record)) => DetailState::Viewing(record),
                    Ok(None) => DetailState::NotFound,
                    Err(e) => {
                        warn!(error = %e, "detail fetch failed");
                        DetailState::NotFound
                    }
                };
            }
            NetOutcome::UserCreated(result) => {
                if self.create_ticket != Some(response.ticket) {
                    debug!(ticket = ?response.ticket, "dropping stale create outcome");
                    return;
                }
                self.create_ticket = None;
                match result {
                    Ok(record) => {
                        let name = record.full_name();
                        self.registry.append(record);
                        apply_search(self);
                        self.modal = None;
                        self.input_mode = InputMode::Normal;
                        self.notify(NoticeLevel::Info, format!("Added {name}"));
                    }
                    Err(e) => {
                        // Form stays open with the entered values intact.
                        error!(error = %e, "create failed");
                        self.notify(NoticeLevel::Error, "Could not add the member");
                    }
                }
            }
            NetOutcome::UserDeleted { id, result } => {
                match &self.delete_pending {
                    Some((ticket, pending_id))
                        if *ticket == response.ticket && *pending_id == id => {}
                    _ => {
                        debug!(ticket = ?response.ticket, "dropping stale delete outcome");
                        return;
                    }
                }
                self.delete_pending = None;
                match result {
                    Ok(()) => {
                        self.registry.remove(&id);
                        apply_search(self);
                        self.notify(NoticeLevel::Info, "Member removed");
                    }
                    Err(e) => {
                        error!(error = %e, id, "delete failed");
                        self.notify(NoticeLevel::Error, "Could not remove the member");
                    }
                }
            }
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NewUser, UserSource};
    use crate::error::{Result, simple_error};

    struct NullSource;

    impl UserSource for NullSource {
        fn list(&self) -> Result<Vec<UserRecord>> {
            Ok(Vec::new())
        }
        fn fetch(&self, _id: &str) -> Result<Option<UserRecord>> {
            Ok(None)
        }
        fn create(&self, _draft: &NewUser) -> Result<UserRecord> {
            Err(simple_error("unused"))
        }
        fn delete(&self, _id: &str) -> Result<()> {
            Err(simple_error("unused"))
        }
    }

    fn rec(id: &str, first: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            email: "ann@x.com".to_string(),
            avatar: "http://a".to_string(),
        }
    }

    fn mk_app() -> AppState {
        AppState::new(
            NetClient::spawn(Box::new(NullSource)),
            Theme::dark(),
            Keymap::new_defaults(),
        )
    }

    #[test]
    fn parse_color_rejects_non_ascii_and_bad_hex() {
        // "€€" is six bytes; slicing it as hex must not panic.
        assert!(Theme::parse_color("€€").is_none());
        assert!(Theme::parse_color("zzzzzz").is_none());
        assert_eq!(Theme::parse_color("#FF8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(Theme::parse_color("reset"), Some(Color::Reset));
    }

    #[test]
    fn detail_loading_to_viewing_on_fetch_hit() {
        let mut app = mk_app();
        app.open_detail("1".to_string());
        let ticket = match &app.screen {
            Screen::Detail { ticket, state, .. } => {
                assert_eq!(*state, DetailState::Loading);
                *ticket
            }
            _ => panic!("expected detail screen"),
        };
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserFetched(Ok(Some(rec("1", "Ann")))),
        });
        match &app.screen {
            Screen::Detail { state, .. } => {
                assert_eq!(*state, DetailState::Viewing(rec("1", "Ann")));
            }
            _ => panic!("expected detail screen"),
        }
    }

    #[test]
    fn detail_loading_to_not_found_on_miss_or_error() {
        let mut app = mk_app();
        app.open_detail("23".to_string());
        let ticket = match &app.screen {
            Screen::Detail { ticket, .. } => *ticket,
            _ => panic!("expected detail screen"),
        };
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserFetched(Ok(None)),
        });
        assert!(matches!(
            app.screen,
            Screen::Detail {
                state: DetailState::NotFound,
                ..
            }
        ));

        app.open_detail("24".to_string());
        let ticket = match &app.screen {
            Screen::Detail { ticket, .. } => *ticket,
            _ => panic!("expected detail screen"),
        };
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserFetched(Err(simple_error("boom"))),
        });
        assert!(matches!(
            app.screen,
            Screen::Detail {
                state: DetailState::NotFound,
                ..
            }
        ));
    }

    #[test]
    fn stale_fetch_is_dropped_after_renavigation() {
        let mut app = mk_app();
        app.open_detail("1".to_string());
        let old_ticket = match &app.screen {
            Screen::Detail { ticket, .. } => *ticket,
            _ => panic!("expected detail screen"),
        };
        // User navigates to a different record before the first fetch lands.
        app.open_detail("2".to_string());
        app.apply_response(NetResponse {
            ticket: old_ticket,
            outcome: NetOutcome::UserFetched(Ok(Some(rec("1", "Ann")))),
        });
        match &app.screen {
            Screen::Detail { id, state, .. } => {
                assert_eq!(id, "2");
                assert_eq!(*state, DetailState::Loading);
            }
            _ => panic!("expected detail screen"),
        }
    }

    #[test]
    fn edit_cancel_restores_committed_values() {
        let mut app = mk_app();
        app.open_detail("1".to_string());
        let ticket = match &app.screen {
            Screen::Detail { ticket, .. } => *ticket,
            _ => panic!("expected detail screen"),
        };
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserFetched(Ok(Some(rec("1", "Ann")))),
        });

        app.start_edit();
        if let Screen::Detail {
            state: DetailState::Editing { draft, .. },
            ..
        } = &mut app.screen
        {
            draft.first_name = "Bo".to_string();
        } else {
            panic!("expected editing state");
        }
        app.cancel_edit();
        match &app.screen {
            Screen::Detail {
                state: DetailState::Viewing(record),
                ..
            } => assert_eq!(record.first_name, "Ann"),
            _ => panic!("expected viewing state"),
        }
    }

    #[test]
    fn edit_save_commits_locally_without_registry_writeback() {
        let mut app = mk_app();
        app.registry.append(rec("1", "Ann"));
        apply_search(&mut app);

        app.open_detail("1".to_string());
        let ticket = match &app.screen {
            Screen::Detail { ticket, .. } => *ticket,
            _ => panic!("expected detail screen"),
        };
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserFetched(Ok(Some(rec("1", "Ann")))),
        });

        app.start_edit();
        if let Screen::Detail {
            state: DetailState::Editing { draft, .. },
            ..
        } = &mut app.screen
        {
            draft.first_name = "Annie".to_string();
        }
        app.save_edit();
        match &app.screen {
            Screen::Detail {
                state: DetailState::Viewing(record),
                ..
            } => assert_eq!(record.first_name, "Annie"),
            _ => panic!("expected viewing state"),
        }
        // Session-local edit only; the registry still holds the old value.
        assert_eq!(app.registry.get("1").unwrap().first_name, "Ann");
    }

    #[test]
    fn reentering_edit_starts_from_last_committed_values() {
        let mut app = mk_app();
        app.open_detail("1".to_string());
        let ticket = match &app.screen {
            Screen::Detail { ticket, .. } => *ticket,
            _ => panic!("expected detail screen"),
        };
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserFetched(Ok(Some(rec("1", "Ann")))),
        });

        app.start_edit();
        if let Screen::Detail {
            state: DetailState::Editing { draft, .. },
            ..
        } = &mut app.screen
        {
            draft.first_name = "Annie".to_string();
        }
        app.save_edit();
        app.start_edit();
        match &app.screen {
            Screen::Detail {
                state: DetailState::Editing { draft, .. },
                ..
            } => assert_eq!(draft.first_name, "Annie"),
            _ => panic!("expected editing state"),
        }
    }

    #[test]
    fn load_failure_leaves_registry_empty_and_notifies() {
        let mut app = mk_app();
        app.request_load();
        let ticket = app.load_ticket.unwrap();
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::DirectoryLoaded(Err(simple_error("offline"))),
        });
        assert!(app.registry.is_empty());
        assert!(app.load_ticket.is_none());
        let notice = app.active_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn closing_the_form_abandons_the_inflight_create() {
        let mut app = mk_app();
        let mut form = NewMemberForm::new();
        form.draft = NewUser {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@x.com".to_string(),
            avatar: "http://a".to_string(),
        };
        app.modal = Some(ModalState::NewMember(form));
        app.input_mode = InputMode::Modal;
        app.submit_new_member();
        let ticket = app.create_ticket.unwrap();

        // User cancels before the outcome lands, then starts a search.
        app.close_modal();
        assert!(app.create_ticket.is_none());
        app.input_mode = InputMode::Search;

        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserCreated(Ok(rec("101", "Ann"))),
        });
        assert!(app.registry.get("101").is_none());
        assert!(app.active_notice().is_none());
        assert_eq!(app.input_mode, InputMode::Search);

        // A fresh form is not blocked by the orphaned outcome.
        let mut form = NewMemberForm::new();
        form.draft = NewUser {
            first_name: "Bo".to_string(),
            last_name: "Kim".to_string(),
            email: "bo@x.com".to_string(),
            avatar: "http://b".to_string(),
        };
        app.modal = Some(ModalState::NewMember(form));
        app.submit_new_member();
        assert!(app.create_ticket.is_some());
    }

    #[test]
    fn delete_outcome_mutates_registry_only_on_success() {
        let mut app = mk_app();
        app.registry.append(rec("1", "Ann"));
        app.registry.append(rec("2", "Bo"));
        apply_search(&mut app);

        app.request_delete("2".to_string());
        let (ticket, _) = app.delete_pending.clone().unwrap();
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserDeleted {
                id: "2".to_string(),
                result: Err(simple_error("backend says no")),
            },
        });
        assert_eq!(app.registry.len(), 2);

        app.request_delete("2".to_string());
        let (ticket, _) = app.delete_pending.clone().unwrap();
        app.apply_response(NetResponse {
            ticket,
            outcome: NetOutcome::UserDeleted {
                id: "2".to_string(),
                result: Ok(()),
            },
        });
        assert_eq!(app.registry.len(), 1);
        assert!(app.registry.get("2").is_none());
    }
}
