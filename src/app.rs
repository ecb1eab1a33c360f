//! Application state and event handling.
//!
//! A centralized `App` struct in the Elm style: state plus pure-ish
//! transition methods driven by key events and fetch messages. Edit mode
//! is exactly the lifetime of `App::pending`; the detail modal is the
//! lifetime of `App::modal`.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::attendance::{CheckedSet, PendingSet, Toggle};
use crate::clock::{self, Clock};
use crate::fetch::FetchMessage;
use crate::grid::{GridState, SlotRange};
use crate::links;
use crate::models::{Session, SessionId, Timetable};
use crate::store::AttendanceStore;

/// Viewport height assumed for scroll decisions made outside the renderer.
const APPROX_GRID_ROWS: usize = 30;

/// Log entry for the message strip
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: Instant,
    pub message: String,
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Error,
        }
    }
}

/// Links offered by the session-detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalLink {
    Calendar,
    XPost,
    Proposal,
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// The schedule, once loaded. `None` while the fetch is in flight.
    pub timetable: Option<Timetable>,

    /// Terminal fetch failure; rendered as a static error view.
    pub load_error: Option<String>,

    /// Committed attendance selection
    pub checked: CheckedSet,

    /// Working copy while edit mode is active; `Some` == edit mode
    pub pending: Option<PendingSet>,

    /// Session shown in the detail modal
    pub modal: Option<SessionId>,

    /// Grid scroll and selection state
    pub grid: GridState,

    /// Current JST time in minutes, present only on the event day
    pub now_minutes: Option<u32>,

    /// Log messages
    pub logs: Vec<LogEntry>,
    max_logs: usize,

    /// Show help overlay
    pub show_help: bool,

    store: AttendanceStore,
}

impl App {
    pub fn new(store: AttendanceStore) -> Self {
        let checked = store.load();
        let mut app = Self {
            should_quit: false,
            timetable: None,
            load_error: None,
            checked,
            pending: None,
            modal: None,
            grid: GridState::default(),
            now_minutes: None,
            logs: Vec::new(),
            max_logs: 100,
            show_help: false,
            store,
        };
        app.log(LogEntry::info("Loading schedule..."));
        app
    }

    /// Add a log entry
    pub fn log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        if self.logs.len() > self.max_logs {
            self.logs.remove(0);
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.pending.is_some()
    }

    pub fn selected_session(&self) -> Option<&Session> {
        let timetable = self.timetable.as_ref()?;
        self.grid.selected.and_then(|id| timetable.session(id))
    }

    /// Re-evaluate event-day status and the current minute. Called at
    /// startup and then once a minute from the main loop.
    pub fn refresh_clock(&mut self, clock: &impl Clock) {
        let Some(timetable) = &self.timetable else {
            self.now_minutes = None;
            return;
        };
        let event_date = timetable.event.date;
        self.now_minutes =
            clock::is_event_day(clock, event_date).then(|| clock::now_minutes(clock));
    }

    /// Handle the one-shot fetch result.
    pub fn handle_fetch_message(&mut self, message: FetchMessage, clock: &impl Clock) {
        match message {
            FetchMessage::Loaded(timetable) => {
                let sessions = timetable.sessions.len();
                let tracks = timetable.tracks.len();
                self.checked.retain_valid(&timetable);
                self.timetable = Some(timetable);
                self.refresh_clock(clock);
                if let Some(timetable) = &self.timetable {
                    self.grid.select_initial(timetable);
                }
                self.auto_scroll();
                self.log(LogEntry::success(format!(
                    "Loaded {sessions} sessions across {tracks} tracks"
                )));
                if !self.checked.is_empty() {
                    self.log(LogEntry::info(format!(
                        "{} checked sessions restored",
                        self.checked.len()
                    )));
                }
            }
            FetchMessage::Failed(error) => {
                self.log(LogEntry::error(format!("Schedule load failed: {error}")));
                self.load_error = Some(error);
            }
        }
    }

    /// Scroll to the current time on the event day, otherwise to the first
    /// selectable session.
    fn auto_scroll(&mut self) {
        let Some(timetable) = &self.timetable else {
            return;
        };
        let range = SlotRange::of(timetable);
        let target = self.now_minutes.unwrap_or_else(|| {
            timetable
                .sessions
                .iter()
                .filter(|s| s.is_selectable())
                .map(Session::start_minutes)
                .min()
                .unwrap_or(range.start_minutes)
        });
        self.grid.scroll_to_minutes(target, range, APPROX_GRID_ROWS);
    }

    // === Edit mode ===

    fn enter_edit(&mut self) {
        if self.timetable.is_none() || self.pending.is_some() {
            return;
        }
        self.pending = Some(PendingSet::from_checked(&self.checked));
        self.log(LogEntry::info(
            "Edit mode: Space toggles, s saves, Esc cancels",
        ));
    }

    fn save_edit(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.checked = pending.commit();
        match self.store.save(&self.checked) {
            Ok(()) => self.log(LogEntry::success(format!(
                "Saved {} checked sessions",
                self.checked.len()
            ))),
            Err(e) => self.log(LogEntry::error(format!("Save failed: {e:#}"))),
        }
    }

    fn cancel_edit(&mut self) {
        if self.pending.take().is_some() {
            self.log(LogEntry::info("Edit cancelled, selection unchanged"));
        }
    }

    fn toggle_selected(&mut self) {
        let Some(timetable) = &self.timetable else {
            return;
        };
        let Some(pending) = &mut self.pending else {
            return;
        };
        let Some(id) = self.grid.selected else {
            return;
        };
        let Some(session) = timetable.session(id) else {
            return;
        };
        if !session.is_selectable() {
            return;
        }

        let on = !pending.contains(id);
        match pending.toggle(id, on, timetable) {
            Toggle::Applied => {
                let siblings = timetable.group_siblings(id).len();
                let verb = if on { "Checked" } else { "Unchecked" };
                if siblings > 1 {
                    self.log(LogEntry::info(format!(
                        "{verb} \"{}\" on {siblings} tracks",
                        session.title
                    )));
                }
            }
            Toggle::Blocked => {
                self.log(LogEntry::warning(format!(
                    "\"{}\" overlaps a checked session",
                    session.title
                )));
            }
            Toggle::Ignored => {}
        }
    }

    // === Modal ===

    fn open_modal(&mut self) {
        if let Some(session) = self.selected_session() {
            if session.is_selectable() {
                self.modal = Some(session.id);
            }
        }
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn open_modal_link(&mut self, link: ModalLink) {
        let Some(timetable) = &self.timetable else {
            return;
        };
        let Some(session) = self.modal.and_then(|id| timetable.session(id)) else {
            return;
        };

        let url = match link {
            ModalLink::Calendar => links::google_calendar_url(&timetable.event, session),
            ModalLink::XPost => links::x_post_url(timetable, session),
            ModalLink::Proposal => match &session.proposal_url {
                Some(url) => url.clone(),
                None => {
                    self.log(LogEntry::warning("This session has no proposal page"));
                    return;
                }
            },
        };

        match open::that_detached(&url) {
            Ok(()) => self.log(LogEntry::info("Opened link in browser")),
            Err(e) => self.log(LogEntry::error(format!("Could not open browser: {e}"))),
        }
    }

    // === Key handling ===

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global quit
        if matches!(key.code, KeyCode::Char('c'))
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.load_error.is_some() {
            // Terminal failure: only quitting makes sense
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.should_quit = true;
            }
            return;
        }

        if self.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('e') if !self.edit_mode() => self.enter_edit(),
            KeyCode::Char(' ') if self.edit_mode() => self.toggle_selected(),
            KeyCode::Char('s') if self.edit_mode() => self.save_edit(),
            KeyCode::Esc if self.edit_mode() => self.cancel_edit(),
            KeyCode::Enter if !self.edit_mode() => self.open_modal(),
            KeyCode::Char('t') => self.auto_scroll(),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(Move::Down),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(Move::Up),
            KeyCode::Char('h') | KeyCode::Left => self.move_selection(Move::Left),
            KeyCode::Char('l') | KeyCode::Right => self.move_selection(Move::Right),
            KeyCode::PageDown => self.scroll(Move::Down),
            KeyCode::PageUp => self.scroll(Move::Up),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.close_modal(),
            KeyCode::Char('g') => self.open_modal_link(ModalLink::Calendar),
            KeyCode::Char('x') => self.open_modal_link(ModalLink::XPost),
            KeyCode::Char('p') => self.open_modal_link(ModalLink::Proposal),
            _ => {}
        }
    }

    fn move_selection(&mut self, direction: Move) {
        let Some(timetable) = &self.timetable else {
            return;
        };
        match direction {
            Move::Up => self.grid.select_up(timetable),
            Move::Down => self.grid.select_down(timetable),
            Move::Left => self.grid.select_sideways(timetable, -1),
            Move::Right => self.grid.select_sideways(timetable, 1),
        }
        self.grid
            .ensure_selected_visible(timetable, APPROX_GRID_ROWS);
    }

    fn scroll(&mut self, direction: Move) {
        let Some(timetable) = &self.timetable else {
            return;
        };
        let range = SlotRange::of(timetable);
        match direction {
            Move::Up => self.grid.scroll_up(APPROX_GRID_ROWS / 2),
            _ => self
                .grid
                .scroll_down(APPROX_GRID_ROWS / 2, range, APPROX_GRID_ROWS),
        }
    }

    /// Key-hint line for the status bar.
    pub fn status_text(&self) -> String {
        if self.load_error.is_some() {
            return "q: Quit".to_string();
        }
        if self.modal.is_some() {
            return "g: Calendar | x: Post | p: Proposal | Esc: Close".to_string();
        }
        if self.edit_mode() {
            let count = self.pending.as_ref().map_or(0, PendingSet::len);
            return format!("EDIT ({count} checked) | Space: Toggle | s: Save | Esc: Cancel");
        }
        format!(
            "{} checked | Enter: Details | e: Edit | t: Now | ?: Help | q: Quit",
            self.checked.len()
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::clock::testing::FixedClock;
    use crate::models::{EventInfo, Track};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn time(raw: &str) -> NaiveTime {
        NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
    }

    fn session(id: u32, track: &str, start: &str, end: &str, title: &str) -> Session {
        Session {
            id: SessionId(id),
            track: track.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            start: time(start),
            end: time(end),
            duration_min: 50,
            title: title.to_string(),
            speaker: None,
            proposal_url: Some("https://example.com/p".to_string()),
            tags: Vec::new(),
        }
    }

    fn fixture() -> Timetable {
        Timetable {
            event: EventInfo {
                name: "Test Days".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
                venue: "Hall".to_string(),
                hashtag: "#t".to_string(),
                timetable_url: None,
            },
            tracks: ["A", "B"]
                .iter()
                .map(|id| Track {
                    id: (*id).to_string(),
                    name: format!("Track {id}"),
                    hashtag: format!("#t_{id}"),
                })
                .collect(),
            sessions: vec![
                session(1, "A", "10:00", "10:50", "first"),
                session(2, "B", "10:00", "10:20", "overlapping"),
                session(3, "A", "11:00", "11:50", "second"),
            ],
        }
    }

    fn app_with_schedule(dir: &tempfile::TempDir) -> App {
        let store = AttendanceStore::at_path(dir.path().join("checked.json"));
        let mut app = App::new(store);
        let clock = FixedClock::at(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), 12, 0);
        app.handle_fetch_message(FetchMessage::Loaded(fixture()), &clock);
        app
    }

    #[test]
    fn fetch_failure_sets_terminal_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttendanceStore::at_path(dir.path().join("checked.json"));
        let mut app = App::new(store);
        let clock = FixedClock::at(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), 12, 0);

        app.handle_fetch_message(FetchMessage::Failed("HTTP 404".to_string()), &clock);
        assert_eq!(app.load_error.as_deref(), Some("HTTP 404"));

        // Only quit works from the error view
        app.handle_key(key(KeyCode::Char('e')));
        assert!(!app.edit_mode());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn load_selects_first_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_schedule(&dir);
        assert_eq!(app.grid.selected, Some(SessionId(1)));
    }

    #[test]
    fn edit_toggle_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_schedule(&dir);

        app.handle_key(key(KeyCode::Char('e')));
        assert!(app.edit_mode());
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.edit_mode());
        assert!(app.checked.contains(SessionId(1)));

        // The committed set was persisted
        let reloaded = AttendanceStore::at_path(dir.path().join("checked.json")).load();
        assert!(reloaded.contains(SessionId(1)));
    }

    #[test]
    fn cancel_discards_pending_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_schedule(&dir);

        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.edit_mode());
        assert!(app.checked.is_empty());
    }

    #[test]
    fn blocked_toggle_leaves_pending_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_schedule(&dir);

        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Char(' '))); // check session 1 on track A
        app.handle_key(key(KeyCode::Right)); // select overlapping session 2
        assert_eq!(app.grid.selected, Some(SessionId(2)));
        app.handle_key(key(KeyCode::Char(' '))); // blocked: no-op

        let pending = app.pending.as_ref().unwrap();
        assert!(pending.contains(SessionId(1)));
        assert!(!pending.contains(SessionId(2)));
    }

    #[test]
    fn modal_opens_for_selected_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_schedule(&dir);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.modal, Some(SessionId(1)));
        app.handle_key(key(KeyCode::Esc));
        assert!(app.modal.is_none());
    }

    #[test]
    fn enter_does_not_open_modal_in_edit_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_schedule(&dir);

        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.modal.is_none());
    }

    #[test]
    fn clock_refresh_marks_event_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_schedule(&dir);
        assert_eq!(app.now_minutes, None);

        let event_day = FixedClock::at(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(), 10, 30);
        app.refresh_clock(&event_day);
        assert_eq!(app.now_minutes, Some(10 * 60 + 30));
    }

    #[test]
    fn stale_checked_ids_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttendanceStore::at_path(dir.path().join("checked.json"));
        store
            .save(&CheckedSet::from_ids([SessionId(1), SessionId(99)]))
            .unwrap();

        let mut app = App::new(store);
        let clock = FixedClock::at(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), 12, 0);
        app.handle_fetch_message(FetchMessage::Loaded(fixture()), &clock);
        assert!(app.checked.contains(SessionId(1)));
        assert!(!app.checked.contains(SessionId(99)));
    }
}
