//! Time/track grid widget for the timetable.
//!
//! Columns are tracks, rows are five-minute slots spanning the schedule's
//! time range. Sessions are drawn as cells spanning `duration / 5` rows,
//! styled by their state (checked, blocked, current, selected, structural).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::attendance::{CheckedSet, PendingSet};
use crate::models::{Session, SessionId, Timetable, SLOT_MINUTES};
use crate::theme::{colors, styles, track_color};

/// Width of the left-hand time label column.
const TIME_COL_WIDTH: u16 = 6;
/// Narrowest usable track column.
const MIN_TRACK_WIDTH: u16 = 10;

/// The grid's row space: five-minute slots from the first to the last
/// session, slot-aligned on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub start_minutes: u32,
    pub total_rows: usize,
}

impl SlotRange {
    pub fn of(timetable: &Timetable) -> Self {
        let (start, end) = timetable.time_range();
        let aligned_start = start - start % SLOT_MINUTES;
        let aligned_end = end.div_ceil(SLOT_MINUTES) * SLOT_MINUTES;
        Self {
            start_minutes: aligned_start,
            total_rows: ((aligned_end - aligned_start) / SLOT_MINUTES) as usize + 1,
        }
    }

    /// Row of a wall-clock minute, clamped into the range.
    pub fn row_of(&self, minutes: u32) -> usize {
        let clamped = minutes.max(self.start_minutes);
        (((clamped - self.start_minutes) / SLOT_MINUTES) as usize).min(self.total_rows - 1)
    }

    /// Wall-clock minute at the top of a row.
    pub fn minutes_of(&self, row: usize) -> u32 {
        self.start_minutes + row as u32 * SLOT_MINUTES
    }
}

/// Scroll and selection state for the grid.
#[derive(Debug, Clone, Default)]
pub struct GridState {
    pub scroll_row: usize,
    pub selected: Option<SessionId>,
}

impl GridState {
    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_row = self.scroll_row.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize, range: SlotRange, viewport_rows: usize) {
        let max = range.total_rows.saturating_sub(viewport_rows);
        self.scroll_row = (self.scroll_row + rows).min(max);
    }

    /// Scroll so the given time sits about a quarter down the viewport,
    /// leaving most of the screen for what comes next.
    pub fn scroll_to_minutes(&mut self, minutes: u32, range: SlotRange, viewport_rows: usize) {
        let target = range.row_of(minutes);
        let max = range.total_rows.saturating_sub(viewport_rows);
        self.scroll_row = target.saturating_sub(viewport_rows / 4).min(max);
    }

    /// Bring the selected session's rows into the viewport.
    pub fn ensure_selected_visible(&mut self, timetable: &Timetable, viewport_rows: usize) {
        let Some(session) = self.selected.and_then(|id| timetable.session(id)) else {
            return;
        };
        let range = SlotRange::of(timetable);
        let first = range.row_of(session.start_minutes());
        let last = range.row_of(session.end_minutes().saturating_sub(SLOT_MINUTES));
        if first < self.scroll_row {
            self.scroll_row = first;
        } else if viewport_rows > 0 && last >= self.scroll_row + viewport_rows {
            self.scroll_row = last + 1 - viewport_rows;
        }
    }

    fn selectable<'a>(
        timetable: &'a Timetable,
    ) -> impl Iterator<Item = &'a Session> + 'a {
        timetable
            .sessions
            .iter()
            .filter(|s| s.is_selectable() && timetable.track_index(&s.track).is_some())
    }

    /// Select the earliest selectable session if nothing is selected yet.
    pub fn select_initial(&mut self, timetable: &Timetable) {
        if self.selected.is_some() {
            return;
        }
        self.selected = Self::selectable(timetable)
            .min_by_key(|s| (s.start_minutes(), timetable.track_index(&s.track)))
            .map(|s| s.id);
    }

    /// Move selection to the next session (by start time) in the same track.
    pub fn select_down(&mut self, timetable: &Timetable) {
        let Some(current) = self.selected.and_then(|id| timetable.session(id)) else {
            self.select_initial(timetable);
            return;
        };
        let next = Self::selectable(timetable)
            .filter(|s| s.track == current.track && s.start_minutes() > current.start_minutes())
            .min_by_key(|s| s.start_minutes());
        if let Some(next) = next {
            self.selected = Some(next.id);
        }
    }

    /// Move selection to the previous session in the same track.
    pub fn select_up(&mut self, timetable: &Timetable) {
        let Some(current) = self.selected.and_then(|id| timetable.session(id)) else {
            self.select_initial(timetable);
            return;
        };
        let prev = Self::selectable(timetable)
            .filter(|s| s.track == current.track && s.start_minutes() < current.start_minutes())
            .max_by_key(|s| s.start_minutes());
        if let Some(prev) = prev {
            self.selected = Some(prev.id);
        }
    }

    /// Move selection sideways to the nearest session (by start time) on
    /// the closest track that has one. `dir` is -1 for left, +1 for right.
    pub fn select_sideways(&mut self, timetable: &Timetable, dir: i32) {
        let Some(current) = self.selected.and_then(|id| timetable.session(id)) else {
            self.select_initial(timetable);
            return;
        };
        let Some(current_col) = timetable.track_index(&current.track) else {
            return;
        };
        let track_count = timetable.tracks.len() as i32;

        for offset in 1..track_count {
            let col = current_col as i32 + dir * offset;
            if col < 0 || col >= track_count {
                break;
            }
            let track_id = &timetable.tracks[col as usize].id;
            let nearest = Self::selectable(timetable)
                .filter(|s| &s.track == track_id)
                .min_by_key(|s| s.start_minutes().abs_diff(current.start_minutes()));
            if let Some(nearest) = nearest {
                self.selected = Some(nearest.id);
                return;
            }
        }
    }
}

/// Renders the timetable grid.
pub struct GridWidget<'a> {
    timetable: &'a Timetable,
    state: &'a GridState,
    checked: &'a CheckedSet,
    pending: Option<&'a PendingSet>,
    /// Current JST time in minutes, present only on the event day.
    now_minutes: Option<u32>,
}

impl<'a> GridWidget<'a> {
    pub fn new(timetable: &'a Timetable, state: &'a GridState, checked: &'a CheckedSet) -> Self {
        Self {
            timetable,
            state,
            checked,
            pending: None,
            now_minutes: None,
        }
    }

    pub fn pending(mut self, pending: Option<&'a PendingSet>) -> Self {
        self.pending = pending;
        self
    }

    pub fn now(mut self, now_minutes: Option<u32>) -> Self {
        self.now_minutes = now_minutes;
        self
    }

    fn is_checked(&self, id: SessionId) -> bool {
        match self.pending {
            Some(pending) => pending.contains(id),
            None => self.checked.contains(id),
        }
    }

    fn cell_style(&self, session: &Session, column: usize) -> Style {
        let selected = self.state.selected == Some(session.id);
        let current = self.now_minutes.is_some_and(|now| session.is_running_at(now));
        let blocked = self
            .pending
            .is_some_and(|p| session.is_selectable() && p.is_blocked(session, self.timetable));

        if selected {
            styles::cell_selected()
        } else if self.is_checked(session.id) {
            styles::cell_checked()
        } else if blocked {
            styles::cell_blocked()
        } else if current {
            styles::cell_current()
        } else if session.is_structural() {
            styles::cell_structural()
        } else {
            styles::cell().fg(track_color(column))
        }
    }

    fn render_header(&self, inner: Rect, buf: &mut Buffer, track_width: u16, shown: usize) {
        for (col, track) in self.timetable.tracks.iter().take(shown).enumerate() {
            let x = inner.x + TIME_COL_WIDTH + col as u16 * track_width;
            let label = truncate_to_width(&track.name, track_width.saturating_sub(1) as usize);
            buf.set_string(
                x,
                inner.y,
                label,
                Style::default()
                    .fg(track_color(col))
                    .add_modifier(Modifier::BOLD),
            );
        }
    }

    fn render_time_labels(
        &self,
        inner: Rect,
        buf: &mut Buffer,
        range: SlotRange,
        scroll: usize,
        viewport_rows: usize,
    ) {
        let now_row = self.now_minutes.map(|m| range.row_of(m));

        for visible in 0..viewport_rows {
            let row = scroll + visible;
            if row >= range.total_rows {
                break;
            }
            let minutes = range.minutes_of(row);
            let y = inner.y + 1 + visible as u16;

            if now_row == Some(row) {
                let label = format!("▶{:02}:{:02}", minutes / 60, minutes % 60);
                buf.set_string(
                    inner.x,
                    y,
                    label,
                    Style::default()
                        .fg(colors::NOW_MARKER)
                        .add_modifier(Modifier::BOLD),
                );
            } else if minutes % 30 == 0 {
                let label = format!(" {:02}:{:02}", minutes / 60, minutes % 60);
                let style = if minutes % 60 == 0 {
                    styles::text_dim().add_modifier(Modifier::BOLD)
                } else {
                    styles::text_hint()
                };
                buf.set_string(inner.x, y, label, style);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_session(
        &self,
        inner: Rect,
        buf: &mut Buffer,
        session: &Session,
        column: usize,
        track_width: u16,
        range: SlotRange,
        scroll: usize,
        viewport_rows: usize,
    ) {
        let first_row = range.row_of(session.start_minutes());
        // Last slot covered by the session (end is exclusive)
        let last_row = range.row_of(session.end_minutes().saturating_sub(SLOT_MINUTES));

        let visible_first = first_row.max(scroll);
        let visible_last = last_row.min(scroll + viewport_rows.saturating_sub(1));
        if visible_first > visible_last {
            return;
        }

        let style = self.cell_style(session, column);
        let x = inner.x + TIME_COL_WIDTH + column as u16 * track_width;
        let width = track_width.saturating_sub(1); // one-column gutter between tracks
        if width == 0 {
            return;
        }
        let text_width = width.saturating_sub(1) as usize;

        for row in visible_first..=visible_last {
            let y = inner.y + 1 + (row - scroll) as u16;
            buf.set_string(x, y, " ".repeat(width as usize), style);

            // First row: time span plus check mark; following rows: title,
            // then speaker when the cell is tall enough.
            let rel = row - first_row;
            let line = match rel {
                0 => {
                    let mark = if self.is_checked(session.id) { " ✓" } else { "" };
                    Some(format!("{}{mark}", session.time_label()))
                }
                1 => Some(session.title.clone()),
                2 => session.speaker.clone(),
                3 if !session.tags.is_empty() => Some(session.tags.join(" ")),
                _ => None,
            };
            if let Some(line) = line {
                buf.set_string(x + 1, y, truncate_to_width(&line, text_width), style);
            }
        }
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " {} — {} ",
            self.timetable.event.name,
            self.timetable.event.date.format("%Y-%m-%d")
        );
        let block = Block::default()
            .title(title)
            .title_style(styles::title())
            .borders(Borders::ALL)
            .border_style(styles::border())
            .style(Style::default().bg(colors::BG_DARK));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < TIME_COL_WIDTH + MIN_TRACK_WIDTH || inner.height < 3 {
            return;
        }

        let grid_width = inner.width - TIME_COL_WIDTH;
        let shown = (grid_width / MIN_TRACK_WIDTH)
            .min(self.timetable.tracks.len() as u16)
            .max(1) as usize;
        let track_width = grid_width / shown as u16;

        let range = SlotRange::of(self.timetable);
        let viewport_rows = inner.height as usize - 1;
        let scroll = self
            .state
            .scroll_row
            .min(range.total_rows.saturating_sub(viewport_rows));

        self.render_header(inner, buf, track_width, shown);
        self.render_time_labels(inner, buf, range, scroll, viewport_rows);

        for session in &self.timetable.sessions {
            let Some(column) = self.timetable.track_index(&session.track) else {
                continue; // unknown track
            };
            if column >= shown {
                continue;
            }
            self.render_session(
                inner,
                buf,
                session,
                column,
                track_width,
                range,
                scroll,
                viewport_rows,
            );
        }
    }
}

/// Truncate a string to a display width, appending `…` when cut. Handles
/// double-width CJK characters.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
