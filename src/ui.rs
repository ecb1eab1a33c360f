//! UI rendering module.
//!
//! This module handles all the TUI rendering using ratatui,
//! implementing the Kanagawa Dragon aesthetic around the timetable grid.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LogLevel};
use crate::grid::GridWidget;
use crate::models::Session;
use crate::theme::{colors, styles, track_color};

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Fill background with theme color
    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    frame.render_widget(bg_block, area);

    if app.load_error.is_some() {
        render_error_view(frame, app, area);
        return;
    }

    // Create main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Event header
            Constraint::Min(10),    // Timetable grid
            Constraint::Length(5),  // Log area
            Constraint::Length(1),  // Status / key hints
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_grid(frame, app, chunks[1]);
    render_logs(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);

    // Render overlays
    if app.modal.is_some() {
        render_session_modal(frame, app, area);
    }

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

/// Render the event header with the edit-mode banner
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    match &app.timetable {
        Some(timetable) => {
            spans.push(Span::styled(
                timetable.event.name.clone(),
                Style::default()
                    .fg(colors::FG_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(
                    "  {}  {}",
                    timetable.event.date.format("%Y-%m-%d"),
                    timetable.event.venue
                ),
                styles::text_dim(),
            ));
            spans.push(Span::styled(
                format!("  {}", timetable.event.hashtag),
                styles::info(),
            ));
        }
        None => spans.push(Span::styled("Loading schedule...", styles::text_dim())),
    }

    if app.edit_mode() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(" EDIT ", styles::edit_banner()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .style(Style::default().bg(colors::BG_MEDIUM)),
    );
    frame.render_widget(header, area);
}

/// Render the timetable grid, or a loading placeholder
fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let Some(timetable) = &app.timetable else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .style(Style::default().bg(colors::BG_DARK));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let y = inner.y + inner.height / 2;
        let centered = Rect::new(inner.x, y, inner.width, 1);
        let paragraph = Paragraph::new("Loading...")
            .style(styles::text_dim())
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, centered);
        return;
    };

    let grid = GridWidget::new(timetable, &app.grid, &app.checked)
        .pending(app.pending.as_ref())
        .now(app.now_minutes);
    frame.render_widget(grid, area);
}

/// Render the log area
fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let (prefix, color) = match entry.level {
                LogLevel::Info => ("i", colors::BLUE),
                LogLevel::Success => ("+", colors::GREEN),
                LogLevel::Warning => ("!", colors::YELLOW),
                LogLevel::Error => ("x", colors::RED),
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", prefix), Style::default().fg(color)),
                Span::styled(&entry.message, styles::text_dim()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Messages ")
            .title_style(Style::default().fg(colors::FG_DIM))
            .borders(Borders::ALL)
            .border_style(styles::border_dim())
            .style(Style::default().bg(colors::BG_DARK)),
    );

    frame.render_widget(list, area);
}

/// Render the status line with key hints
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(app.status_text()).style(styles::text_hint());
    frame.render_widget(paragraph, area);
}

/// Render the session-detail modal
fn render_session_modal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(timetable) = &app.timetable else {
        return;
    };
    let Some(session) = app.modal.and_then(|id| timetable.session(id)) else {
        return;
    };

    let popup_width = (area.width * 60 / 100).clamp(40, 70);
    let popup_height = 13;
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let track_name = timetable
        .track(&session.track)
        .map(|t| t.name.as_str())
        .unwrap_or(session.track.as_str());
    let column = timetable.track_index(&session.track).unwrap_or(0);

    let block = Block::default()
        .title(format!(" {track_name} "))
        .title_style(
            Style::default()
                .fg(track_color(column))
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(styles::border())
        .style(styles::modal_content_bg());

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            session.title.clone(),
            Style::default()
                .fg(colors::FG_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Time:    ", styles::text_dim()),
            Span::styled(
                format!("{} ({} min)", session.time_label(), session.duration_min),
                styles::text(),
            ),
        ]),
    ];

    if let Some(speaker) = &session.speaker {
        lines.push(Line::from(vec![
            Span::styled("Speaker: ", styles::text_dim()),
            Span::styled(speaker.clone(), styles::text()),
        ]));
    }

    if !session.tags.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Tags:    ", styles::text_dim()),
            Span::styled(session.tags.join(", "), styles::info()),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("Checked: ", styles::text_dim()),
        if app.checked.contains(session.id) {
            Span::styled("yes ✓", styles::success())
        } else {
            Span::styled("no", styles::text_dim())
        },
    ]));

    lines.push(Line::from(""));
    lines.push(link_hint_line(session));

    let paragraph = Paragraph::new(lines)
        .style(styles::text())
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);

    let hint = Paragraph::new("Esc to close")
        .style(styles::text_hint())
        .alignment(Alignment::Center);
    let hint_area = Rect::new(
        popup_area.x,
        popup_area.y + popup_area.height - 1,
        popup_area.width,
        1,
    );
    frame.render_widget(hint, hint_area);
}

fn link_hint_line(session: &Session) -> Line<'static> {
    let mut spans = vec![
        Span::styled("g", Style::default().fg(colors::BLUE)),
        Span::styled(" Calendar  ", styles::text_dim()),
        Span::styled("x", Style::default().fg(colors::BLUE)),
        Span::styled(" Post  ", styles::text_dim()),
    ];
    if session.proposal_url.is_some() {
        spans.push(Span::styled("p", Style::default().fg(colors::BLUE)));
        spans.push(Span::styled(" Proposal", styles::text_dim()));
    }
    Line::from(spans)
}

/// Render the terminal load-failure view
fn render_error_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(error) = &app.load_error else {
        return;
    };

    let popup_width = (area.width * 60 / 100).clamp(30, 60);
    let popup_height = 8;
    let popup_area = centered_rect(popup_width, popup_height, area);

    let block = Block::default()
        .title(" Schedule Unavailable ")
        .title_style(
            Style::default()
                .fg(colors::RED)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::RED))
        .style(Style::default().bg(colors::BG_MEDIUM));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = Paragraph::new(error.as_str())
        .style(styles::text())
        .wrap(Wrap { trim: true });
    frame.render_widget(text, inner);

    let hint = Paragraph::new("Press q to quit")
        .style(styles::text_hint())
        .alignment(Alignment::Center);
    let hint_area = Rect::new(
        popup_area.x,
        popup_area.y + popup_area.height - 1,
        popup_area.width,
        1,
    );
    frame.render_widget(hint, hint_area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_width = 52;
    let popup_height = 20;
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(colors::BLUE);
    let section_style = Style::default()
        .fg(colors::PURPLE)
        .add_modifier(Modifier::BOLD);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(colors::BLUE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation", section_style)),
        Line::from(vec![
            Span::styled("  j/k or Up/Down   ", key_style),
            Span::raw("Previous/next session in track"),
        ]),
        Line::from(vec![
            Span::styled("  h/l or Left/Right", key_style),
            Span::raw("Switch tracks"),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn        ", key_style),
            Span::raw("Scroll the grid"),
        ]),
        Line::from(vec![
            Span::styled("  t                ", key_style),
            Span::raw("Jump to the current time"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Attendance", section_style)),
        Line::from(vec![
            Span::styled("  e                ", key_style),
            Span::raw("Enter edit mode"),
        ]),
        Line::from(vec![
            Span::styled("  Space            ", key_style),
            Span::raw("Toggle session (edit mode)"),
        ]),
        Line::from(vec![
            Span::styled("  s / Esc          ", key_style),
            Span::raw("Save / cancel edit"),
        ]),
        Line::from(""),
        Line::from(Span::styled("General", section_style)),
        Line::from(vec![
            Span::styled("  Enter            ", key_style),
            Span::raw("Session details"),
        ]),
        Line::from(vec![
            Span::styled("  q/Ctrl+C         ", key_style),
            Span::raw("Quit"),
        ]),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(styles::title())
                .borders(Borders::ALL)
                .border_style(styles::border())
                .style(Style::default().bg(colors::BG_MEDIUM)),
        )
        .style(styles::text());

    frame.render_widget(paragraph, popup_area);
}

/// Helper to create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
