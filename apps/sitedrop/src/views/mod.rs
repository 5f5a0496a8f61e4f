//! Rendering for the three tabs plus shared chrome.

pub mod deploy;
pub mod history;
pub mod settings;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use crate::app::{App, Tab};
use crate::notice::NoticeKind;

/// Accent color for focused and active elements.
pub(crate) const ACCENT: Color = Color::Cyan;
pub(crate) const MUTED: Color = Color::DarkGray;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(frame.area());

    draw_tab_bar(frame, app, rows[0]);

    match app.tab {
        Tab::Deploy => deploy::draw(frame, app, rows[1]),
        Tab::History => {
            if app.has_site_context() {
                history::draw(frame, app, rows[1]);
            } else {
                draw_locked(
                    frame,
                    rows[1],
                    "Deployment History",
                    "You need to deploy your site first to view deployment history.",
                );
            }
        }
        Tab::Settings => {
            if app.has_site_context() {
                settings::draw(frame, app, rows[1]);
            } else {
                draw_locked(
                    frame,
                    rows[1],
                    "Site Settings",
                    "You need to deploy your site first to configure settings.",
                );
            }
        }
    }

    draw_footer(frame, app, rows[2]);
}

fn draw_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let index = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.label()))
        .select(index)
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("sitedrop"));
    frame.render_widget(tabs, area);
}

/// Placeholder for tabs that need a site and a token first.
fn draw_locked(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let body = Paragraph::new(message.to_string())
        .style(Style::default().fg(MUTED))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(body, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    if app.notices.is_empty() {
        let hints = Line::from(Span::styled(
            "Tab switch tab · ↑/↓ move · Enter activate · r refresh history · Esc quit",
            Style::default().fg(MUTED),
        ));
        frame.render_widget(Paragraph::new(hints), area);
        return;
    }

    let lines: Vec<Line> = app
        .notices
        .iter()
        .rev()
        .take(area.height as usize)
        .map(|n| {
            let color = match n.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
                NoticeKind::Info => MUTED,
            };
            Line::from(Span::styled(n.text.clone(), Style::default().fg(color)))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// A bordered single-line input field.
pub(crate) fn input_field<'a>(label: &'a str, value: String, focused: bool) -> Paragraph<'a> {
    let border = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(border),
    )
}

/// A `[ label ]`-style button.
pub(crate) fn button<'a>(label: String, focused: bool) -> Paragraph<'a> {
    let style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Paragraph::new(Span::styled(format!("[ {label} ]"), style))
        .alignment(ratatui::layout::Alignment::Center)
}
