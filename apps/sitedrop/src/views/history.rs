//! History tab: the site's deployments with refresh and redeploy.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use sitedrop_hosting::{DeployState, Deployment};

use crate::app::App;
use crate::views::MUTED;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Deployment History — r refresh · Enter redeploy");

    if app.history_loading {
        let body = Paragraph::new("Loading deployments...")
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(body, area);
        return;
    }

    if app.history.is_empty() {
        let body = Paragraph::new("No deployments found")
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(body, area);
        return;
    }

    let items: Vec<ListItem> = app.history.iter().map(history_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.history_state);
}

fn history_item(deploy: &Deployment) -> ListItem<'static> {
    let (color, label) = match deploy.state {
        DeployState::Ready => (Color::Green, "Published"),
        DeployState::Error => (Color::Red, "Failed"),
        DeployState::Building => (Color::Yellow, "Building"),
    };

    let mut spans = vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format_relative(deploy.created_at),
            Style::default().fg(MUTED),
        ),
    ];
    if deploy.state == DeployState::Ready {
        if let Some(url) = &deploy.deploy_url {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(url.clone(), Style::default().fg(MUTED)));
        }
    }

    ListItem::new(Line::from(spans))
}

/// Compact relative timestamp for list rows.
pub(crate) fn format_relative(created_at: Option<DateTime<Utc>>) -> String {
    let Some(created) = created_at else {
        return "—".to_string();
    };
    let secs = Utc::now().signed_duration_since(created).num_seconds().max(0);

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3_600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3_600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
