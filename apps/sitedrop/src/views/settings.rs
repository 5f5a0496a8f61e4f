//! Settings tab: site name, URL, flags, build image.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, SettingsField};
use crate::views::{ACCENT, MUTED, button, input_field};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    if app.settings_loading {
        let body = Paragraph::new("Loading site settings...")
            .style(Style::default().fg(MUTED))
            .block(Block::default().borders(Borders::ALL).title("Site Settings"));
        frame.render_widget(body, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // name
            Constraint::Length(3), // url (read-only)
            Constraint::Length(1), // ssl
            Constraint::Length(1), // https only
            Constraint::Length(1), // pretty urls
            Constraint::Length(3), // build image
            Constraint::Length(3), // buttons
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        input_field(
            "Site Name",
            app.settings.name.clone(),
            app.settings_focus == SettingsField::Name,
        ),
        rows[0],
    );

    let url = if app.settings.url.is_empty() {
        "Your site URL will appear here after deployment".to_string()
    } else {
        app.settings.url.clone()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(url, Style::default().fg(MUTED)))
            .block(Block::default().borders(Borders::ALL).title("Site URL")),
        rows[1],
    );

    frame.render_widget(
        toggle_line(
            "SSL",
            "Enable SSL for your site",
            app.settings.ssl,
            app.settings_focus == SettingsField::Ssl,
        ),
        rows[2],
    );
    frame.render_widget(
        toggle_line(
            "HTTPS Only",
            "Redirect all HTTP requests to HTTPS",
            app.settings.https_only,
            app.settings_focus == SettingsField::HttpsOnly,
        ),
        rows[3],
    );
    frame.render_widget(
        toggle_line(
            "Pretty URLs",
            "Remove trailing .html extensions from URLs",
            app.settings.pretty_urls,
            app.settings_focus == SettingsField::PrettyUrls,
        ),
        rows[4],
    );

    frame.render_widget(
        input_field(
            "Build Image",
            app.settings.build_image.clone(),
            app.settings_focus == SettingsField::BuildImage,
        ),
        rows[5],
    );

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[6]);

    let save_label = if app.settings_saving {
        "Saving...".to_string()
    } else {
        "Save Settings".to_string()
    };
    frame.render_widget(
        button(save_label, app.settings_focus == SettingsField::Save),
        cols[0],
    );
    frame.render_widget(
        button("Reload".to_string(), app.settings_focus == SettingsField::Reload),
        cols[1],
    );
}

fn toggle_line<'a>(label: &'a str, hint: &'a str, on: bool, focused: bool) -> Paragraph<'a> {
    let mark = if on { "[x]" } else { "[ ]" };
    let style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    Paragraph::new(Line::from(vec![
        Span::styled(format!("{mark} {label}"), style),
        Span::styled(format!("  {hint}"), Style::default().fg(MUTED)),
    ]))
}
