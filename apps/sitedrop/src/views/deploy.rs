//! Deploy tab: token and folder inputs, actions, progress, result.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use sitedrop_deploy::AttemptState;

use crate::app::{App, DeployField};
use crate::views::{ACCENT, MUTED, button, input_field};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // token
            Constraint::Length(3), // folder
            Constraint::Length(3), // buttons
            Constraint::Length(3), // progress gauge
            Constraint::Length(1), // status line
            Constraint::Length(4), // url / error alert
            Constraint::Min(0),    // guide
        ])
        .split(area);

    let masked = "•".repeat(app.token_input.chars().count());
    frame.render_widget(
        input_field(
            "Personal Access Token",
            masked,
            app.deploy_focus == DeployField::Token,
        ),
        rows[0],
    );
    frame.render_widget(
        input_field(
            "Website Folder",
            app.folder_input.clone(),
            app.deploy_focus == DeployField::Folder,
        ),
        rows[1],
    );

    draw_buttons(frame, app, rows[2]);

    if app.attempt.state != AttemptState::Idle {
        draw_progress(frame, app, rows[3], rows[4]);
        draw_result(frame, app, rows[5]);
    } else {
        draw_guide(frame, rows[6]);
    }
}

fn draw_buttons(frame: &mut Frame, app: &App, area: Rect) {
    let has_url = !app.attempt.url.is_empty();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let deploy_label = if app.deploying {
        "Deploying...".to_string()
    } else {
        "Deploy".to_string()
    };
    frame.render_widget(
        button(deploy_label, app.deploy_focus == DeployField::DeployButton),
        cols[0],
    );
    frame.render_widget(
        button("Reset".to_string(), app.deploy_focus == DeployField::ResetButton),
        cols[1],
    );
    if has_url {
        frame.render_widget(
            button("Copy URL".to_string(), app.deploy_focus == DeployField::CopyUrl),
            cols[2],
        );
    }
}

fn draw_progress(frame: &mut Frame, app: &App, gauge_area: Rect, status_area: Rect) {
    let color = match app.attempt.state {
        AttemptState::Success => Color::Green,
        AttemptState::Error => Color::Red,
        _ => ACCENT,
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Deployment Progress"),
        )
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(app.attempt.percent));
    frame.render_widget(gauge, gauge_area);

    let (label, label_color) = match app.attempt.state {
        AttemptState::Building => ("Building and deploying...", Color::Yellow),
        AttemptState::Success => ("Deployment successful!", Color::Green),
        AttemptState::Error => ("Deployment failed", Color::Red),
        AttemptState::Idle => ("", Color::Reset),
    };
    let status = Line::from(vec![
        Span::styled(
            label,
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.attempt.message.clone(), Style::default().fg(MUTED)),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);
}

fn draw_result(frame: &mut Frame, app: &App, area: Rect) {
    match app.attempt.state {
        AttemptState::Success if !app.attempt.url.is_empty() => {
            let body = Paragraph::new(app.attempt.url.clone())
                .style(Style::default().fg(ACCENT))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Deployment URL"));
            frame.render_widget(body, area);
        }
        AttemptState::Error => {
            let body = Paragraph::new(
                "There was an error deploying your site. Please check your token and try again.",
            )
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Deployment Error")
                    .border_style(Style::default().fg(Color::Red)),
            );
            frame.render_widget(body, area);
        }
        _ => {}
    }
}

fn draw_guide(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Deployment Guide", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            " 1. Create a personal access token in your hosting account settings",
            Style::default().fg(MUTED),
        )),
        Line::from(Span::styled(
            " 2. Enter the token and the folder containing your website files",
            Style::default().fg(MUTED),
        )),
        Line::from(Span::styled(
            " 3. Select Deploy and track the progress in real time",
            Style::default().fg(MUTED),
        )),
        Line::from(Span::styled(
            " 4. Copy the deployment URL once the site is published",
            Style::default().fg(MUTED),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
