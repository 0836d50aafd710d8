//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Pane};
use super::chats;
use super::compose;
use super::form;
use super::listings;
use super::search;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header (1 line) + main content + status bar (1 line)
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    // Split main area: chats sidebar (28 cols) + content
    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(28), Constraint::Fill(1)]).areas(main_area);

    chats::render_list(
        sidebar_area,
        frame.buffer_mut(),
        &app.chats,
        app.agent_id,
        app.active_pane == Pane::Chats,
    );

    match app.active_pane {
        Pane::Listings => {
            listings::render(content_area, frame.buffer_mut(), &app.listings, true);
        }
        Pane::Chats | Pane::Compose => {
            // Conversation view: message history + compose box
            let [messages_area, compose_area] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(compose::COMPOSE_HEIGHT),
            ])
            .areas(content_area);

            chats::render_messages(messages_area, frame.buffer_mut(), &app.chats, app.agent_id);

            let recipient = app
                .chats
                .selected_chat()
                .and_then(|c| c.other_participant(app.agent_id))
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "agent".to_string());
            compose::render(
                compose_area,
                frame,
                &app.compose,
                &recipient,
                app.active_pane == Pane::Compose,
            );
        }
    }

    render_status(status_area, frame.buffer_mut(), app);

    // Overlays render on top of the main content.
    if app.search.active {
        search::render_overlay(frame, &app.search);
    }
    if app.form.active {
        form::render_overlay(frame, &app.form);
    }
}

/// Render the header bar
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = Span::styled(
        " Respio",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let agent = Span::styled(
        format!(" {} ", app.agent_name),
        Style::default().fg(Color::Cyan),
    );

    let right_content = format!("{} ", app.agent_name);
    let left_width = " Respio".len();
    let padding_width = area
        .width
        .saturating_sub((left_width + right_content.len() + 1) as u16) as usize;
    let padding = Span::raw(" ".repeat(padding_width));

    let header = Paragraph::new(Line::from(vec![title, padding, agent]))
        .style(Style::default().bg(Color::DarkGray));

    header.render(area, buf);
}

/// Render the status bar
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    // If there's a status message, show it prominently.
    if let Some(ref msg) = app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(Color::Red).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).bg(Color::DarkGray)
        };
        let line = Line::from(Span::styled(format!(" {} ", msg), style));
        Paragraph::new(line)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
        return;
    }

    let sep_style = Style::default().fg(Color::DarkGray);

    let pane = Span::styled(
        format!(" Tab: {} ", app.active_pane.as_str()),
        Style::default().fg(Color::Cyan),
    );

    let listings_count = Span::styled(
        format!("{} listings", app.listings.listings.len()),
        Style::default().fg(Color::Yellow),
    );

    let refresh_hint = Span::styled("r: refresh", Style::default().fg(Color::Gray));
    let create_hint = Span::styled("n: new listing", Style::default().fg(Color::Gray));
    let search_hint = Span::styled("C-k: search", Style::default().fg(Color::Gray));

    let status_line = Line::from(vec![
        pane,
        Span::styled(" | ", sep_style),
        listings_count,
        Span::styled(" | ", sep_style),
        refresh_hint,
        Span::styled(" | ", sep_style),
        create_hint,
        Span::styled(" | ", sep_style),
        search_hint,
    ]);

    let status = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));

    status.render(area, buf);
}
