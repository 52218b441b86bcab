//! Place search screen rendering
//!
//! Renders the search view: a query input box, the list of matching places
//! with the highlighted selection, and the key hints at the bottom.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Place;

/// Renders the place search screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing the query and results
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(3), // Query input
            Constraint::Min(3),    // Result list
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_title(frame, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_results(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);
}

/// Renders the title bar with the app name and the current time
fn render_title(frame: &mut Frame, area: Rect) {
    let time_str = Local::now().format("%a %b %d, %H:%M").to_string();

    let line = Line::from(vec![
        Span::styled(
            "SKYGAZE",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("night sky conditions", Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(time_str, Style::default().fg(Color::White)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the bordered query input with a block cursor
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input = Line::from(vec![
        Span::styled(app.query.clone(), Style::default().fg(Color::White)),
        Span::styled("\u{2588}", Style::default().fg(Color::Cyan)),
    ]);

    let block = Block::default()
        .title(" Search for a place ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(input).block(block), area);
}

/// Renders the result list with the highlighted selection
fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let lines = build_result_lines(&app.results, app.selected_index, &app.query);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds the result list lines
///
/// Empty results render a hint instead: an invitation to type when the query
/// is empty, "no matching places" once a query has been entered.
fn build_result_lines(
    results: &[Place],
    selected_index: usize,
    query: &str,
) -> Vec<Line<'static>> {
    if results.is_empty() {
        let hint = if query.trim().is_empty() {
            "Type a city, town or village name"
        } else {
            "No matching places"
        };
        return vec![Line::from(Span::styled(
            format!("  {}", hint),
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let mut lines = Vec::with_capacity(results.len());
    for (index, place) in results.iter().enumerate() {
        let is_selected = index == selected_index;
        let cursor = if is_selected { "\u{25B8} " } else { "  " };

        let name_style = if is_selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{:<28}", place.label()), name_style),
            Span::styled(
                format!("{:>8.2}, {:>8.2}", place.lat, place.lon),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    lines
}

/// Renders the help text, preceded by the status line when one is set
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(status) = &app.status {
        let line = Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let help = Line::from(vec![
        Span::styled("\u{2191}/\u{2193}", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Select  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear/Quit  "),
        Span::styled("Ctrl+C", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);

    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
