//! Night outlook screen rendering
//!
//! Renders the main view for a selected place: the current conditions, the
//! aggregated summary for tonight's observation window, and the scrollable
//! hourly forecast table.

use chrono::{Local, NaiveDateTime};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{CompassPoint, CurrentConditions, HourlyRecord, NightSummary};
use crate::seeing;
use crate::service::NightOutlook;

/// Maximum number of hourly rows shown in the table
const MAX_HOURLY_ROWS: usize = 24;

/// Color scheme for the outlook screen
mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Unknown/unavailable values
    pub const UNKNOWN: Color = Color::DarkGray;
    /// Favorable conditions (green)
    pub const GOOD: Color = Color::Green;
    /// Marginal conditions (yellow)
    pub const FAIR: Color = Color::Yellow;
    /// Unfavorable conditions (red)
    pub const POOR: Color = Color::Red;
}

/// Star rating string for a seeing score (1-5, 0 when unknown)
fn seeing_stars(score: u8) -> String {
    let filled = usize::from(score.min(5));
    let mut stars = "\u{2605}".repeat(filled);
    stars.push_str(&"\u{2606}".repeat(5 - filled));
    stars
}

/// Color for a seeing score
fn seeing_color(score: u8) -> Color {
    match score {
        4..=5 => colors::GOOD,
        3 => colors::FAIR,
        1..=2 => colors::POOR,
        _ => colors::UNKNOWN,
    }
}

/// Color for a cloud cover percentage (clearer = greener)
fn cloud_color(percent: f64) -> Color {
    if percent <= 20.0 {
        colors::GOOD
    } else if percent <= 50.0 {
        colors::FAIR
    } else if percent <= 80.0 {
        Color::LightRed
    } else {
        colors::POOR
    }
}

/// Color for a precipitation probability percentage
fn precipitation_color(percent: f64) -> Color {
    if percent <= 10.0 {
        colors::GOOD
    } else if percent <= 40.0 {
        colors::FAIR
    } else {
        colors::POOR
    }
}

/// Formats an optional value with one decimal and a unit suffix
fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, suffix),
        None => "n/a".to_string(),
    }
}

/// Formats an optional percentage without decimals
fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v),
        None => "n/a".to_string(),
    }
}

/// Formats an optional value without decimals, placeholder "-"
fn fmt_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}", v),
        None => "-".to_string(),
    }
}

/// Compass label for an optional wind direction angle
fn wind_label(degrees: Option<f64>) -> &'static str {
    match degrees {
        Some(d) => CompassPoint::from_degrees(d).label(),
        None => "",
    }
}

/// Hourly records still ahead of `now`, capped to the table size
fn upcoming(records: &[HourlyRecord], now: NaiveDateTime) -> Vec<HourlyRecord> {
    records
        .iter()
        .filter(|record| record.timestamp >= now)
        .take(MAX_HOURLY_ROWS)
        .copied()
        .collect()
}

/// Renders the night outlook screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let title = app
        .place
        .as_ref()
        .map(|place| place.label())
        .unwrap_or_else(|| "skygaze".to_string());

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let Some(outlook) = &app.outlook else {
        render_error(frame, inner_area, app);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Status line + separator
            Constraint::Length(3), // Current conditions
            Constraint::Length(8), // Night summary
            Constraint::Min(3),    // Hourly table
            Constraint::Length(1), // Help text
        ])
        .split(inner_area);

    render_status(frame, chunks[0], app, outlook);
    render_section(frame, chunks[1], build_current_lines(outlook.current.as_ref()));
    render_section(frame, chunks[2], build_night_lines(&outlook.night));
    render_hourly(frame, chunks[3], &outlook.hourly, app.hourly_scroll);
    render_help(frame, chunks[4], app);
}

/// Renders the loading screen shown while the forecast is fetched
pub fn render_loading(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let label = app
        .place
        .as_ref()
        .map(|place| place.label())
        .unwrap_or_else(|| "the selected place".to_string());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);

    let line = Line::from(Span::styled(
        format!("Loading weather for {}...", label),
        Style::default().fg(colors::SECONDARY),
    ));
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        chunks[1],
    );
}

/// Renders the error message shown when no outlook could be loaded
fn render_error(frame: &mut Frame, area: Rect, app: &App) {
    let message = app
        .status
        .clone()
        .unwrap_or_else(|| "No forecast data available".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(colors::POOR))),
        Line::from(""),
        Line::from(Span::styled(
            "r Retry  s Search  q Quit",
            Style::default().fg(colors::SECONDARY),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the status line with the fetch time and any reload error
fn render_status(frame: &mut Frame, area: Rect, app: &App, outlook: &NightOutlook) {
    let fetched_local = outlook.fetched_at.with_timezone(&Local);
    let mut spans = vec![Span::styled(
        format!("Data fetched {}", fetched_local.format("%H:%M")),
        Style::default().fg(colors::SECONDARY),
    )];

    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(colors::POOR),
        ));
    }

    let separator = "\u{2500}".repeat(area.width as usize);
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            separator,
            Style::default().fg(colors::UNKNOWN),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders a block of prebuilt lines
fn render_section(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds the lines for the current conditions section
fn build_current_lines(current: Option<&CurrentConditions>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "NOW",
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))];

    match current {
        Some(c) => {
            let wind = match c.wind_speed_10m {
                Some(speed) => format!(
                    "{:.0} km/h {}",
                    speed,
                    wind_label(c.wind_direction_10m)
                ),
                None => "n/a".to_string(),
            };

            lines.push(Line::from(vec![
                Span::styled(
                    fmt_opt(c.temperature_2m, "\u{00B0}C"),
                    Style::default().fg(colors::PRIMARY),
                ),
                Span::styled("  humidity ", Style::default().fg(colors::SECONDARY)),
                Span::styled(
                    fmt_pct(c.relative_humidity_2m),
                    Style::default().fg(colors::PRIMARY),
                ),
                Span::styled("  wind ", Style::default().fg(colors::SECONDARY)),
                Span::styled(wind, Style::default().fg(colors::PRIMARY)),
            ]));

            let cloud_style = match c.cloud_cover {
                Some(pct) => Style::default().fg(cloud_color(pct)),
                None => Style::default().fg(colors::UNKNOWN),
            };
            let precip_style = match c.precipitation_probability {
                Some(pct) => Style::default().fg(precipitation_color(pct)),
                None => Style::default().fg(colors::UNKNOWN),
            };
            lines.push(Line::from(vec![
                Span::styled("cloud ", Style::default().fg(colors::SECONDARY)),
                Span::styled(fmt_pct(c.cloud_cover), cloud_style),
                Span::styled("  dew point ", Style::default().fg(colors::SECONDARY)),
                Span::styled(
                    fmt_opt(c.dew_point_2m, "\u{00B0}C"),
                    Style::default().fg(colors::PRIMARY),
                ),
                Span::styled("  rain ", Style::default().fg(colors::SECONDARY)),
                Span::styled(fmt_pct(c.precipitation_probability), precip_style),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Current conditions unavailable",
                Style::default().fg(colors::UNKNOWN),
            )));
        }
    }

    lines
}

/// Builds the lines for the night summary section
fn build_night_lines(night: &NightSummary) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "TONIGHT",
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))];

    lines.push(Line::from(vec![
        Span::styled("Dark window: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            format!(
                "{} to {}",
                night.window.dusk.format("%a %H:%M"),
                night.window.dawn.format("%a %H:%M")
            ),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(
            format!(" ({} hours sampled)", night.sampled_hours),
            Style::default().fg(colors::SECONDARY),
        ),
    ]));

    if night.sampled_hours == 0 {
        lines.push(Line::from(Span::styled(
            "No forecast hours inside tonight's window",
            Style::default().fg(colors::UNKNOWN),
        )));
        return lines;
    }

    lines.push(Line::from(vec![
        Span::styled("Seeing: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            seeing_stars(night.seeing_index),
            Style::default().fg(seeing_color(night.seeing_index)),
        ),
        Span::styled(
            if night.seeing_index > 0 {
                format!(" ({}/5)", night.seeing_index)
            } else {
                " (n/a)".to_string()
            },
            Style::default().fg(colors::SECONDARY),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Worst cloud cover: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            format!("{:.0}%", night.extreme_cloud_cover),
            Style::default().fg(cloud_color(night.extreme_cloud_cover)),
        ),
        Span::styled("  max rain risk: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            format!("{:.0}%", night.max_precipitation_probability),
            Style::default().fg(precipitation_color(night.max_precipitation_probability)),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Wind: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            fmt_opt(night.avg_wind_speed, " km/h"),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(
            format!(" {}", night.wind_direction_label()),
            Style::default().fg(colors::PRIMARY),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Temp: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            fmt_opt(night.avg_temperature, "\u{00B0}C"),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled("  humidity: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            fmt_opt(night.avg_humidity, "%"),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled("  dew point: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            fmt_opt(night.avg_dew_point, "\u{00B0}C"),
            Style::default().fg(colors::PRIMARY),
        ),
    ]));

    lines
}

/// Renders the hourly table: fixed headers on top, scrollable rows below
fn render_hourly(frame: &mut Frame, area: Rect, records: &[HourlyRecord], scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let headers = vec![
        Line::from(Span::styled(
            "HOURLY FORECAST",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{:<7}{:>5}  {:>11}  {:>5}  {:>3}  {:>10}  {:>6}  {:>4}  {:>6}",
                "Time", "Cloud", "L/M/H", "Rain", "See", "Wind", "Temp", "Hum", "Dew"
            ),
            Style::default().fg(colors::SECONDARY),
        )),
    ];
    frame.render_widget(Paragraph::new(headers), chunks[0]);

    let rows = upcoming(records, Local::now().naive_local());
    let lines: Vec<Line<'static>> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "No more forecast hours",
            Style::default().fg(colors::UNKNOWN),
        ))]
    } else {
        rows.iter().map(build_hourly_line).collect()
    };

    let max_scroll = lines.len().saturating_sub(1) as u16;
    let offset = scroll.min(max_scroll);
    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), chunks[1]);
}

/// Builds a single row of the hourly table
fn build_hourly_line(record: &HourlyRecord) -> Line<'static> {
    let cloud_style = match record.cloud_cover {
        Some(pct) => Style::default().fg(cloud_color(pct)),
        None => Style::default().fg(colors::UNKNOWN),
    };
    let precip_style = match record.precipitation_probability {
        Some(pct) => Style::default().fg(precipitation_color(pct)),
        None => Style::default().fg(colors::UNKNOWN),
    };

    let (seeing_str, seeing_style) = match seeing::score_record(record) {
        Some(score) => (
            score.to_string(),
            Style::default().fg(seeing_color(score)),
        ),
        None => ("-".to_string(), Style::default().fg(colors::UNKNOWN)),
    };

    let layers = format!(
        "{:>3}/{:>3}/{:>3}",
        fmt_cell(record.cloud_cover_low),
        fmt_cell(record.cloud_cover_mid),
        fmt_cell(record.cloud_cover_high)
    );

    let wind = match record.wind_speed {
        Some(speed) => format!("{:.0} {}", speed, wind_label(record.wind_direction)),
        None => "n/a".to_string(),
    };

    Line::from(vec![
        Span::styled(
            format!("{:<7}", format!("{:02}:00", record.hour)),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(format!("{:>5}", fmt_pct(record.cloud_cover)), cloud_style),
        Span::styled(
            format!("  {:>11}", layers),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::styled(
            format!("  {:>5}", fmt_pct(record.precipitation_probability)),
            precip_style,
        ),
        Span::styled(format!("  {:>3}", seeing_str), seeing_style),
        Span::styled(
            format!("  {:>10}", wind),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(
            format!("  {:>6}", fmt_opt(record.temperature, "\u{00B0}")),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(
            format!("  {:>4}", fmt_pct(record.humidity)),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(
            format!("  {:>6}", fmt_opt(record.dew_point, "\u{00B0}")),
            Style::default().fg(colors::PRIMARY),
        ),
    ])
}

/// Renders the help text with the data freshness indicator
fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("r", Style::default().fg(colors::FAIR)),
        Span::raw(" Refresh  "),
        Span::styled("R", Style::default().fg(colors::FAIR)),
        Span::raw(" Force  "),
        Span::styled("s", Style::default().fg(colors::FAIR)),
        Span::raw(" Search  "),
        Span::styled("\u{2191}/\u{2193}", Style::default().fg(colors::FAIR)),
        Span::raw(" Scroll  "),
        Span::styled("q", Style::default().fg(colors::FAIR)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness = if mins_ago < 1 {
            " \u{2502} Data: just now".to_string()
        } else if mins_ago < 60 {
            format!(" \u{2502} Data: {}m ago", mins_ago)
        } else {
            format!(" \u{2502} Data: {}h ago", elapsed.num_hours())
        };
        spans.push(Span::styled(
            freshness,
            Style::default().fg(colors::UNKNOWN),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(colors::UNKNOWN)),
        area,
    );
}
