use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Mode};
use crate::units::{humidity, speed, temperature, time, Units};
use crate::view::WeatherDisplay;

mod theme {
    use super::*;

    pub const BORDER: Style = Style::new().fg(Color::Cyan);
    pub const TITLE: Style = Style::new().fg(Color::Yellow);
    pub const HEADING: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    pub const VALUE: Style = Style::new().fg(Color::Green);
    pub const LABEL: Style = Style::new().fg(Color::Gray);
    pub const ERROR: Style = Style::new().fg(Color::Red);
    pub const ACCENT: Style = Style::new().fg(Color::Blue);
    pub const DISABLED: Style = Style::new().fg(Color::DarkGray);
    pub const SELECTED: Style = Style::new()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
}

fn block(title: &str) -> Block<'_> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::BORDER)
        .border_type(BorderType::Rounded);
    if title.is_empty() {
        block
    } else {
        block
            .title(Span::styled(format!(" {title} "), theme::TITLE))
            .title_alignment(Alignment::Left)
    }
}

fn detail<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {label:13}"), theme::LABEL),
        Span::styled(value, theme::VALUE),
    ])
}

fn key_hint<'a>(key: &'a str, text: &'a str, enabled: bool) -> Vec<Span<'a>> {
    let style = if enabled { theme::ACCENT } else { theme::DISABLED };
    vec![
        Span::styled(format!("[{key}]"), style),
        Span::styled(format!(" {text}  "), if enabled { Style::new() } else { theme::DISABLED }),
    ]
}

fn display_controls(app: &App) -> Paragraph<'_> {
    let loading = app.view.is_loading();
    let fetch = if loading { "Loading..." } else { "Get Weather" };
    let mut first = vec![Span::raw(" ")];
    first.extend(key_hint("g", fetch, !loading));
    first.extend(key_hint("c", "Clear", true));
    first.extend(key_hint("a", "Areas", app.view.can_pick_region()));
    first.extend(key_hint("n/p", "Next/Prev Day", app.view.can_advance()));
    first.extend(key_hint("l", "Logout", true));
    first.extend(key_hint("q", "Quit", true));

    let (input_style, cursor) = if app.mode == Mode::Editing {
        (theme::VALUE, "_")
    } else {
        (Style::new(), "")
    };
    let second = Line::from(vec![
        Span::raw(" "),
        Span::styled("[e]", if loading { theme::DISABLED } else { theme::ACCENT }),
        Span::raw(" Location: "),
        Span::styled(format!("{}{cursor}", app.input), input_style),
    ]);

    Paragraph::new(vec![Line::from(first), second]).block(block("Weather Information"))
}

fn display_status(app: &App) -> Paragraph<'_> {
    let mut lines = vec![];
    if app.view.is_loading() {
        lines.push(Line::from(Span::styled(
            " Fetching weather data...",
            theme::ACCENT,
        )));
    }
    if let Some(error) = app.view.error() {
        lines.push(Line::from(Span::styled(format!(" ! {error}"), theme::ERROR)));
    }
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

pub(crate) fn weather_lines(display: &WeatherDisplay, units: Units) -> Vec<Line<'_>> {
    let day = &display.day;
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" Weather in "),
            Span::styled(display.location.as_str(), theme::HEADING),
        ]),
    ];

    if let Some(area) = &display.area {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Today's 2-Hourly Forecast",
            theme::TITLE,
        )));
        lines.push(Line::from(Span::styled(
            format!(" {}", area.forecast_text),
            theme::VALUE,
        )));
        if let Some(period) = &display.valid_period {
            lines.push(Line::from(Span::styled(
                format!(" Valid from {} to {}", period.start, period.end),
                theme::LABEL,
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Daily Forecast", theme::TITLE),
        Span::raw(format!(" ({})", display.label)),
    ]));
    lines.push(Line::from(format!(" {}", time::format_date(display.date))));
    if let Some(summary) = &day.forecast_summary {
        lines.push(Line::from(Span::styled(
            format!(" {summary}"),
            Style::new().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(detail(
        "Temperature",
        format!(
            "{} - {}",
            temperature::format(day.temperature.min, units),
            temperature::format(day.temperature.max, units)
        ),
    ));
    lines.push(detail(
        "Humidity",
        format!(
            "{} - {}",
            humidity::format(day.humidity.min),
            humidity::format(day.humidity.max)
        ),
    ));
    lines.push(detail("Forecast", day.forecast_text.clone()));
    let wind = format!(
        "{} - {}",
        speed::format(day.wind_speed.min, units),
        speed::format(day.wind_speed.max, units)
    );
    lines.push(detail(
        "Wind Speed",
        match &day.wind_direction {
            Some(direction) => format!("{wind} ({direction})"),
            None => wind,
        },
    ));
    lines.push(detail("Last Updated", display.last_updated.clone()));

    if display.total > 1 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" Day {} of {}", display.index + 1, display.total),
            theme::ACCENT,
        )));
    }
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_dialog(f: &mut Frame, title: &str, message: String, choices: &str) {
    let area = centered(f.area(), 60, 7);
    let text = vec![
        Line::from(""),
        Line::from(format!(" {message}")),
        Line::from(""),
        Line::from(Span::styled(format!(" {choices}"), theme::ACCENT)),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(block(title)),
        area,
    );
}

fn render_picker(f: &mut Frame, app: &mut App) {
    let Some(index) = app.view.areas() else {
        return;
    };
    let selected = app.view.selected_region();
    let items: Vec<ListItem> = index
        .areas
        .iter()
        .map(|area| {
            let name_style = if Some(area.name.as_str()) == selected {
                theme::HEADING
            } else {
                Style::new()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:24}", area.name), name_style),
                Span::styled(area.forecast_text.clone(), theme::VALUE),
            ]))
        })
        .collect();

    let area = centered(f.area(), 60, f.area().height.saturating_sub(4));
    let list = List::new(items)
        .block(block("Select Singapore Area"))
        .highlight_style(theme::SELECTED);
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut app.picker);
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(f.area());

    f.render_widget(display_controls(app), vert_layout[0]);
    f.render_widget(display_status(app), vert_layout[1]);

    let weather = match app.view.display() {
        Some(display) if !app.view.is_loading() => Paragraph::new(weather_lines(display, app.units)),
        _ => Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " Press [g] to get the latest forecast.",
                theme::DISABLED,
            )),
        ]),
    };
    f.render_widget(
        weather.wrap(Wrap { trim: false }).block(block("Forecast")),
        vert_layout[2],
    );

    match app.mode.clone() {
        Mode::RegionPicker => render_picker(f, app),
        Mode::RegionPrompt(text) => render_dialog(
            f,
            "Location Not Found",
            format!(
                "\"{text}\" is not found in Singapore areas. Would you like to select from available areas?"
            ),
            "[y] Show Areas   [n] Cancel",
        ),
        Mode::ConfirmLogout => render_dialog(
            f,
            "Logout",
            "Are you sure you want to logout?".to_string(),
            "[y] Logout   [n] Cancel",
        ),
        Mode::Normal | Mode::Editing => {}
    }
}
