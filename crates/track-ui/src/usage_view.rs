//! The usage dashboard for the apptrack TUI.
//!
//! Renders the focus-mode banner, the currently active application with its
//! live open segment, a leaderboard table of the most-used applications, and
//! a key-binding footer.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use track_core::formatting;

use crate::themes::Theme;

/// Maximum display width for an application name; longer names are
/// truncated with an ellipsis.
const APP_NAME_WIDTH: usize = 32;

/// Display-ready snapshot data for the dashboard.
#[derive(Debug, Clone)]
pub struct UsageViewData {
    /// Whether focus mode is active.
    pub focus_mode: bool,
    /// Name of the application currently being timed, if any.
    pub current: Option<String>,
    /// Seconds accrued in the not-yet-materialised open segment.
    pub open_segment_secs: f64,
    /// Leaderboard `(application, total seconds)`, already sorted.
    pub top: Vec<(String, f64)>,
    /// Pre-formatted wall-clock string shown in the header.
    pub clock: String,
}

/// Render the dashboard into `area`.
pub fn render_usage_view(frame: &mut Frame, area: Rect, data: &UsageViewData, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, chunks[0], data, theme);
    render_body(frame, chunks[1], data, theme);
    render_footer(frame, chunks[2], theme);
}

/// Render a placeholder before the first snapshot arrives.
pub fn render_waiting(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Waiting for first observation...", theme.dim)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Program Tracker "),
        ),
        area,
    );
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, data: &UsageViewData, theme: &Theme) {
    let (focus_text, focus_style) = if data.focus_mode {
        ("Focus Mode: ON", theme.focus_on)
    } else {
        ("Focus Mode: OFF", theme.focus_off)
    };

    let line = Line::from(vec![
        Span::styled(focus_text, focus_style),
        Span::styled("    ", theme.dim),
        Span::styled(data.clock.clone(), theme.dim),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Program Tracker "),
        ),
        area,
    );
}

fn render_body(frame: &mut Frame, area: Rect, data: &UsageViewData, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    // Active application with its live open segment.
    let active_line = match &data.current {
        Some(name) => Line::from(vec![
            Span::styled("Active: ", theme.label),
            Span::styled(truncate_name(name), theme.value),
            Span::styled(
                format!(" ({})", formatting::format_duration(data.open_segment_secs)),
                theme.dim,
            ),
        ]),
        None => Line::from(Span::styled("Active: -", theme.dim)),
    };
    frame.render_widget(Paragraph::new(active_line), chunks[0]);

    // Leaderboard.
    if data.top.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No usage recorded yet", theme.dim)),
            chunks[1],
        );
        return;
    }

    let header = Row::new(
        ["#", "Application", "Time"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = data
        .top
        .iter()
        .enumerate()
        .map(|(i, (name, secs))| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(truncate_name(name)),
                Cell::from(formatting::format_whole_minutes(*secs)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(APP_NAME_WIDTH as u16),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Top Usage "))
        .style(theme.text);

    frame.render_widget(table, chunks[1]);
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    let line = Line::from(Span::styled(
        "R reset  |  F focus mode  |  Q quit",
        theme.footer,
    ));
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Commands ")),
        area,
    );
}

/// Truncate an application name to the display column, appending an ellipsis
/// when it does not fit.
fn truncate_name(name: &str) -> String {
    if name.width() <= APP_NAME_WIDTH {
        return name.to_string();
    }
    let mut out = String::new();
    let mut w = 0;
    for ch in name.chars() {
        let cw = ch.width().unwrap_or(0);
        if w + cw > APP_NAME_WIDTH - 1 {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push('…');
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_data() -> UsageViewData {
        UsageViewData {
            focus_mode: true,
            current: Some("firefox".to_string()),
            open_segment_secs: 42.0,
            top: vec![
                ("firefox".to_string(), 3_600.0),
                ("code".to_string(), 1_800.0),
                ("slack".to_string(), 90.0),
            ],
            clock: "12:34:56".to_string(),
        }
    }

    #[test]
    fn test_render_usage_view_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let data = make_data();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_usage_view(frame, area, &data, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_usage_view_shows_focus_banner_and_leaderboard() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let data = make_data();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_usage_view(frame, area, &data, &theme);
            })
            .unwrap();

        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Focus Mode: ON"));
        assert!(rendered.contains("firefox"));
        assert!(rendered.contains("60 min"));
    }

    #[test]
    fn test_render_usage_view_empty_leaderboard_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let data = UsageViewData {
            focus_mode: false,
            current: None,
            open_segment_secs: 0.0,
            top: vec![],
            clock: "00:00:00".to_string(),
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_usage_view(frame, area, &data, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_usage_view_tiny_area_does_not_panic() {
        let backend = TestBackend::new(10, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let data = make_data();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_usage_view(frame, area, &data, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_waiting_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_waiting(frame, area, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_truncate_name_short_unchanged() {
        assert_eq!(truncate_name("firefox"), "firefox");
    }

    #[test]
    fn test_truncate_name_long_ellipsised() {
        let long = "a".repeat(64);
        let truncated = truncate_name(&long);
        assert!(truncated.ends_with('…'));
        assert!(truncated.width() <= APP_NAME_WIDTH);
    }
}
