// View rendering - scrollback window, input line, status bar
//
// Rendering is a pure function of App state: the visible slice of
// scrollback goes through the line renderer, resolved runs become ratatui
// spans, and the status bar reads connection/scroll/log state. The only
// mutation here is syncing the viewport extent to the frame size.

use crate::logging::LogLevel;
use crate::render::{ColorValue, LineRenderer, TextRun};
use crate::tui::app::App;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as UiLine, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

pub fn draw(f: &mut Frame, app: &mut App) {
    let [output_area, input_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_scrollback(f, output_area, app);
    draw_input(f, input_area, app);
    draw_status(f, status_area, app);
}

fn draw_scrollback(f: &mut Frame, area: Rect, app: &mut App) {
    // Sync the viewport to the frame before slicing; resizes clamp the
    // scroll position here.
    app.viewport
        .set_extent(app.scrollback.len() as u32, u32::from(area.height));

    let renderer = LineRenderer::new(&app.theme);
    let start = app.viewport.scroll_top as usize;
    let rows: Vec<UiLine> = app
        .scrollback
        .window(start, area.height as usize)
        .map(|line| {
            let spans: Vec<Span> = renderer
                .render_line(line)
                .into_iter()
                .map(run_to_span)
                .collect();
            UiLine::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(rows), area);
}

fn run_to_span(run: TextRun) -> Span<'static> {
    let mut style = Style::default();
    if let Some(fg) = run.foreground.as_ref().and_then(to_color) {
        style = style.fg(fg);
    }
    if let Some(bg) = run.background.as_ref().and_then(to_color) {
        style = style.bg(bg);
    }
    Span::styled(run.text, style)
}

/// Map a resolved color onto the terminal. Pass-through names go through
/// ratatui's parser (ANSI names, hex); anything it cannot parse renders
/// unstyled - cosmetic degradation only.
fn to_color(value: &ColorValue) -> Option<Color> {
    match value {
        ColorValue::Rgb(r, g, b) => Some(Color::Rgb(*r, *g, *b)),
        ColorValue::Indexed(i) => Some(Color::Indexed(*i)),
        ColorValue::Named(name) => Color::from_str(name).ok(),
    }
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    const PROMPT: &str = "> ";

    let echo = to_color(&crate::render::resolve_color(app.theme.echo_value(), None));
    let mut style = Style::default();
    if let Some(color) = echo {
        style = style.fg(color);
    }

    let line = UiLine::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::DarkGray)),
        Span::styled(app.input.clone(), style),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + (PROMPT.width() + app.input.width()) as u16;
    f.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let (status, status_color) = if app.connected {
        ("connected", Color::Green)
    } else {
        ("offline", Color::Red)
    };

    let position = if app.viewport.scroll_top >= app.viewport.max_scroll_top() {
        "following".to_string()
    } else {
        format!(
            "scroll {}/{}",
            app.viewport.scroll_top + app.viewport.client_height,
            app.viewport.scroll_height
        )
    };

    let mut spans = vec![
        Span::styled(format!(" {status} "), Style::default().fg(status_color)),
        Span::raw("| "),
        Span::raw(position),
        Span::raw(" | "),
        Span::raw(app.theme.name.clone()),
    ];

    if let Some(entry) = app.log_buffer.latest_at_least(LogLevel::Warn) {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} {}", entry.level.as_str(), entry.message),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let bar = Paragraph::new(UiLine::from(spans))
        .style(Style::default().fg(Color::Gray).bg(Color::Indexed(236)));
    f.render_widget(bar, area);
}
