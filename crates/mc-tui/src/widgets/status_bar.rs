use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// Render the bottom status bar: key hints, last action outcome, live
/// WebSocket indicator.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut left = vec![
        Span::styled("[?]", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("[r]", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("[q]", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit  "),
    ];
    if let Some(notice) = &app.notice {
        left.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::LightRed),
        ));
    }

    let (ws_label, ws_color) = if app.ws_connected {
        ("live", Color::Green)
    } else {
        ("reconnecting", Color::Red)
    };
    let now = Local::now().format("%H:%M:%S");
    let right_text = format!("ws: {ws_label}  {now}");

    // Left-aligned hints and a right-aligned connection indicator on one
    // line; ratatui has no split alignment in a single Paragraph, so pad
    // the middle.
    let left_len: usize = left.iter().map(|s| s.content.len()).sum();
    let total_width = area.width as usize;
    let padding = if total_width > left_len + right_text.len() {
        total_width - left_len - right_text.len()
    } else {
        1
    };

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right_text, Style::default().fg(ws_color)));

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(bar, area);
}
