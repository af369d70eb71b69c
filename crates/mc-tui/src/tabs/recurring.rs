use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::app::App;

/// Tab 6: recurring task schedules.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .recurring
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let (glyph, color) = if r.is_active {
                ("+", Color::Green)
            } else {
                ("-", Color::DarkGray)
            };
            let schedule = r
                .schedule_human
                .clone()
                .unwrap_or_else(|| r.schedule_type.clone());
            let mut line = Line::from(vec![
                Span::styled(
                    format!(" {} ", glyph),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<28}", r.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {schedule}"), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("  runs: {}", r.run_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            if let Some(next) = &r.next_run_at {
                line.push_span(Span::styled(
                    format!("  next: {next}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let mut item = ListItem::new(line);
            if i == app.selected_index {
                item = item.style(Style::default().bg(Color::DarkGray));
            }
            item
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Recurring ({})  [Space] pause/resume  [Enter] run now ",
                app.state.recurring.len()
            )),
    );
    frame.render_widget(list, area);
}
