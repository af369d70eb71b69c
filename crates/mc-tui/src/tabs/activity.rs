use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use mc_store::FeedKind;

use crate::app::App;

/// Tab 5: the live activity feed and unread mention notifications.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_feed(frame, app, chunks[0]);
    render_notifications(frame, app, chunks[1]);
}

fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .feed
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let color = match entry.kind {
                FeedKind::Task => Color::White,
                FeedKind::Comment => Color::Cyan,
                FeedKind::Status => Color::Magenta,
                FeedKind::Announcement => Color::Yellow,
            };
            let when = entry.timestamp.format("%H:%M:%S");
            let mut item = ListItem::new(Line::from(vec![
                Span::styled(format!("{when} "), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} ", entry.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(entry.detail.clone()),
            ]));
            if i == app.selected_index {
                item = item.style(Style::default().bg(Color::DarkGray));
            }
            item
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Activity ({}) ", app.state.feed.len())),
    );
    frame.render_widget(list, area);
}

fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .notifications
        .all()
        .iter()
        .map(|n| {
            let style = if n.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} -> {}: ", n.from_agent, n.to_agent), style),
                Span::raw(n.text.clone()),
            ]))
        })
        .collect();

    let unread = app.state.notifications.unread_count_for("human");
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Mentions ({unread} unread) ")),
    );
    frame.render_widget(list, area);
}
