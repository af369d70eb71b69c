use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Tab 4: chat history plus the composer with its mention dropdown.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // history
            Constraint::Length(3), // composer
        ])
        .split(area);

    render_history(frame, app, chunks[0]);
    render_composer(frame, app, chunks[1]);

    let dropdown = app.mention_suggestions();
    if !dropdown.is_empty() {
        render_dropdown(frame, app, chunks[1]);
    }
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.state.chat.len().saturating_sub(visible);

    let items: Vec<ListItem> = app.state.chat[start..]
        .iter()
        .map(|entry| {
            if entry.is_typing {
                return ListItem::new(Line::from(Span::styled(
                    format!("{} is typing...", entry.message.agent_id),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
            let who = entry
                .message
                .agent
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| entry.message.agent_id.clone());
            let color = if entry.message.agent_id == "user" {
                Color::Cyan
            } else {
                Color::Green
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{who}: "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(entry.message.content.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Chat "));
    frame.render_widget(list, area);
}

fn render_composer(frame: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        Span::raw(app.chat_input.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message (@ to mention, Enter to send) "),
    );
    frame.render_widget(input, area);
}

/// Small popup anchored above the composer listing mention candidates.
fn render_dropdown(frame: &mut Frame, app: &App, composer: Rect) {
    let dropdown = app.mention_suggestions();
    let height = (dropdown.len() as u16 + 2).min(8);
    let area = Rect {
        x: composer.x + 2,
        y: composer.y.saturating_sub(height),
        width: composer.width.saturating_sub(4).min(40),
        height,
    };

    let items: Vec<ListItem> = dropdown
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            let mut item = ListItem::new(format!("@{} ({})", agent.id, agent.name));
            if i == app.mention_index {
                item = item.style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                );
            }
            item
        })
        .collect();

    frame.render_widget(ratatui::widgets::Clear, area);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Mention (Tab to accept) ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}
