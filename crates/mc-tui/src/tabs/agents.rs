use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use mc_api_types::AgentStatus;

use crate::app::App;

/// Tab 3: the full agent roster with live status.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .agents
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let color = status_color(a.status);
            let model = a.primary_model.as_deref().unwrap_or("-");
            let mut line = Line::from(vec![
                Span::styled(
                    format!(" {} ", a.status.glyph()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<16}", a.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {:?}  ", a.role)),
                Span::styled(model.to_string(), Style::default().fg(Color::DarkGray)),
            ]);
            if let Some(desc) = &a.description {
                line.push_span(Span::styled(
                    format!("  {desc}"),
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
            .title(format!(" Agents ({}) ", app.state.agents.len())),
    );
    frame.render_widget(list, area);
}

fn status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Working => Color::Green,
        AgentStatus::Idle => Color::Yellow,
        AgentStatus::Standby => Color::Cyan,
        AgentStatus::Offline => Color::DarkGray,
        AgentStatus::Error => Color::Red,
    }
}
