use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use mc_api_types::{ApiTask, Priority, TaskStatus};

use crate::app::App;

/// Tab 2: the kanban board, one column per status.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    for (i, status) in TaskStatus::ORDER.iter().enumerate() {
        let tasks: Vec<&ApiTask> = app
            .state
            .tasks
            .iter()
            .filter(|t| t.status == *status)
            .collect();

        let items: Vec<ListItem> = tasks
            .iter()
            .enumerate()
            .map(|(row, t)| {
                let marker = match t.priority {
                    Priority::Urgent => "!",
                    Priority::Normal => " ",
                };
                let title = if t.title.chars().count() > 20 {
                    let cut: String = t.title.chars().take(17).collect();
                    format!("{cut}...")
                } else {
                    t.title.clone()
                };
                let mut item = ListItem::new(format!("{} {}", marker, title));
                if i == app.kanban_column && row == app.selected_index {
                    item = item.style(
                        Style::default()
                            .bg(Color::DarkGray)
                            .add_modifier(Modifier::BOLD),
                    );
                }
                item
            })
            .collect();

        let color = column_color(*status);
        let border_style = if i == app.kanban_column {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ({}) ", status.label(), tasks.len()))
                .border_style(border_style),
        );
        frame.render_widget(list, columns[i]);
    }
}

fn column_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Inbox => Color::White,
        TaskStatus::Assigned => Color::Yellow,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Review => Color::Magenta,
        TaskStatus::Done => Color::Green,
    }
}
