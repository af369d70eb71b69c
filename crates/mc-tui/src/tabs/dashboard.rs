use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use mc_api_types::TaskStatus;

use crate::app::App;

/// Tab 1: KPI cards, backend health panels, agent summary.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // KPI cards
            Constraint::Length(5), // gateway + stuck-task panels
            Constraint::Min(0),    // agent summary
        ])
        .split(area);

    render_kpi_cards(frame, app, chunks[0]);

    let health = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_gateway(frame, app, health[0]);
    render_stuck_tasks(frame, app, health[1]);

    render_agent_summary(frame, app, chunks[2]);
}

fn render_kpi_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let in_review = app
        .state
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Review)
        .count();
    let unread = app.state.notifications.unread_count_for("human");

    let cards: Vec<(&str, String, Color)> = vec![
        (
            "Agents",
            format!("{}", app.state.stats.agents_active),
            Color::Green,
        ),
        (
            "Queue",
            format!("{}", app.state.stats.tasks_in_queue),
            Color::Yellow,
        ),
        ("Review", format!("{in_review}"), Color::Magenta),
        ("Mentions", format!("{unread}"), Color::Cyan),
    ];

    for (i, (title, value, color)) in cards.iter().enumerate() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .border_style(Style::default().fg(*color));
        let text = Paragraph::new(Line::from(Span::styled(
            value.clone(),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        )))
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(text, cols[i]);
    }
}

fn render_gateway(frame: &mut Frame, app: &App, area: Rect) {
    let gw = &app.state.gateway;
    let (label, color) = if gw.running {
        ("running", Color::Green)
    } else {
        ("down", Color::Red)
    };
    let mut lines = vec![Line::from(vec![
        Span::raw("status: "),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])];
    if let Some(pid) = gw.pid {
        lines.push(Line::from(format!("pid: {pid}")));
    }
    if let Some(uptime) = gw.uptime_seconds {
        lines.push(Line::from(format!("uptime: {}s", uptime)));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Gateway [g] restart "),
    );
    frame.render_widget(panel, area);
}

fn render_stuck_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let st = &app.state.stuck_tasks;
    let lines = vec![
        Line::from(format!("tracked: {}", st.currently_tracked_tasks)),
        Line::from(format!("nudges sent: {}", st.total_notifications_sent)),
        Line::from(format!(
            "last run: {}",
            st.last_run.as_deref().unwrap_or("never")
        )),
    ];
    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Stuck tasks [s] check now "),
    );
    frame.render_widget(panel, area);
}

fn render_agent_summary(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .agents
        .iter()
        .map(|a| {
            let glyph = a.status.glyph();
            let color = match glyph {
                "@" => Color::Green,
                "*" => Color::Yellow,
                "!" => Color::Red,
                _ => Color::DarkGray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", glyph),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{} ({:?})", a.name, a.role)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Agents ({}) ", app.state.agents.len())),
    );
    frame.render_widget(list, area);
}
