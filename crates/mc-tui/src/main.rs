mod app;
mod tabs;
mod ui;
mod widgets;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

use mc_client::ApiClient;
use mc_store::{Config, MissionStore};

use crate::app::{Action, App};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args (simple, no clap dependency).
    let args: Vec<String> = std::env::args().collect();
    let api_base = args
        .iter()
        .position(|a| a == "--api")
        .and_then(|i| args.get(i + 1))
        .cloned();

    mc_telemetry::init_logging("mc-tui", "warn");

    let mut config = Config::load();
    if let Some(base) = api_base {
        config.server.base_url = base;
    }

    let api = Arc::new(ApiClient::new(&config.server.base_url));
    let store = MissionStore::new(api, config);

    // Set up panic hook to restore terminal on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run(&store).await;

    store.shutdown();
    restore_terminal()?;
    result
}

async fn run(store: &MissionStore) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventStream::new();

    // Initial load, with a full-screen retry prompt if the backend is down.
    while let Err(err) = store.initialize().await {
        warn!(%err, "initial load failed");
        if !retry_screen(&mut terminal, &err.to_string(), &mut events).await? {
            return Ok(());
        }
    }
    store.connect_websocket();
    store.start_agent_poll();

    let mut app = App::new();
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    loop {
        app.sync(store.snapshot(), store.ws_connected());
        if app.notice.is_none() {
            app.notice = app.state.error.clone();
        }

        terminal.draw(|frame| {
            ui::render(frame, &app);
        })?;

        tokio::select! {
            _ = tick.tick() => {}
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = app.on_key(key) {
                            dispatch(store, &mut app, action).await;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => warn!(%err, "terminal event error"),
                    None => break,
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Run one store mutation; failures land in the status bar instead of
/// bubbling out of the render loop.
async fn dispatch(store: &MissionStore, app: &mut App, action: Action) {
    app.notice = None;
    let outcome = match action {
        Action::SendChat(text) => store.add_chat_message(&text).await,
        Action::MoveTaskForward(id) => store.move_task_forward(&id).await,
        Action::SendTaskBack(id) => store.send_task_back(&id).await,
        Action::ApproveTask(id) => store.approve_task(&id).await,
        Action::RejectTask(id) => store.reject_task(&id, None).await,
        Action::ToggleRecurring(id) => store.toggle_recurring(&id).await,
        Action::TriggerRecurring(id) => store.trigger_recurring(&id).await,
        Action::RestartGateway => store.restart_gateway().await,
        Action::RunStuckCheck => store.run_stuck_check().await,
        Action::Refresh => {
            let tasks = store.refresh_tasks().await;
            let _ = store.refresh_agents().await;
            let _ = store.refresh_activity().await;
            let _ = store.refresh_recurring().await;
            let _ = store.refresh_chat().await;
            tasks
        }
    };
    if let Err(err) = outcome {
        app.notice = Some(err.to_string());
    }
}

/// Full-screen error view shown when the first load fails. Returns `true`
/// to retry, `false` to quit.
async fn retry_screen<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    error: &str,
    events: &mut EventStream,
) -> Result<bool> {
    use crossterm::event::KeyCode;
    use ratatui::layout::Alignment;
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Paragraph};

    loop {
        terminal.draw(|frame| {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Could not reach the backend",
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(error.to_string()),
                Line::from(""),
                Line::from(vec![
                    Span::styled("[r]", Style::default().fg(Color::Yellow)),
                    Span::raw(" retry    "),
                    Span::styled("[q]", Style::default().fg(Color::Yellow)),
                    Span::raw(" quit"),
                ]),
            ];
            let msg = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" mission-control "),
                );
            frame.render_widget(msg, frame.area());
        })?;

        match events.next().await {
            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('r') => return Ok(true),
                KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
                _ => {}
            },
            Some(Ok(_)) | Some(Err(_)) => {}
            None => return Ok(false),
        }
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}
