use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

// We reference types from the binary crate by including modules directly.
#[path = "../src/app.rs"]
mod app;
#[path = "../src/tabs/mod.rs"]
mod tabs;
#[path = "../src/ui.rs"]
mod ui;
#[path = "../src/widgets/mod.rs"]
mod widgets;

use app::{Action, App, TAB_BOARD, TAB_CHAT, TAB_NAMES, TAB_RECURRING};
use mc_api_types::{ApiAgent, ApiRecurringTask, ApiTask, TaskStatus};
use mc_store::MissionState;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn agent(id: &str, name: &str) -> ApiAgent {
    ApiAgent {
        id: id.to_string(),
        name: name.to_string(),
        ..ApiAgent::default()
    }
}

fn task(id: &str, status: TaskStatus) -> ApiTask {
    ApiTask {
        id: id.to_string(),
        title: format!("task {id}"),
        status,
        ..ApiTask::default()
    }
}

fn board_state() -> MissionState {
    let mut state = MissionState::default();
    state.agents = vec![agent("dev-1", "Dev One"), agent("ops-1", "Ops One")];
    state.tasks = vec![
        task("t1", TaskStatus::Inbox),
        task("t2", TaskStatus::Inbox),
        task("t3", TaskStatus::InProgress),
    ];
    state.recurring = vec![ApiRecurringTask {
        id: "r1".to_string(),
        title: "daily digest".to_string(),
        is_active: true,
        ..ApiRecurringTask::default()
    }];
    state
}

#[test]
fn test_app_new_starts_on_dashboard() {
    let app = App::new();
    assert_eq!(app.current_tab, 0);
    assert!(!app.should_quit);
    assert!(!app.show_help);
    assert!(app.chat_input.is_empty());
}

#[test]
fn test_tab_navigation_by_number() {
    let mut app = App::new();
    for i in 1..=TAB_NAMES.len() as u8 {
        let c = (b'0' + i) as char;
        app.on_key(key(KeyCode::Char(c)));
        assert_eq!(app.current_tab, (i - 1) as usize);
        // Numbers above the last tab are ignored, not wrapped.
        app.on_key(key(KeyCode::Char('9')));
        assert_eq!(app.current_tab, (i - 1) as usize);
    }
}

#[test]
fn test_tab_next_prev_wraps() {
    let mut app = App::new();
    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.current_tab, 1);
    app.on_key(key(KeyCode::BackTab));
    assert_eq!(app.current_tab, 0);
    app.on_key(key(KeyCode::BackTab));
    assert_eq!(app.current_tab, TAB_NAMES.len() - 1);
    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.current_tab, 0);
}

#[test]
fn test_board_column_cursor_stays_in_bounds() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('2')));
    assert_eq!(app.current_tab, TAB_BOARD);

    app.on_key(key(KeyCode::Char('h')));
    assert_eq!(app.kanban_column, 0);
    for _ in 0..10 {
        app.on_key(key(KeyCode::Char('l')));
    }
    assert_eq!(app.kanban_column, TaskStatus::ORDER.len() - 1);
}

#[test]
fn test_board_selection_follows_column() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('2')));

    // Inbox column holds t1 and t2.
    assert_eq!(app.selected_task_id().as_deref(), Some("t1"));
    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.selected_task_id().as_deref(), Some("t2"));
    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.selected_task_id().as_deref(), Some("t2"));

    // Two columns right: In Progress holds t3 only.
    app.on_key(key(KeyCode::Char('l')));
    app.on_key(key(KeyCode::Char('l')));
    assert_eq!(app.selected_task_id().as_deref(), Some("t3"));
}

#[test]
fn test_board_keys_emit_task_actions() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('2')));

    assert_eq!(
        app.on_key(key(KeyCode::Char(']'))),
        Some(Action::MoveTaskForward("t1".to_string()))
    );
    assert_eq!(
        app.on_key(key(KeyCode::Char('['))),
        Some(Action::SendTaskBack("t1".to_string()))
    );
}

#[test]
fn test_chat_tab_captures_printable_keys() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('4')));
    assert_eq!(app.current_tab, TAB_CHAT);

    // 'q' must type, not quit, while composing.
    for c in "quick".chars() {
        app.on_key(key(KeyCode::Char(c)));
    }
    assert!(!app.should_quit);
    assert_eq!(app.chat_input, "quick");

    app.on_key(key(KeyCode::Backspace));
    assert_eq!(app.chat_input, "quic");
}

#[test]
fn test_chat_enter_sends_trimmed_message() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('4')));

    for c in "  hello  ".chars() {
        app.on_key(key(KeyCode::Char(c)));
    }
    let action = app.on_key(key(KeyCode::Enter));
    assert_eq!(action, Some(Action::SendChat("hello".to_string())));
    assert!(app.chat_input.is_empty());

    // Empty input sends nothing.
    assert_eq!(app.on_key(key(KeyCode::Enter)), None);
}

#[test]
fn test_mention_dropdown_opens_and_completes() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('4')));

    for c in "ping @de".chars() {
        app.on_key(key(KeyCode::Char(c)));
    }
    let suggestions = app.mention_suggestions();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].id, "dev-1");

    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.chat_input, "ping @dev-1 ");
    assert!(app.mention_suggestions().is_empty());
}

#[test]
fn test_mention_dropdown_cursor_wraps() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('4')));

    // "@o" matches both agents: ops-1 by prefix, Dev One by name.
    for c in "@o".chars() {
        app.on_key(key(KeyCode::Char(c)));
    }
    let count = app.mention_suggestions().len();
    assert!(count >= 2);

    app.on_key(key(KeyCode::Down));
    assert_eq!(app.mention_index, 1);
    app.on_key(key(KeyCode::Up));
    app.on_key(key(KeyCode::Up));
    assert_eq!(app.mention_index, count - 1);
}

#[test]
fn test_recurring_keys_emit_actions() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('6')));
    assert_eq!(app.current_tab, TAB_RECURRING);

    assert_eq!(
        app.on_key(key(KeyCode::Char(' '))),
        Some(Action::ToggleRecurring("r1".to_string()))
    );
    assert_eq!(
        app.on_key(key(KeyCode::Enter)),
        Some(Action::TriggerRecurring("r1".to_string()))
    );
}

#[test]
fn test_help_modal_swallows_keys() {
    let mut app = App::new();
    app.on_key(key(KeyCode::Char('?')));
    assert!(app.show_help);

    app.on_key(key(KeyCode::Char('2')));
    assert_eq!(app.current_tab, 0);
    assert!(app.show_help);

    app.on_key(key(KeyCode::Esc));
    assert!(!app.show_help);
}

#[test]
fn test_quit_keys() {
    let mut app = App::new();
    app.on_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);

    let mut app = App::new();
    app.on_key(KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    });
    assert!(app.should_quit);
}

#[test]
fn test_sync_clamps_selection_after_shrink() {
    let mut app = App::new();
    app.sync(board_state(), true);
    app.on_key(key(KeyCode::Char('2')));
    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.selected_index, 1);

    let mut smaller = board_state();
    smaller.tasks.retain(|t| t.id != "t2");
    app.sync(smaller, true);
    assert_eq!(app.selected_index, 0);
}
