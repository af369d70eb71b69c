use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use mc_api_types::{ApiAgent, ApiTask, TaskStatus};
use mc_store::mentions;
use mc_store::MissionState;

/// Tab names displayed in the header.
pub const TAB_NAMES: &[&str] = &[
    "Dashboard",
    "Board",
    "Agents",
    "Chat",
    "Activity",
    "Recurring",
];

pub const TAB_DASHBOARD: usize = 0;
pub const TAB_BOARD: usize = 1;
pub const TAB_AGENTS: usize = 2;
pub const TAB_CHAT: usize = 3;
pub const TAB_ACTIVITY: usize = 4;
pub const TAB_RECURRING: usize = 5;

/// A store mutation requested by a keypress. The event loop owns the async
/// store handle, so key handling stays synchronous and only emits these.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SendChat(String),
    MoveTaskForward(String),
    SendTaskBack(String),
    ApproveTask(String),
    RejectTask(String),
    ToggleRecurring(String),
    TriggerRecurring(String),
    RestartGateway,
    RunStuckCheck,
    Refresh,
}

pub struct App {
    pub current_tab: usize,
    pub should_quit: bool,
    pub show_help: bool,

    /// Per-tab selected index for list navigation.
    pub selected_index: usize,
    /// Board column cursor.
    pub kanban_column: usize,

    /// Chat composer contents; only focused while the Chat tab is active.
    pub chat_input: String,
    /// Cursor into the mention dropdown, meaningful only while it is open.
    pub mention_index: usize,

    /// One-line outcome of the last action, shown in the status bar.
    pub notice: Option<String>,

    pub state: MissionState,
    pub ws_connected: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            current_tab: TAB_DASHBOARD,
            should_quit: false,
            show_help: false,
            selected_index: 0,
            kanban_column: 0,
            chat_input: String::new(),
            mention_index: 0,
            notice: None,
            state: MissionState::default(),
            ws_connected: false,
        }
    }

    /// Pull the latest store snapshot before each draw.
    pub fn sync(&mut self, state: MissionState, ws_connected: bool) {
        self.state = state;
        self.ws_connected = ws_connected;
        let max = self.current_list_len();
        if max == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= max {
            self.selected_index = max - 1;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.show_help {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                _ => {}
            }
            return None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.current_tab == TAB_CHAT {
            return self.on_chat_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }

            // Tab switching: 1-6
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                if idx < TAB_NAMES.len() {
                    self.select_tab(idx);
                }
                None
            }
            KeyCode::Tab => {
                self.select_tab((self.current_tab + 1) % TAB_NAMES.len());
                None
            }
            KeyCode::BackTab => {
                let prev = if self.current_tab == 0 {
                    TAB_NAMES.len() - 1
                } else {
                    self.current_tab - 1
                };
                self.select_tab(prev);
                None
            }

            KeyCode::Char('j') | KeyCode::Down => {
                let max = self.current_list_len();
                if max > 0 && self.selected_index < max - 1 {
                    self.selected_index += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                None
            }

            KeyCode::Char('h') | KeyCode::Left if self.current_tab == TAB_BOARD => {
                if self.kanban_column > 0 {
                    self.kanban_column -= 1;
                    self.selected_index = 0;
                }
                None
            }
            KeyCode::Char('l') | KeyCode::Right if self.current_tab == TAB_BOARD => {
                if self.kanban_column + 1 < TaskStatus::ORDER.len() {
                    self.kanban_column += 1;
                    self.selected_index = 0;
                }
                None
            }

            KeyCode::Char(']') | KeyCode::Enter if self.current_tab == TAB_BOARD => {
                self.selected_task_id().map(Action::MoveTaskForward)
            }
            KeyCode::Char('[') if self.current_tab == TAB_BOARD => {
                self.selected_task_id().map(Action::SendTaskBack)
            }
            KeyCode::Char('a') if self.current_tab == TAB_BOARD => {
                self.selected_task_id().map(Action::ApproveTask)
            }
            KeyCode::Char('x') if self.current_tab == TAB_BOARD => {
                self.selected_task_id().map(Action::RejectTask)
            }

            KeyCode::Char(' ') | KeyCode::Char('t') if self.current_tab == TAB_RECURRING => {
                self.selected_recurring_id().map(Action::ToggleRecurring)
            }
            KeyCode::Enter if self.current_tab == TAB_RECURRING => {
                self.selected_recurring_id().map(Action::TriggerRecurring)
            }

            KeyCode::Char('g') if self.current_tab == TAB_DASHBOARD => {
                Some(Action::RestartGateway)
            }
            KeyCode::Char('s') if self.current_tab == TAB_DASHBOARD => {
                Some(Action::RunStuckCheck)
            }

            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            KeyCode::Char('r') => Some(Action::Refresh),

            _ => None,
        }
    }

    /// Chat keys: every printable character goes to the composer, so tab
    /// switching from here is Tab/BackTab only.
    fn on_chat_key(&mut self, key: KeyEvent) -> Option<Action> {
        let dropdown_len = self.mention_suggestions().len();
        match key.code {
            KeyCode::Tab if dropdown_len > 0 => {
                self.accept_suggestion();
                None
            }
            KeyCode::Down if dropdown_len > 0 => {
                self.mention_index = mentions::wrap_index(dropdown_len, self.mention_index, 1);
                None
            }
            KeyCode::Up if dropdown_len > 0 => {
                self.mention_index = mentions::wrap_index(dropdown_len, self.mention_index, -1);
                None
            }
            KeyCode::Tab => {
                self.select_tab((self.current_tab + 1) % TAB_NAMES.len());
                None
            }
            KeyCode::BackTab => {
                self.select_tab(self.current_tab - 1);
                None
            }
            KeyCode::Esc => {
                self.chat_input.clear();
                self.mention_index = 0;
                None
            }
            KeyCode::Backspace => {
                self.chat_input.pop();
                self.mention_index = 0;
                None
            }
            KeyCode::Enter => {
                let text = self.chat_input.trim().to_string();
                self.chat_input.clear();
                self.mention_index = 0;
                if text.is_empty() {
                    None
                } else {
                    Some(Action::SendChat(text))
                }
            }
            KeyCode::Char(c) => {
                self.chat_input.push(c);
                self.mention_index = 0;
                None
            }
            _ => None,
        }
    }

    fn select_tab(&mut self, idx: usize) {
        self.current_tab = idx;
        self.selected_index = 0;
    }

    fn current_list_len(&self) -> usize {
        match self.current_tab {
            TAB_DASHBOARD => self.state.agents.len(),
            TAB_BOARD => self.tasks_in_selected_column().len(),
            TAB_AGENTS => self.state.agents.len(),
            TAB_ACTIVITY => self.state.feed.len(),
            TAB_RECURRING => self.state.recurring.len(),
            _ => 0,
        }
    }

    pub fn selected_column_status(&self) -> TaskStatus {
        TaskStatus::ORDER[self.kanban_column.min(TaskStatus::ORDER.len() - 1)]
    }

    pub fn tasks_in_selected_column(&self) -> Vec<&ApiTask> {
        let status = self.selected_column_status();
        self.state
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .collect()
    }

    pub fn selected_task_id(&self) -> Option<String> {
        self.tasks_in_selected_column()
            .get(self.selected_index)
            .map(|t| t.id.clone())
    }

    pub fn selected_recurring_id(&self) -> Option<String> {
        self.state
            .recurring
            .get(self.selected_index)
            .map(|r| r.id.clone())
    }

    // -----------------------------------------------------------------------
    // Mention dropdown
    // -----------------------------------------------------------------------

    /// Roster agents matching the @token under the cursor, or empty when no
    /// mention is being typed.
    pub fn mention_suggestions(&self) -> Vec<&ApiAgent> {
        match mentions::active_mention(&self.chat_input) {
            Some((_, partial)) => mentions::suggestions(partial, &self.state.agents),
            None => Vec::new(),
        }
    }

    /// Replace the partial mention with the highlighted suggestion's id.
    fn accept_suggestion(&mut self) {
        let Some((offset, _)) = mentions::active_mention(&self.chat_input) else {
            return;
        };
        let picked = {
            let dropdown = self.mention_suggestions();
            match dropdown.get(self.mention_index.min(dropdown.len().saturating_sub(1))) {
                Some(agent) => agent.id.clone(),
                None => return,
            }
        };
        self.chat_input.truncate(offset);
        self.chat_input.push('@');
        self.chat_input.push_str(&picked);
        self.chat_input.push(' ');
        self.mention_index = 0;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
