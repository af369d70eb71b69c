use mc_api_types::{
    ApiAgent, ApiChatMessage, ApiRecurringTask, ApiStats, ApiTask, GatewayStatus, OpenClawStatus,
    StuckTaskStatus,
};

use crate::feed::{ActivityFeed, NotificationLog};

/// One chat line as the UI sees it. `is_typing` marks the local placeholder
/// shown while an agent reply is in flight; it never comes from the backend.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub message: ApiChatMessage,
    pub is_typing: bool,
}

impl ChatEntry {
    pub fn from_api(message: ApiChatMessage) -> Self {
        Self { message, is_typing: false }
    }
}

/// Snapshot of everything the dashboard renders. Cloned out of the store on
/// every frame, so it stays plain data with no locks or handles inside.
#[derive(Debug, Clone, Default)]
pub struct MissionState {
    pub agents: Vec<ApiAgent>,
    pub tasks: Vec<ApiTask>,
    pub recurring: Vec<ApiRecurringTask>,
    pub chat: Vec<ChatEntry>,
    pub feed: ActivityFeed,
    pub notifications: NotificationLog,
    pub stats: ApiStats,
    pub openclaw: OpenClawStatus,
    pub gateway: GatewayStatus,
    pub stuck_tasks: StuckTaskStatus,
    pub loading: bool,
    pub error: Option<String>,
}

impl MissionState {
    pub fn task(&self, id: &str) -> Option<&ApiTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn agent(&self, id: &str) -> Option<&ApiAgent> {
        self.agents.iter().find(|a| a.id == id)
    }
}
