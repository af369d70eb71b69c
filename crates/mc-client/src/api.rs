use async_trait::async_trait;

use mc_api_types::{
    AgentPatch, ApiActivity, ApiAgent, ApiAnnouncement, ApiChatMessage, ApiComment,
    ApiRecurringRun, ApiRecurringTask, ApiStats, ApiTask, GatewayStatus, NewAgent,
    NewAnnouncement, NewComment, NewRecurringTask, NewTask, OpenClawAgent, OpenClawStatus,
    RecurringPatch, ReviewRequest, SendToAgentResponse, StuckTaskStatus, TaskPatch,
};

use crate::error::Result;

/// The backend's REST surface, one method per endpoint the dashboard uses.
///
/// The store holds a `dyn MissionApi` so its tests can drive it with an
/// in-memory implementation instead of a live server.
#[async_trait]
pub trait MissionApi: Send + Sync {
    // ── agents ──
    async fn fetch_agents(&self) -> Result<Vec<ApiAgent>>;
    async fn create_agent(&self, agent: &NewAgent) -> Result<ApiAgent>;
    async fn update_agent(&self, id: &str, patch: &AgentPatch) -> Result<ApiAgent>;
    async fn delete_agent(&self, id: &str) -> Result<()>;

    // ── tasks ──
    async fn fetch_tasks(&self) -> Result<Vec<ApiTask>>;
    async fn create_task(&self, task: &NewTask) -> Result<ApiTask>;
    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<ApiTask>;
    async fn delete_task(&self, id: &str) -> Result<()>;
    async fn review_task(&self, id: &str, review: &ReviewRequest) -> Result<()>;
    async fn add_comment(&self, task_id: &str, comment: &NewComment) -> Result<ApiComment>;
    async fn complete_deliverable(&self, deliverable_id: &str) -> Result<()>;
    async fn fetch_task_activity(&self, task_id: &str) -> Result<Vec<ApiActivity>>;

    // ── recurring tasks ──
    async fn fetch_recurring(&self) -> Result<Vec<ApiRecurringTask>>;
    async fn create_recurring(&self, task: &NewRecurringTask) -> Result<ApiRecurringTask>;
    async fn update_recurring(&self, id: &str, patch: &RecurringPatch)
        -> Result<ApiRecurringTask>;
    async fn delete_recurring(&self, id: &str) -> Result<()>;
    async fn fetch_recurring_runs(&self, id: &str) -> Result<Vec<ApiRecurringRun>>;
    async fn trigger_recurring(&self, id: &str) -> Result<()>;

    // ── chat / announcements ──
    async fn fetch_chat(&self) -> Result<Vec<ApiChatMessage>>;
    async fn send_to_agent(&self, agent_id: &str, message: &str) -> Result<SendToAgentResponse>;
    async fn fetch_announcements(&self) -> Result<Vec<ApiAnnouncement>>;
    async fn create_announcement(&self, ann: &NewAnnouncement) -> Result<ApiAnnouncement>;

    // ── activity / stats / models ──
    async fn fetch_activity(&self) -> Result<Vec<ApiActivity>>;
    async fn fetch_stats(&self) -> Result<ApiStats>;
    async fn fetch_models(&self) -> Result<serde_json::Value>;

    // ── openclaw proxy ──
    async fn openclaw_status(&self) -> Result<OpenClawStatus>;
    async fn openclaw_agents(&self) -> Result<Vec<OpenClawAgent>>;
    async fn openclaw_import(&self) -> Result<serde_json::Value>;

    // ── monitoring ──
    async fn gateway_status(&self) -> Result<GatewayStatus>;
    async fn gateway_health_check(&self) -> Result<GatewayStatus>;
    async fn gateway_restart(&self) -> Result<GatewayStatus>;
    async fn stuck_tasks_status(&self) -> Result<StuckTaskStatus>;
    async fn stuck_tasks_check(&self) -> Result<StuckTaskStatus>;
}
