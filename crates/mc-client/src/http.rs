use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use mc_api_types::{
    AgentPatch, ApiActivity, ApiAgent, ApiAnnouncement, ApiChatMessage, ApiComment,
    ApiRecurringRun, ApiRecurringTask, ApiStats, ApiTask, GatewayStatus, NewAgent,
    NewAnnouncement, NewComment, NewRecurringTask, NewTask, OpenClawAgent, OpenClawStatus,
    RecurringPatch, ReviewRequest, SendToAgentRequest, SendToAgentResponse, StuckTaskStatus,
    TaskPatch,
};

use crate::api::MissionApi;
use crate::error::{ClientError, Result};

/// Error body shape the backend uses for every rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Reusable async client + base URL. No retries; callers decide what a
/// failure means (the store reverts or re-fetches, the reconnect loop sleeps).
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let detail = match resp.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::decode(resp).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.client.post(self.url(path)).send().await?;
        Self::decode(resp).await
    }

    async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.client.patch(self.url(path)).json(body).send().await?;
        Self::decode(resp).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let resp = self.client.delete(self.url(path)).send().await?;
        Self::decode::<serde_json::Value>(resp).await.map(|_| ())
    }
}

#[async_trait]
impl MissionApi for ApiClient {
    async fn fetch_agents(&self) -> Result<Vec<ApiAgent>> {
        self.get("/api/agents").await
    }

    async fn create_agent(&self, agent: &NewAgent) -> Result<ApiAgent> {
        self.post("/api/agents", agent).await
    }

    async fn update_agent(&self, id: &str, patch: &AgentPatch) -> Result<ApiAgent> {
        self.patch(&format!("/api/agents/{id}"), patch).await
    }

    async fn delete_agent(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/agents/{id}")).await
    }

    async fn fetch_tasks(&self) -> Result<Vec<ApiTask>> {
        self.get("/api/tasks").await
    }

    async fn create_task(&self, task: &NewTask) -> Result<ApiTask> {
        self.post("/api/tasks", task).await
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<ApiTask> {
        self.patch(&format!("/api/tasks/{id}"), patch).await
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/tasks/{id}")).await
    }

    async fn review_task(&self, id: &str, review: &ReviewRequest) -> Result<()> {
        self.post::<_, serde_json::Value>(&format!("/api/tasks/{id}/review"), review)
            .await
            .map(|_| ())
    }

    async fn add_comment(&self, task_id: &str, comment: &NewComment) -> Result<ApiComment> {
        self.post(&format!("/api/tasks/{task_id}/comments"), comment)
            .await
    }

    async fn complete_deliverable(&self, deliverable_id: &str) -> Result<()> {
        self.patch::<_, serde_json::Value>(
            &format!("/api/deliverables/{deliverable_id}/complete"),
            &serde_json::json!({}),
        )
        .await
        .map(|_| ())
    }

    async fn fetch_task_activity(&self, task_id: &str) -> Result<Vec<ApiActivity>> {
        self.get(&format!("/api/tasks/{task_id}/activity")).await
    }

    async fn fetch_recurring(&self) -> Result<Vec<ApiRecurringTask>> {
        self.get("/api/recurring").await
    }

    async fn create_recurring(&self, task: &NewRecurringTask) -> Result<ApiRecurringTask> {
        self.post("/api/recurring", task).await
    }

    async fn update_recurring(
        &self,
        id: &str,
        patch: &RecurringPatch,
    ) -> Result<ApiRecurringTask> {
        self.patch(&format!("/api/recurring/{id}"), patch).await
    }

    async fn delete_recurring(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/recurring/{id}")).await
    }

    async fn fetch_recurring_runs(&self, id: &str) -> Result<Vec<ApiRecurringRun>> {
        self.get(&format!("/api/recurring/{id}/runs")).await
    }

    async fn trigger_recurring(&self, id: &str) -> Result<()> {
        self.post_empty::<serde_json::Value>(&format!("/api/recurring/{id}/trigger"))
            .await
            .map(|_| ())
    }

    async fn fetch_chat(&self) -> Result<Vec<ApiChatMessage>> {
        self.get("/api/chat").await
    }

    async fn send_to_agent(&self, agent_id: &str, message: &str) -> Result<SendToAgentResponse> {
        let body = SendToAgentRequest {
            agent_id: agent_id.to_string(),
            message: message.to_string(),
        };
        // The backend blocks on the orchestrator for up to two minutes here,
        // so this call gets a per-request timeout above the client default.
        let resp = self
            .client
            .post(self.url("/api/chat/send-to-agent"))
            .timeout(std::time::Duration::from_secs(150))
            .json(&body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn fetch_announcements(&self) -> Result<Vec<ApiAnnouncement>> {
        self.get("/api/announcements").await
    }

    async fn create_announcement(&self, ann: &NewAnnouncement) -> Result<ApiAnnouncement> {
        self.post("/api/announcements", ann).await
    }

    async fn fetch_activity(&self) -> Result<Vec<ApiActivity>> {
        self.get("/api/activity").await
    }

    async fn fetch_stats(&self) -> Result<ApiStats> {
        self.get("/api/stats").await
    }

    async fn fetch_models(&self) -> Result<serde_json::Value> {
        self.get("/api/models").await
    }

    async fn openclaw_status(&self) -> Result<OpenClawStatus> {
        self.get("/api/openclaw/status").await
    }

    async fn openclaw_agents(&self) -> Result<Vec<OpenClawAgent>> {
        self.get("/api/openclaw/agents").await
    }

    async fn openclaw_import(&self) -> Result<serde_json::Value> {
        self.post_empty("/api/openclaw/import").await
    }

    async fn gateway_status(&self) -> Result<GatewayStatus> {
        self.get("/api/monitoring/gateway/status").await
    }

    async fn gateway_health_check(&self) -> Result<GatewayStatus> {
        self.post_empty("/api/monitoring/gateway/health-check").await
    }

    async fn gateway_restart(&self) -> Result<GatewayStatus> {
        self.post_empty("/api/monitoring/gateway/restart").await
    }

    async fn stuck_tasks_status(&self) -> Result<StuckTaskStatus> {
        self.get("/api/monitoring/stuck-tasks/status").await
    }

    async fn stuck_tasks_check(&self) -> Result<StuckTaskStatus> {
        self.post_empty("/api/monitoring/stuck-tasks/check").await
    }
}
