use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use mc_api_types::{
    ApiChatMessage, ApiComment, ApiTask, NewComment, NewRecurringTask, NewTask, RecurringPatch,
    ReviewRequest, ReviewVerdict, TaskPatch, TaskStatus, WsEvent,
};
use mc_client::{ws, MissionApi};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::feed::{FeedEntry, FeedKind};
use crate::mentions;
use crate::state::{ChatEntry, MissionState};

/// Shared handle to the dashboard's client-side state. Cheap to clone; every
/// clone sees the same state and background tasks.
#[derive(Clone)]
pub struct MissionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    api: Arc<dyn MissionApi>,
    config: Config,
    state: Mutex<MissionState>,
    ws_connected: Arc<AtomicBool>,
    ws_started: AtomicBool,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl MissionStore {
    pub fn new(api: Arc<dyn MissionApi>, config: Config) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                api,
                config,
                state: Mutex::new(MissionState::default()),
                ws_connected: Arc::new(AtomicBool::new(false)),
                ws_started: AtomicBool::new(false),
                handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The state mutex is only ever held for in-memory edits, never across an
    /// await, so poisoning cannot leave partial writes worth rejecting.
    fn state(&self) -> MutexGuard<'_, MissionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> MissionState {
        self.state().clone()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn ws_connected(&self) -> bool {
        self.inner.ws_connected.load(Ordering::SeqCst)
    }

    // -----------------------------------------------------------------------
    // Initial load and refreshes
    // -----------------------------------------------------------------------

    /// First full load. Agents, tasks, chat and activity are required; a
    /// failure on any of them fails the whole call. Recurring tasks and stats
    /// are best-effort so an older backend still produces a usable board.
    pub async fn initialize(&self) -> Result<()> {
        self.state().loading = true;

        let api = &self.inner.api;
        let loaded = tokio::try_join!(
            api.fetch_agents(),
            api.fetch_tasks(),
            api.fetch_chat(),
            api.fetch_activity(),
        );
        let (agents, tasks, chat, activity) = match loaded {
            Ok(parts) => parts,
            Err(err) => {
                let mut state = self.state();
                state.loading = false;
                state.error = Some(err.to_string());
                return Err(err.into());
            }
        };

        let recurring = match api.fetch_recurring().await {
            Ok(recurring) => recurring,
            Err(err) => {
                warn!(%err, "recurring tasks unavailable, starting without them");
                Vec::new()
            }
        };
        let stats = api.fetch_stats().await.unwrap_or_default();

        let mut state = self.state();
        state.agents = agents;
        state.tasks = tasks;
        state.chat = chat.into_iter().map(ChatEntry::from_api).collect();
        state.feed.replace_from_api(&activity);
        state.recurring = recurring;
        state.stats = stats;
        state.loading = false;
        state.error = None;
        Ok(())
    }

    /// Re-fetch the canonical task list. On failure the stale list is kept;
    /// callers that need the error get it back.
    pub async fn refresh_tasks(&self) -> Result<()> {
        match self.inner.api.fetch_tasks().await {
            Ok(tasks) => {
                self.state().tasks = tasks;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "task refresh failed, keeping stale list");
                Err(err.into())
            }
        }
    }

    pub async fn refresh_agents(&self) -> Result<()> {
        match self.inner.api.fetch_agents().await {
            Ok(agents) => {
                self.state().agents = agents;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "agent refresh failed, keeping stale roster");
                Err(err.into())
            }
        }
    }

    pub async fn refresh_activity(&self) -> Result<()> {
        let activity = self.inner.api.fetch_activity().await?;
        self.state().feed.replace_from_api(&activity);
        Ok(())
    }

    pub async fn refresh_recurring(&self) -> Result<()> {
        let recurring = self.inner.api.fetch_recurring().await?;
        self.state().recurring = recurring;
        Ok(())
    }

    /// Re-fetch chat, preserving local optimistic entries (typing
    /// placeholders and not-yet-confirmed sends) the backend cannot know.
    pub async fn refresh_chat(&self) -> Result<()> {
        let chat = self.inner.api.fetch_chat().await?;
        let mut state = self.state();
        let mut entries: Vec<ChatEntry> = chat.into_iter().map(ChatEntry::from_api).collect();
        let locals: Vec<ChatEntry> = state
            .chat
            .iter()
            .filter(|e| {
                (e.is_typing || e.message.id.starts_with("local-"))
                    && !entries.iter().any(|n| n.message.id == e.message.id)
            })
            .cloned()
            .collect();
        entries.extend(locals);
        state.chat = entries;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Create a task and refresh; the short follow-up refresh covers the case
    /// where the `task_created` event arrives before the list settles.
    pub async fn create_task(&self, task: NewTask) -> Result<ApiTask> {
        let created = self.inner.api.create_task(&task).await?;
        let _ = self.refresh_tasks().await;
        self.schedule_fallback_refresh();
        Ok(created)
    }

    /// Move a task to an adjacent board column, optimistically. Entering
    /// Review goes through the review endpoint and requires a reviewer; any
    /// backend rejection reverts by re-fetching the canonical list.
    pub async fn move_task(&self, task_id: &str, target: TaskStatus) -> Result<()> {
        let (from, reviewer) = {
            let state = self.state();
            let task = state
                .task(task_id)
                .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
            let reviewer = task
                .reviewer_id
                .clone()
                .or_else(|| task.reviewer.clone());
            (task.status, reviewer)
        };

        if !from.can_transition_to(target) {
            return Err(StoreError::InvalidTransition { from, to: target });
        }
        // Every entry into REVIEW needs a reviewer. The backward step from
        // DONE matters too: the backend clears the reviewer on approve, so a
        // task sent back would otherwise sit in review with nobody assigned.
        if target == TaskStatus::Review && reviewer.is_none() {
            return Err(StoreError::ReviewerRequired);
        }

        {
            let mut state = self.state();
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id == task_id) {
                task.status = target;
            }
        }

        let outcome = if target == TaskStatus::Review && from == TaskStatus::InProgress {
            self.inner
                .api
                .review_task(
                    task_id,
                    &ReviewRequest {
                        action: ReviewVerdict::SendToReview,
                        reviewer,
                        feedback: None,
                    },
                )
                .await
        } else {
            self.inner
                .api
                .update_task(task_id, &TaskPatch::status(target))
                .await
                .map(|_| ())
        };

        if let Err(err) = outcome {
            let _ = self.refresh_tasks().await;
            return Err(err.into());
        }
        Ok(())
    }

    pub async fn move_task_forward(&self, task_id: &str) -> Result<()> {
        let from = self.task_status(task_id)?;
        match from.next() {
            Some(target) => self.move_task(task_id, target).await,
            None => Ok(()),
        }
    }

    pub async fn send_task_back(&self, task_id: &str) -> Result<()> {
        let from = self.task_status(task_id)?;
        match from.prev() {
            Some(target) => self.move_task(task_id, target).await,
            None => Ok(()),
        }
    }

    fn task_status(&self, task_id: &str) -> Result<TaskStatus> {
        self.state()
            .task(task_id)
            .map(|t| t.status)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))
    }

    pub async fn send_to_review(&self, task_id: &str, reviewer: Option<String>) -> Result<()> {
        let current = {
            let state = self.state();
            let task = state
                .task(task_id)
                .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
            (
                task.status,
                reviewer
                    .or_else(|| task.reviewer_id.clone())
                    .or_else(|| task.reviewer.clone()),
            )
        };
        let (status, reviewer) = current;
        if !status.can_transition_to(TaskStatus::Review) || status != TaskStatus::InProgress {
            return Err(StoreError::InvalidTransition {
                from: status,
                to: TaskStatus::Review,
            });
        }
        let Some(reviewer) = reviewer else {
            return Err(StoreError::ReviewerRequired);
        };

        self.inner
            .api
            .review_task(
                task_id,
                &ReviewRequest {
                    action: ReviewVerdict::SendToReview,
                    reviewer: Some(reviewer),
                    feedback: None,
                },
            )
            .await?;
        let _ = self.refresh_tasks().await;
        self.schedule_fallback_refresh();
        Ok(())
    }

    pub async fn approve_task(&self, task_id: &str) -> Result<()> {
        self.verdict(task_id, ReviewVerdict::Approve, None).await
    }

    pub async fn reject_task(&self, task_id: &str, feedback: Option<String>) -> Result<()> {
        self.verdict(task_id, ReviewVerdict::Reject, feedback).await
    }

    async fn verdict(
        &self,
        task_id: &str,
        action: ReviewVerdict,
        feedback: Option<String>,
    ) -> Result<()> {
        let status = self.task_status(task_id)?;
        if status != TaskStatus::Review {
            return Err(StoreError::NotInReview);
        }
        self.inner
            .api
            .review_task(
                task_id,
                &ReviewRequest {
                    action,
                    reviewer: None,
                    feedback,
                },
            )
            .await?;
        let _ = self.refresh_tasks().await;
        self.schedule_fallback_refresh();
        Ok(())
    }

    /// Optimistic removal; the backend call follows, and failure restores the
    /// task via a canonical refresh.
    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        {
            let mut state = self.state();
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != task_id);
            if state.tasks.len() == before {
                return Err(StoreError::TaskNotFound(task_id.to_string()));
            }
        }
        if let Err(err) = self.inner.api.delete_task(task_id).await {
            let _ = self.refresh_tasks().await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Add a comment and record a mention notification for every roster agent
    /// named in it, except the author mentioning themselves.
    pub async fn add_comment(
        &self,
        task_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<ApiComment> {
        let comment = self
            .inner
            .api
            .add_comment(
                task_id,
                &NewComment {
                    agent_id: author_id.to_string(),
                    content: content.to_string(),
                },
            )
            .await?;

        {
            let mut state = self.state();
            let mentioned: Vec<String> = mentions::resolve_all(content, &state.agents)
                .into_iter()
                .filter(|agent| agent.id != author_id)
                .map(|agent| agent.id.clone())
                .collect();
            for to_agent in mentioned {
                state
                    .notifications
                    .push(author_id, &to_agent, Some(task_id.to_string()), content);
            }
            state.feed.push(FeedEntry {
                id: comment.id.clone(),
                kind: FeedKind::Comment,
                title: format!("{author_id} commented"),
                detail: content.to_string(),
                agent_id: Some(author_id.to_string()),
                task_id: Some(task_id.to_string()),
                timestamp: chrono::Utc::now(),
            });
        }

        let _ = self.refresh_tasks().await;
        self.schedule_fallback_refresh();
        Ok(comment)
    }

    // -----------------------------------------------------------------------
    // Recurring tasks
    // -----------------------------------------------------------------------

    pub async fn create_recurring(&self, task: NewRecurringTask) -> Result<()> {
        self.inner.api.create_recurring(&task).await?;
        let _ = self.refresh_recurring().await;
        self.schedule_fallback_refresh();
        Ok(())
    }

    /// Optimistic active/paused flip with canonical revert on failure.
    pub async fn toggle_recurring(&self, id: &str) -> Result<()> {
        let next_active = {
            let mut state = self.state();
            let task = state
                .recurring
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::RecurringNotFound(id.to_string()))?;
            task.is_active = !task.is_active;
            task.is_active
        };
        if let Err(err) = self
            .inner
            .api
            .update_recurring(id, &RecurringPatch::active(next_active))
            .await
        {
            let _ = self.refresh_recurring().await;
            return Err(err.into());
        }
        Ok(())
    }

    pub async fn delete_recurring(&self, id: &str) -> Result<()> {
        {
            let mut state = self.state();
            let before = state.recurring.len();
            state.recurring.retain(|r| r.id != id);
            if state.recurring.len() == before {
                return Err(StoreError::RecurringNotFound(id.to_string()));
            }
        }
        if let Err(err) = self.inner.api.delete_recurring(id).await {
            let _ = self.refresh_recurring().await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Run a recurring task now. The run materialises a fresh board task, so
    /// both collections get refreshed.
    pub async fn trigger_recurring(&self, id: &str) -> Result<()> {
        self.inner.api.trigger_recurring(id).await?;
        let _ = self.refresh_recurring().await;
        let _ = self.refresh_tasks().await;
        self.schedule_fallback_refresh();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Send a chat message. Exactly one resolvable @mention routes to that
    /// agent; zero or several fall back to the configured default. The user
    /// line and a typing placeholder appear immediately, then get re-keyed to
    /// the backend's ids once the (long-blocking) send call returns.
    pub async fn add_chat_message(&self, text: &str) -> Result<()> {
        let target = {
            let state = self.state();
            mentions::route_target(text, &state.agents, &self.inner.config.chat.default_agent)
        };

        let local_id = format!("local-{}", Uuid::new_v4());
        let typing_id = format!("typing-{}", Uuid::new_v4());
        {
            let mut state = self.state();
            state.chat.push(ChatEntry {
                message: ApiChatMessage {
                    id: local_id.clone(),
                    agent_id: "user".to_string(),
                    content: text.to_string(),
                    created_at: now_iso(),
                    agent: None,
                },
                is_typing: false,
            });
            state.chat.push(ChatEntry {
                message: ApiChatMessage {
                    id: typing_id.clone(),
                    agent_id: target.clone(),
                    content: String::new(),
                    created_at: now_iso(),
                    agent: None,
                },
                is_typing: true,
            });
        }

        match self.inner.api.send_to_agent(&target, text).await {
            Ok(resp) => {
                let mut state = self.state();
                state.chat.retain(|e| e.message.id != typing_id);
                if !resp.user_message_id.is_empty() {
                    // The backend broadcasts the user message before the send
                    // call returns, so its echo may already be in the list
                    // under the canonical id. In that case the optimistic
                    // entry is redundant and gets dropped, not renamed.
                    let echoed = state
                        .chat
                        .iter()
                        .any(|e| e.message.id == resp.user_message_id);
                    if echoed {
                        state.chat.retain(|e| e.message.id != local_id);
                    } else if let Some(entry) =
                        state.chat.iter_mut().find(|e| e.message.id == local_id)
                    {
                        entry.message.id = resp.user_message_id.clone();
                    }
                }
                let reply_known = resp.agent_message_id.is_empty()
                    || state
                        .chat
                        .iter()
                        .any(|e| e.message.id == resp.agent_message_id);
                if !resp.response.is_empty() && !reply_known {
                    state.chat.push(ChatEntry::from_api(ApiChatMessage {
                        id: resp.agent_message_id,
                        agent_id: target,
                        content: resp.response,
                        created_at: now_iso(),
                        agent: None,
                    }));
                }
                Ok(())
            }
            Err(err) => {
                self.state().chat.retain(|e| e.message.id != typing_id);
                let _ = self.refresh_chat().await;
                Err(err.into())
            }
        }
    }

    /// Append a chat message unless one with the same id is already present,
    /// returning whether the message was new. This is what makes the
    /// `chat_message` echo of our own send a no-op.
    pub fn upsert_chat(&self, message: ApiChatMessage) -> bool {
        let mut state = self.state();
        if state.chat.iter().any(|e| e.message.id == message.id) {
            return false;
        }
        state.chat.push(ChatEntry::from_api(message));
        true
    }

    // -----------------------------------------------------------------------
    // WebSocket events
    // -----------------------------------------------------------------------

    pub async fn apply_event(&self, event: WsEvent) {
        match event {
            WsEvent::ChatMessage(msg) => {
                let notify = msg.agent_id != "user" && mentions::mentions_user(&msg.content);
                let from = msg.agent_id.clone();
                let content = msg.content.clone();
                // Re-delivered events must not pile up unread notifications.
                if self.upsert_chat(msg) && notify {
                    self.state().notifications.push(&from, "human", None, &content);
                }
            }
            WsEvent::AgentStatus { id, status } => {
                let mut state = self.state();
                if let Some(agent) = state.agents.iter_mut().find(|a| a.id == id) {
                    agent.status = status;
                }
            }
            WsEvent::Announcement(ann) => {
                self.state().feed.push(FeedEntry::from_announcement(&ann));
            }
            WsEvent::Activity(activity) => {
                self.state().feed.push(FeedEntry::from_activity(&activity));
            }
            WsEvent::RecurringCreated { .. }
            | WsEvent::RecurringUpdated { .. }
            | WsEvent::RecurringDeleted { .. } => {
                let _ = self.refresh_recurring().await;
            }
            WsEvent::RecurringRun { .. } => {
                let _ = self.refresh_recurring().await;
                let _ = self.refresh_tasks().await;
            }
            // Task-shaped events all collapse to one canonical re-fetch; the
            // payloads carry too little to patch the board in place.
            WsEvent::TaskCreated { .. }
            | WsEvent::TaskUpdated { .. }
            | WsEvent::TaskReviewed { .. }
            | WsEvent::TaskDeleted { .. }
            | WsEvent::CommentAdded { .. }
            | WsEvent::DeliverableComplete { .. }
            | WsEvent::TaskActivityAdded { .. } => {
                let _ = self.refresh_tasks().await;
            }
        }
    }

    /// Start the `/ws` listener and its dispatch loop. Safe to call more than
    /// once; only the first call spawns anything.
    pub fn connect_websocket(&self) {
        if self.inner.ws_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let url = self.inner.config.ws_url();
        let opts = ws::WsOptions {
            reconnect_delay: self.inner.config.ws_reconnect_delay(),
        };
        let (tx, rx) = flume::unbounded::<WsEvent>();

        let listener = tokio::spawn(ws::run_listener(
            url,
            opts,
            tx,
            Arc::clone(&self.inner.ws_connected),
        ));

        let store = self.clone();
        let dispatch = tokio::spawn(async move {
            while let Ok(event) = rx.recv_async().await {
                debug!(?event, "applying websocket event");
                store.apply_event(event).await;
            }
        });

        self.track(listener);
        self.track(dispatch);
    }

    /// Periodic roster + monitoring poll. Everything here is best-effort;
    /// individual failures only leave the previous reading in place.
    pub fn start_agent_poll(&self) {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.inner.config.poll_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let _ = store.refresh_agents().await;
                store.refresh_monitoring().await;
            }
        });
        self.track(handle);
    }

    pub async fn refresh_monitoring(&self) {
        if let Ok(stats) = self.inner.api.fetch_stats().await {
            self.state().stats = stats;
        }
        if let Ok(gateway) = self.inner.api.gateway_status().await {
            self.state().gateway = gateway;
        }
        if let Ok(stuck) = self.inner.api.stuck_tasks_status().await {
            self.state().stuck_tasks = stuck;
        }
        let _ = self.refresh_openclaw_status().await;
    }

    pub async fn refresh_openclaw_status(&self) -> Result<()> {
        let openclaw = self.inner.api.openclaw_status().await?;
        self.state().openclaw = openclaw;
        Ok(())
    }

    pub async fn restart_gateway(&self) -> Result<()> {
        let gateway = self.inner.api.gateway_restart().await?;
        self.state().gateway = gateway;
        Ok(())
    }

    pub async fn run_stuck_check(&self) -> Result<()> {
        let stuck = self.inner.api.stuck_tasks_check().await?;
        self.state().stuck_tasks = stuck;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Background task plumbing
    // -----------------------------------------------------------------------

    /// One delayed task refresh, guarding against a missed confirming event
    /// after a mutation.
    fn schedule_fallback_refresh(&self) {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(store.inner.config.fallback_refresh_delay()).await;
            let _ = store.refresh_tasks().await;
        });
        self.track(handle);
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self
            .inner
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Abort every background task. The store remains usable for direct
    /// calls afterwards; only the passive refreshes stop.
    pub fn shutdown(&self) {
        let mut handles = self
            .inner
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for handle in handles.drain(..) {
            handle.abort();
        }
    }
}

fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
