//! Shared API types for the mission-control client.
//!
//! Client-side projections of the backend's JSON records, plus the request
//! bodies the client sends and the WebSocket event vocabulary. Timestamps are
//! kept as the backend's ISO-8601 strings; nothing in the client does date
//! arithmetic on them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Inbox,
    Assigned,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// The board columns in order. Tasks only ever move one step along this
    /// sequence, in either direction.
    pub const ORDER: [TaskStatus; 5] = [
        TaskStatus::Inbox,
        TaskStatus::Assigned,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<TaskStatus> {
        Self::ORDER.get(self.position() + 1).copied()
    }

    pub fn prev(self) -> Option<TaskStatus> {
        self.position().checked_sub(1).map(|i| Self::ORDER[i])
    }

    /// Returns `true` when a transition from `self` to `target` is valid:
    /// exactly one step forward or backward along [`TaskStatus::ORDER`].
    pub fn can_transition_to(self, target: TaskStatus) -> bool {
        self.next() == Some(target) || self.prev() == Some(target)
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Inbox => "Inbox",
            TaskStatus::Assigned => "Assigned",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Done => "Done",
        }
    }
}

// ---------------------------------------------------------------------------
// Priority / agent enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentRole {
    Lead,
    Int,
    #[default]
    Spc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Working,
    #[default]
    Idle,
    Standby,
    Offline,
    Error,
}

impl AgentStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            AgentStatus::Working => "@",
            AgentStatus::Idle => "*",
            AgentStatus::Standby => "-",
            AgentStatus::Offline => "x",
            AgentStatus::Error => "!",
        }
    }
}

// ---------------------------------------------------------------------------
// Core records (matching backend JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiAgent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: AgentRole,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub primary_model: Option<String>,
    #[serde(default)]
    pub fallback_model: Option<String>,
    #[serde(default)]
    pub current_model: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiComment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub agent: Option<ApiAgent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDeliverable {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    /// Legacy free-text reviewer handle ("human" or an agent name).
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub reviewer_id: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub comments: Vec<ApiComment>,
    #[serde(default)]
    pub deliverables: Vec<ApiDeliverable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRecurringTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub schedule_type: String,
    #[serde(default)]
    pub schedule_value: Option<String>,
    #[serde(default)]
    pub schedule_time: Option<String>,
    /// Human-readable rendering of the schedule, produced by the backend.
    #[serde(default)]
    pub schedule_human: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_run_at: Option<String>,
    #[serde(default)]
    pub next_run_at: Option<String>,
    #[serde(default)]
    pub run_count: u64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRecurringRun {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub recurring_task_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub run_at: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub agent: Option<ApiAgent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiAnnouncement {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiActivity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiStats {
    #[serde(default)]
    pub agents_active: u64,
    #[serde(default)]
    pub tasks_in_queue: u64,
    #[serde(default)]
    pub tasks_by_status: std::collections::HashMap<String, u64>,
}

// ---------------------------------------------------------------------------
// OpenClaw proxy + monitoring payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenClawStatus {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub config_path: String,
}

/// Agent as reported by the OpenClaw orchestrator (live status derived from
/// session activity, model descriptor as a loose object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenClawAgent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: AgentRole,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub model: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StuckTaskStatus {
    #[serde(default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub total_notifications_sent: u64,
    #[serde(default)]
    pub currently_tracked_tasks: u64,
    #[serde(default)]
    pub thresholds: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
}

/// Partial update for a task. `None` fields are omitted from the JSON body so
/// the backend leaves them untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    SendToReview,
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub action: ReviewVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub agent_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecurringTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    pub schedule_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<String>,
}

impl RecurringPatch {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    #[serde(default)]
    pub role: AgentRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AgentRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendToAgentRequest {
    pub agent_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendToAgentResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub user_message_id: String,
    #[serde(default)]
    pub agent_message_id: String,
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAnnouncement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// WebSocket events
// ---------------------------------------------------------------------------

/// Inbound `/ws` messages. The socket is receive-only from the client's side;
/// every frame is a JSON object `{type, data}` with `type` drawn from this
/// fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum WsEvent {
    TaskCreated {
        id: String,
        #[serde(default)]
        title: String,
    },
    TaskUpdated {
        id: String,
    },
    TaskReviewed {
        id: String,
        action: ReviewVerdict,
    },
    TaskDeleted {
        id: String,
    },
    ChatMessage(ApiChatMessage),
    Announcement(ApiAnnouncement),
    CommentAdded {
        task_id: String,
        comment_id: String,
    },
    Activity(ApiActivity),
    AgentStatus {
        id: String,
        status: AgentStatus,
    },
    RecurringCreated {
        id: String,
    },
    RecurringUpdated {
        id: String,
    },
    RecurringDeleted {
        id: String,
    },
    RecurringRun {
        id: String,
        #[serde(default)]
        task_id: Option<String>,
    },
    DeliverableComplete {
        id: String,
        task_id: String,
    },
    TaskActivityAdded {
        task_id: String,
        #[serde(default)]
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_steps() {
        assert_eq!(TaskStatus::Inbox.next(), Some(TaskStatus::Assigned));
        assert_eq!(TaskStatus::Done.next(), None);
        assert_eq!(TaskStatus::Inbox.prev(), None);
        assert_eq!(TaskStatus::Review.prev(), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_status_transitions_are_single_steps() {
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Review));
        assert!(TaskStatus::Review.can_transition_to(TaskStatus::Done));
        assert!(TaskStatus::Review.can_transition_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Inbox.can_transition_to(TaskStatus::Done));
        assert!(!TaskStatus::Done.can_transition_to(TaskStatus::Inbox));
        assert!(!TaskStatus::Inbox.can_transition_to(TaskStatus::Inbox));
    }

    #[test]
    fn test_status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let s: TaskStatus = serde_json::from_str("\"REVIEW\"").unwrap();
        assert_eq!(s, TaskStatus::Review);
    }

    #[test]
    fn test_ws_event_decodes_tagged_frames() {
        let frame = r#"{"type":"agent_status","data":{"id":"dev","status":"WORKING"}}"#;
        let ev: WsEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(
            ev,
            WsEvent::AgentStatus {
                id: "dev".into(),
                status: AgentStatus::Working
            }
        );

        let frame = r#"{"type":"task_reviewed","data":{"id":"t1","action":"approve"}}"#;
        let ev: WsEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(
            ev,
            WsEvent::TaskReviewed {
                id: "t1".into(),
                action: ReviewVerdict::Approve
            }
        );
    }

    #[test]
    fn test_ws_chat_message_payload() {
        let frame = r#"{"type":"chat_message","data":{"id":"m1","content":"hi","agent_id":"user","agent":{"id":"user","name":"User","avatar":"x"},"created_at":"2024-01-01T00:00:00"}}"#;
        let ev: WsEvent = serde_json::from_str(frame).unwrap();
        match ev {
            WsEvent::ChatMessage(msg) => {
                assert_eq!(msg.id, "m1");
                assert_eq!(msg.agent.unwrap().name, "User");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_task_patch_omits_unset_fields() {
        let body = serde_json::to_value(TaskPatch::status(TaskStatus::Done)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "DONE"}));
    }

    #[test]
    fn test_unknown_ws_type_is_an_error() {
        let frame = r#"{"type":"totally_new","data":{}}"#;
        assert!(serde_json::from_str::<WsEvent>(frame).is_err());
    }
}
