use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the priority of a task.
/// Stored as lowercase text in the `tasks.priority` column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
/// Stored as snake_case text in the `tasks.status` column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

/// Request body for creating a task.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewTask {
    pub description: String,
    /// Defaults to `medium` when omitted.
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request body for a partial update.
///
/// A field that is absent from the JSON is left untouched. For `due_date` an explicit
/// `null` is a change of its own: it clears the due date.
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_has_changes"))]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}

fn validate_has_changes(update: &TaskUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        let mut error = ValidationError::new("empty_update");
        error.message = Some("empty update: no fields to change".into());
        return Err(error);
    }
    Ok(())
}

// Marks a present key as `Some`, so `"due_date": null` becomes `Some(None)`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

/// Represents a task as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// The user who created the task; the only user who can ever see it.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted by `GET /tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl Task {
    /// Creates a pending task owned by `owner_id`, timestamped `now`.
    pub fn new(input: NewTask, owner_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: input.description,
            priority: input.priority,
            status: TaskStatus::Pending,
            due_date: input.due_date,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Task counts per status. Every status is always present, defaulting to zero.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl StatusCounts {
    /// Records the count for a stored status value; unknown values are ignored.
    pub fn record(&mut self, status: &str, count: i64) {
        match status {
            "pending" => self.pending = count,
            "in_progress" => self.in_progress = count,
            "completed" => self.completed = count,
            _ => {}
        }
    }
}

/// Task counts per priority. Every priority is always present, defaulting to zero.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

impl PriorityCounts {
    pub fn record(&mut self, priority: &str, count: i64) {
        match priority {
            "high" => self.high = count,
            "medium" => self.medium = count,
            "low" => self.low = count,
            _ => {}
        }
    }
}

/// The projection of a task listed in the overview's upcoming window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UpcomingTask {
    pub id: Uuid,
    pub description: String,
    pub due_date: DateTime<Utc>,
}

/// Response body of `GET /tasks/overview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOverview {
    pub status_counts: StatusCounts,
    pub priority_counts: PriorityCounts,
    pub upcoming_tasks: Vec<UpcomingTask>,
}
