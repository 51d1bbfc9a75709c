use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskOverview, TaskQuery, TaskUpdate, User};
use crate::store::overview;

const TASK_COLUMNS: &str =
    "id, description, priority, status, due_date, owner_id, created_at, updated_at";

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Task persistence bound to a single owner.
///
/// Every statement this type issues carries `owner_id = ?` for the owner it was built
/// with. A task belonging to someone else is indistinguishable from one that does not
/// exist.
#[derive(Debug, Clone, Copy)]
pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
    owner_id: Uuid,
}

impl<'a> TaskRepository<'a> {
    pub fn for_owner(pool: &'a SqlitePool, owner: &User) -> Self {
        Self {
            pool,
            owner_id: owner.id,
        }
    }

    /// Lists the owner's tasks, newest first, narrowed by the filters that are set.
    pub async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        builder
            .push(TASK_COLUMNS)
            .push(" FROM tasks WHERE owner_id = ")
            .push_bind(self.owner_id);

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = query.priority {
            builder.push(" AND priority = ").push_bind(priority);
        }
        builder.push(" ORDER BY created_at DESC, rowid DESC");

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn create(&self, input: NewTask) -> Result<Task, AppError> {
        let task = Task::new(input, self.owner_id, Utc::now());

        sqlx::query(&format!(
            "INSERT INTO tasks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.owner_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(self.pool)
        .await?;

        log::debug!("task {} created for user {}", task.id, self.owner_id);
        Ok(task)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = ? AND owner_id = ?",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(self.owner_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(task_not_found)
    }

    /// Applies a partial update and returns the full record.
    ///
    /// The ownership check, the merge and the write are one `UPDATE ... RETURNING`
    /// statement, so SQLite takes the write lock up front and concurrent writers wait on
    /// the busy timeout instead of failing a lock upgrade. Absent fields keep their
    /// stored value; `due_date` is only written when the key was present.
    pub async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Task, AppError> {
        update.validate()?;

        let TaskUpdate {
            description,
            priority,
            status,
            due_date,
        } = update;

        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET description = COALESCE(?, description),
                 priority = COALESCE(?, priority),
                 status = COALESCE(?, status),
                 due_date = CASE WHEN ? THEN ? ELSE due_date END,
                 updated_at = ?
             WHERE id = ? AND owner_id = ?
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(description)
        .bind(priority)
        .bind(status)
        .bind(due_date.is_some())
        .bind(due_date.flatten())
        .bind(Utc::now())
        .bind(id)
        .bind(self.owner_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(task_not_found)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(self.owner_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }

        Ok(())
    }

    /// Status and priority histograms plus tasks due within the next three days.
    pub async fn overview(&self) -> Result<TaskOverview, AppError> {
        overview::compute(self.pool, self.owner_id, Utc::now()).await
    }
}
