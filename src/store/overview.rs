use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{PriorityCounts, StatusCounts, TaskOverview, UpcomingTask};

/// How far ahead the overview looks for due tasks.
pub const UPCOMING_WINDOW_DAYS: i64 = 3;

/// Builds the overview for one owner as of `now`.
///
/// The three reads share one transaction so they see the same snapshot. Any failure
/// is reported as a single aggregation error.
pub async fn compute(
    pool: &SqlitePool,
    owner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<TaskOverview, AppError> {
    aggregate(pool, owner_id, now).await.map_err(|e| {
        log::error!("overview for user {} failed: {}", owner_id, e);
        AppError::Internal("aggregation failed".into())
    })
}

async fn aggregate(
    pool: &SqlitePool,
    owner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<TaskOverview, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut status_counts = StatusCounts::default();
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM tasks WHERE owner_id = ? GROUP BY status",
    )
    .bind(owner_id)
    .fetch_all(&mut *tx)
    .await?;
    for (status, count) in rows {
        status_counts.record(&status, count);
    }

    let mut priority_counts = PriorityCounts::default();
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT priority, COUNT(*) FROM tasks WHERE owner_id = ? GROUP BY priority",
    )
    .bind(owner_id)
    .fetch_all(&mut *tx)
    .await?;
    for (priority, count) in rows {
        priority_counts.record(&priority, count);
    }

    // Closed interval: a task due exactly at `now` or at the window's end is included.
    let upcoming_tasks = sqlx::query_as::<_, UpcomingTask>(
        "SELECT id, description, due_date FROM tasks
         WHERE owner_id = ? AND due_date IS NOT NULL AND due_date >= ? AND due_date <= ?
         ORDER BY due_date ASC",
    )
    .bind(owner_id)
    .bind(now)
    .bind(now + Duration::days(UPCOMING_WINDOW_DAYS))
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(TaskOverview {
        status_counts,
        priority_counts,
        upcoming_tasks,
    })
}
