pub mod task;
pub mod user;

pub use task::{
    NewTask, PriorityCounts, StatusCounts, Task, TaskOverview, TaskPriority, TaskQuery,
    TaskStatus, TaskUpdate, UpcomingTask,
};
pub use user::{NewUser, User};
