//! Persistence for users and tasks.
//!
//! Task access always goes through [`TaskRepository`], which is bound to one owner at
//! construction, so no query can reach another user's rows.

pub mod overview;
pub mod tasks;
pub mod users;

pub use tasks::TaskRepository;
