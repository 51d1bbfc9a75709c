#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Personal task management behind bearer-token authentication: password hashing,"]
#![doc = "token issuance and verification, the auth middleware, owner-scoped task storage,"]
#![doc = "the task overview, routing configuration and error handling."]
#![doc = "The binary (`main.rs`) loads the configuration, opens the store and serves the routes."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
