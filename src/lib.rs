#![doc = "The `tasklist` library crate."]
#![doc = ""]
#![doc = "Users sign up, trade their credentials for a bearer token, and manage a private"]
#![doc = "list of tasks. Every task route is gated on a valid token, a shared API key and"]
#![doc = "an existing user, and every task query is scoped to that user."]
#![doc = "The binary (`main.rs`) only loads configuration, opens the pool and starts the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
