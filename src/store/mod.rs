//! Database-backed stores. Each one wraps the shared pool and is cheap to clone.

pub mod tasks;
pub mod users;

pub use tasks::{TaskError, TaskStore};
pub use users::{UserError, UserStore};
