pub mod task;
pub mod user;

pub use task::{Task, TaskRequest, TaskResponse, TaskStatus};
pub use user::{MessageResponse, TokenResponse, User, UserRequest};
