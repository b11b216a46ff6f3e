pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskInput, TaskUpdate, DEFAULT_PRIORITY};
pub use user::{LoginInput, RegisterInput, User};
