/// Database models
///
/// Plain row types and enums for the four entities. Persistence lives behind
/// the repository traits in [`crate::repo`]; these types carry no database
/// handle of their own.
///
/// # Models
///
/// - `user`: User accounts (identity store rows)
/// - `project`: Projects and their creators
/// - `membership`: Project-member relation with role, status, and permission flags
/// - `task`: Kanban tasks with per-column ordering
pub mod membership;
pub mod project;
pub mod task;
pub mod user;
