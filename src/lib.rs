//! # Taskboard Core
//!
//! Project-membership and task-ordering engine for a multi-tenant,
//! kanban-style project/task management backend. Users create projects,
//! invite members via emailed tokenized links, and manage tasks organized
//! into status columns with per-column ordering and assignment.
//!
//! This crate is the core consumed by an HTTP layer that lives elsewhere:
//! every operation takes plain data plus a resolved caller identity and
//! returns a plain result or a tagged [`error::CoreError`] for the boundary
//! to map to status codes.
//!
//! ## Module Organization
//!
//! - `models`: Database rows and enums
//! - `repo`: Per-entity repository traits and their Postgres implementations
//! - `auth`: Password hashing and project-access tokens
//! - `engine`: Membership, project, task, invitation, and view services
//! - `email`: Outbound mail seam (SMTP implementation included)
//! - `db`: Connection pool and migration runner
//! - `config`: Environment-based configuration
//! - `error`: Core error taxonomy

pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod engine;
pub mod error;
pub mod models;
pub mod repo;

/// Current version of the taskboard core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
