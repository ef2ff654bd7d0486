//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_permission_window_repository;
mod postgres_impersonation_session_repository;
mod postgres_permission_window_repository;

pub use in_memory_permission_window_repository::{
    InMemoryImpersonationSessionRepository, InMemoryPermissionWindowRepository,
};
pub use postgres_impersonation_session_repository::PostgresImpersonationSessionRepository;
pub use postgres_permission_window_repository::PostgresPermissionWindowRepository;
