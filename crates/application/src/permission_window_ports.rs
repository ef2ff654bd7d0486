mod inputs;
mod projections;
mod repositories;

pub use inputs::{
    CreatePermissionWindowInput, PermissionWindowFilter, PermissionWindowListQuery,
    UpdatePermissionWindowInput,
};
pub use projections::{OpenImpersonationSession, PermissionWindowListEntry, UserSummary};
pub use repositories::{ImpersonationSessionRepository, PermissionWindowRepository};
