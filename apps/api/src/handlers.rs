pub mod admin;
pub mod health;
pub mod impersonation;
pub mod messages;
pub mod permission_windows;
