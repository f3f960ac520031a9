//! CLI command implementations.

pub mod chat;
pub mod show;
pub mod upload;
