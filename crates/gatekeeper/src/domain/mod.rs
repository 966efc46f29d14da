//! Domain modules containing handlers.

pub mod authorization;
pub mod health;
pub mod posts;
