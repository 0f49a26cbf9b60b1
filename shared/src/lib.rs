//! Shared types for the Comanda ordering platform
//!
//! Data models and small utilities used by the order server and any
//! other consumer of the platform's data contracts. Models are plain
//! serde structs; `sqlx` derives are gated behind the `db` feature so
//! clients without a database stay lightweight.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
