//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Purges expired keys from the in-memory store at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
