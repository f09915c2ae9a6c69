//! Service layer for autopress-server
//!
//! Contains background services that drive the generation pipeline.

pub mod scheduler;

pub use scheduler::{InventoryScheduler, SchedulerConfig};
