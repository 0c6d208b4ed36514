//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Maintenance sweep: drops idle entries and enforces the optional entry cap

mod maintenance;

pub use maintenance::{spawn_maintenance_task, MaintenancePolicy};
