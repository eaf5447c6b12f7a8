//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - Maintenance: sweeps expired cache entries and runs the memory monitor
//!   at configured intervals

mod maintenance;

pub use maintenance::spawn_maintenance_task;
