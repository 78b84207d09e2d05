//! Logical timers: virtual-time nondeterminism instead of real delays
//!.

pub mod service;
pub mod types;

pub use service::TimerService;
pub use types::{TimerHandle, TimerInfo};
