//! Utility types and helpers shared across the runtime.

pub mod ids;
pub mod serde_helpers;

pub use ids::{reset_id_counter, ActorId, EventGroupId, MonitorId, OperationId, TimerId};
pub use serde_helpers::duration_serde;
