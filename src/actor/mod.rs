//! Plain actors: event handlers dispatched one at a time from a private
//! mailbox, without a declared state machine.

pub mod context;
pub mod dispatch;
pub mod traits;

pub use context::ActorContext;
pub use dispatch::spawn_actor;
pub use traits::Actor;
