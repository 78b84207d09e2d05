//! State-machine actors: a stack of named states with entry/exit actions,
//! goto/push/pop transitions, and per-state defer/ignore sets, dispatched on
//! top of the same controlled scheduler plain actors use.

pub mod dispatch;
pub mod traits;
pub mod transition;

pub use dispatch::spawn_state_machine;
pub use traits::{MachineObserver, NoopObserver, State};
pub use transition::Transition;
