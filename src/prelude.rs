//! Convenient imports for writing a program under test and driving it
//! through the test engine:
//!
//! ```rust,ignore
//! use vigil_rt::prelude::*;
//! ```

// Execution model
pub use crate::actor::{spawn_actor, Actor, ActorContext};
pub use crate::event::{downcast_event, AnyEvent, Envelope, Event, EventObject, Halt, TimerElapsed};
pub use crate::mailbox::{ControlledMailbox, EnqueueStatus, MailboxError};
pub use crate::operation::{Operation, OperationKind, OperationStatus, WaitOn};
pub use crate::state_machine::{spawn_state_machine, MachineObserver, NoopObserver, State, Transition};

// Controlled execution
pub use crate::monitor::{Monitor, MonitorViolation, StateTemperature};
pub use crate::random::RandomnessService;
pub use crate::scheduler::{RuntimeState, Scheduler, SchedulerError};
pub use crate::strategy::{Strategy, StrategyKind};
pub use crate::timer::{TimerHandle, TimerService};

// Running and reporting
pub use crate::report::{BugKind, BugReport, CoverageReport, CoverageTracker, Trace, TraceHeader};
pub use crate::test_engine::{TestConfig, TestEngine, TestRunReport};

// Infrastructure
pub use crate::error::VigilError;
pub use crate::util::{ActorId, EventGroupId, MonitorId, OperationId, TimerId};
