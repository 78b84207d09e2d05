//! Everything a test run hands back: the recorded trace, a bug report when
//! one is found, and run-wide coverage statistics.

pub mod bug;
pub mod coverage;
pub mod trace;

pub use bug::{BugKind, BugReport};
pub use coverage::{CoverageReport, CoverageTracker, ScheduleFingerprint};
pub use trace::{Trace, TraceHeader, TraceRecord};
