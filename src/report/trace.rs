//! The recorded trace: a versioned header plus one record per scheduling
//! decision, readable back in by the replay strategy.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::OperationId;

/// Current on-disk trace format version. Bump when the record shape
/// changes so old trace files fail loudly instead of silently misreading.
pub const TRACE_FORMAT_VERSION: u32 = 1;

/// Trace file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceHeader {
    pub version: u32,
    pub strategy: String,
    pub seed: u64,
    pub step_bound: u64,
}

impl TraceHeader {
    /// Builds a header for the current format version.
    pub fn new(strategy: impl Into<String>, seed: u64, step_bound: u64) -> Self {
        Self {
            version: TRACE_FORMAT_VERSION,
            strategy: strategy.into(),
            seed,
            step_bound,
        }
    }
}

/// One scheduling decision: the chosen operation, and the random bits
/// consumed if this step was a controlled random choice rather than an
/// operation pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    pub step: u64,
    pub op_id: OperationId,
    pub random_bits: Option<u64>,
}

/// A complete recorded schedule: header plus ordered records.
///
/// # Example
/// ```rust
/// use vigil_rt::report::{Trace, TraceHeader, TraceRecord};
/// use vigil_rt::util::OperationId;
///
/// let mut trace = Trace::new(TraceHeader::new("random", 42, 10_000));
/// trace.push(TraceRecord { step: 0, op_id: OperationId::new(), random_bits: None });
/// assert_eq!(trace.records().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub header: TraceHeader,
    records: Vec<TraceRecord>,
}

impl Trace {
    /// Starts an empty trace with the given header.
    pub fn new(header: TraceHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    /// Appends one scheduling decision.
    pub fn push(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    /// The recorded decisions, in order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Serializes the trace to a JSON string, suitable for writing to a
    /// trace file artifact.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a trace previously written by [`Trace::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut trace = Trace::new(TraceHeader::new("replay", 7, 1000));
        trace.push(TraceRecord {
            step: 0,
            op_id: OperationId::new(),
            random_bits: Some(3),
        });

        let json = trace.to_json().unwrap();
        let parsed = Trace::from_json(&json).unwrap();
        assert_eq!(parsed.header.seed, 7);
        assert_eq!(parsed.records().len(), 1);
        assert_eq!(parsed.records()[0].random_bits, Some(3));
    }
}
