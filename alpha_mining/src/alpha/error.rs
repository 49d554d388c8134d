///
/// Error encountered while running Alpha discovery
///
/// Input errors (e.g., malformed logs) are reported by the parser
/// ([`TraceParseError`](crate::event_log::import_trace_text::TraceParseError)) before discovery starts.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphaError {
    /// The activity universe is larger than the configured enumeration bound
    ResourceLimit {
        /// Number of distinct activities in the log
        activities: usize,
        /// Configured maximum
        max_activities: usize,
    },
    /// Candidate enumeration was cancelled through its [`CancellationToken`](super::config::CancellationToken)
    Cancelled,
    /// Candidate enumeration did not finish before the configured deadline
    DeadlineExceeded,
    /// An internal invariant was violated (indicates a bug, not a user error)
    InvariantViolation(String),
}

impl std::fmt::Display for AlphaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlphaError::ResourceLimit {
                activities,
                max_activities,
            } => write!(
                f,
                "Resource limit: log contains {} activities, but at most {} are allowed for candidate enumeration",
                activities, max_activities
            ),
            AlphaError::Cancelled => write!(f, "Candidate enumeration was cancelled"),
            AlphaError::DeadlineExceeded => {
                write!(f, "Candidate enumeration exceeded its deadline")
            }
            AlphaError::InvariantViolation(msg) => write!(f, "Internal invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for AlphaError {}

impl AlphaError {
    /// `true` for internal faults (as opposed to limits hit by the caller's input or configuration)
    pub fn is_internal(&self) -> bool {
        matches!(self, AlphaError::InvariantViolation(_))
    }
}
