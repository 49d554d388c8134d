use std::collections::BTreeSet;

use serde::Serialize;

/// Activity label (identifies one step type of the process)
pub type Activity = String;

///
/// Error encountered when constructing an [`EventLog`] that violates its invariants
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLogError {
    /// The log does not contain a single trace
    EmptyLog,
    /// The trace at the given index (0-based) does not contain any activity
    EmptyTrace(usize),
}

impl std::fmt::Display for EventLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventLogError::EmptyLog => write!(f, "Event log contains no traces"),
            EventLogError::EmptyTrace(i) => write!(f, "Trace #{} contains no activities", i + 1),
        }
    }
}

impl std::error::Error for EventLogError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
///
/// One recorded execution of the process, i.e., an ordered sequence of [`Activity`] labels
///
pub struct Trace {
    activities: Vec<Activity>,
}

impl Trace {
    /// Create a new [`Trace`] from a non-empty sequence of activity labels
    ///
    /// Returns `None` if no activities are given
    pub fn new<I, S>(activities: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Activity>,
    {
        let activities: Vec<Activity> = activities.into_iter().map(Into::into).collect();
        if activities.is_empty() {
            None
        } else {
            Some(Self { activities })
        }
    }

    /// Activities of this trace (in order of execution)
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// First activity of the trace
    pub fn first(&self) -> &Activity {
        &self.activities[0]
    }

    /// Last activity of the trace
    pub fn last(&self) -> &Activity {
        &self.activities[self.activities.len() - 1]
    }

    /// Number of activities in this trace (always at least 1)
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Always `false`; traces cannot be empty
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Iterate over all directly-follows pairs `(x, y)` of this trace
    pub fn directly_follows(&self) -> impl Iterator<Item = (&Activity, &Activity)> + '_ {
        self.activities.windows(2).map(|w| (&w[0], &w[1]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
///
/// Event log: an ordered collection of [`Trace`]s
///
/// The order of traces is preserved (e.g., for reporting) but does not influence discovery.
///
pub struct EventLog {
    traces: Vec<Trace>,
}

impl EventLog {
    /// Create a new [`EventLog`] from the given traces
    ///
    /// Fails if no trace is given
    pub fn new(traces: Vec<Trace>) -> Result<Self, EventLogError> {
        if traces.is_empty() {
            return Err(EventLogError::EmptyLog);
        }
        Ok(Self { traces })
    }

    /// Create a new [`EventLog`] from sequences of activity labels
    ///
    /// Fails if there are no sequences or one of them is empty
    pub fn from_sequences<T, I, S>(sequences: T) -> Result<Self, EventLogError>
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<Activity>,
    {
        let traces = sequences
            .into_iter()
            .enumerate()
            .map(|(i, seq)| Trace::new(seq).ok_or(EventLogError::EmptyTrace(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(traces)
    }

    /// All traces of the log (in the order they were loaded)
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// The activity universe, i.e., all distinct activity labels of the log (sorted)
    pub fn activities(&self) -> BTreeSet<&Activity> {
        self.traces
            .iter()
            .flat_map(|t| t.activities().iter())
            .collect()
    }

    /// Activities starting at least one trace (sorted)
    pub fn start_activities(&self) -> BTreeSet<&Activity> {
        self.traces.iter().map(Trace::first).collect()
    }

    /// Activities ending at least one trace (sorted)
    pub fn end_activities(&self) -> BTreeSet<&Activity> {
        self.traces.iter().map(Trace::last).collect()
    }
}
