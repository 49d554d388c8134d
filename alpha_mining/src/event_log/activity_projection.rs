use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::event_log_struct::{Activity, EventLog};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Projection of an event log on activity indices
///
/// Activities are sorted by label, so index order equals label order.
/// Identical traces are collapsed into variants, each annotated with its frequency.
pub struct EventLogActivityProjection {
    /// Sorted activity labels (index = position)
    pub activities: Vec<Activity>,
    /// Reverse lookup from activity label to index
    pub act_to_index: HashMap<Activity, usize>,
    /// Trace variants (sorted) with their number of occurrences
    pub traces: Vec<(Vec<usize>, u64)>,
}

impl From<&EventLog> for EventLogActivityProjection {
    fn from(val: &EventLog) -> Self {
        let activities: Vec<Activity> = val.activities().into_iter().cloned().collect();
        let act_to_index: HashMap<Activity, usize> = activities
            .iter()
            .enumerate()
            .map(|(i, act)| (act.clone(), i))
            .collect();
        let mut variants: BTreeMap<Vec<usize>, u64> = BTreeMap::new();
        val.traces().iter().for_each(|t| {
            let trace: Vec<usize> = t
                .activities()
                .iter()
                .map(|act| act_to_index[act])
                .collect();
            *variants.entry(trace).or_insert(0) += 1;
        });

        EventLogActivityProjection {
            activities,
            act_to_index,
            traces: variants.into_iter().collect(),
        }
    }
}

impl EventLogActivityProjection {
    /// Translate activity indices to their (sorted) labels
    pub fn acts_to_names(&self, acts: &[usize]) -> Vec<String> {
        let mut ret: Vec<String> = acts
            .iter()
            .map(|act| self.activities[*act].clone())
            .collect();
        ret.sort();
        ret
    }

    /// Indices of activities that start at least one trace
    pub fn start_activities(&self) -> BTreeSet<usize> {
        self.traces
            .iter()
            .filter_map(|(t, _)| t.first().copied())
            .collect()
    }

    /// Indices of activities that end at least one trace
    pub fn end_activities(&self) -> BTreeSet<usize> {
        self.traces
            .iter()
            .filter_map(|(t, _)| t.last().copied())
            .collect()
    }

    /// Set of all directly-follows pairs `(a, b)`, i.e., `b` immediately follows `a` in some trace
    pub fn directly_follows_pairs(&self) -> BTreeSet<(usize, usize)> {
        self.traces
            .iter()
            .flat_map(|(t, _)| t.windows(2).map(|w| (w[0], w[1])))
            .collect()
    }
}
