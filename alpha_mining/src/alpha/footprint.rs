use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::event_log::{
    activity_projection::EventLogActivityProjection, event_log_struct::Activity, EventLog,
};

use super::error::AlphaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Ordering relation between two activities `(x, y)`, derived from directly-follows pairs
pub enum Relation {
    /// `x` is directly followed by `y`, but never the other way around (`→L`)
    Causal,
    /// `y` is directly followed by `x`, but never the other way around (`←L`)
    InverseCausal,
    /// Both directly-follows pairs occur (`∥L`)
    Parallel,
    /// Neither directly-follows pair occurs (`#L`)
    Unrelated,
}

impl Relation {
    /// Symbol used in footprint tables
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Causal => "→L",
            Relation::InverseCausal => "←L",
            Relation::Parallel => "∥L",
            Relation::Unrelated => "#L",
        }
    }

    /// The relation of the swapped pair `(y, x)`
    pub fn mirror(&self) -> Relation {
        match self {
            Relation::Causal => Relation::InverseCausal,
            Relation::InverseCausal => Relation::Causal,
            r => *r,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

///
/// Footprint of an event log: the [`Relation`] between every ordered pair of activities
///
/// This is the only place where relations are classified; all later steps (and the rendered
/// [`RelationTable`]) query [`Footprint::relation`].
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    activities: Vec<Activity>,
    directly_follows: BTreeSet<(usize, usize)>,
}

impl Footprint {
    /// Compute the footprint of an activity projection
    pub fn from_projection(log: &EventLogActivityProjection) -> Self {
        Self {
            activities: log.activities.clone(),
            directly_follows: log.directly_follows_pairs(),
        }
    }

    /// Compute the footprint of an [`EventLog`]
    pub fn from_event_log(log: &EventLog) -> Self {
        Self::from_projection(&log.into())
    }

    /// Sorted activity universe (index = position)
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Number of activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// `true` if there are no activities
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Index of an activity label
    pub fn index_of(&self, activity: &str) -> Option<usize> {
        self.activities
            .binary_search_by(|a| a.as_str().cmp(activity))
            .ok()
    }

    /// Check if `b` directly follows `a` somewhere in the log
    pub fn is_directly_followed(&self, a: usize, b: usize) -> bool {
        self.directly_follows.contains(&(a, b))
    }

    /// All directly-follows pairs (by index)
    pub fn directly_follows_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.directly_follows
    }

    /// Relation between activities `x` and `y` (by index)
    ///
    /// Self pairs are always [`Relation::Unrelated`].
    pub fn relation(&self, x: usize, y: usize) -> Relation {
        if x == y {
            return Relation::Unrelated;
        }
        match (self.is_directly_followed(x, y), self.is_directly_followed(y, x)) {
            (true, true) => Relation::Parallel,
            (true, false) => Relation::Causal,
            (false, true) => Relation::InverseCausal,
            (false, false) => Relation::Unrelated,
        }
    }

    /// Relation between activities `x` and `y` (by label)
    ///
    /// Returns `None` if one of the labels does not occur in the log
    pub fn relation_by_name(&self, x: &str, y: &str) -> Option<Relation> {
        Some(self.relation(self.index_of(x)?, self.index_of(y)?))
    }

    /// Verify that `relation(x, y)` mirrors `relation(y, x)` for all pairs
    pub fn check_symmetry(&self) -> Result<(), AlphaError> {
        (0..self.len())
            .cartesian_product(0..self.len())
            .try_for_each(|(x, y)| {
                let (r_xy, r_yx) = (self.relation(x, y), self.relation(y, x));
                if r_xy.mirror() != r_yx {
                    return Err(AlphaError::InvariantViolation(format!(
                        "relation({}, {}) = {} is not mirrored by relation({}, {}) = {}",
                        self.activities[x], self.activities[y], r_xy, self.activities[y],
                        self.activities[x], r_yx
                    )));
                }
                Ok(())
            })
    }

    /// Materialize the full relation table (rows and columns in sorted label order)
    pub fn relation_table(&self) -> RelationTable {
        RelationTable {
            activities: self.activities.clone(),
            relations: (0..self.len())
                .map(|x| (0..self.len()).map(|y| self.relation(x, y)).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Footprint matrix: `relations[x][y]` is the relation of `(activities[x], activities[y])`
pub struct RelationTable {
    /// Row/column labels (sorted)
    pub activities: Vec<Activity>,
    /// Relation matrix
    pub relations: Vec<Vec<Relation>>,
}

impl RelationTable {
    /// Look up the relation of two labels
    pub fn get(&self, x: &str, y: &str) -> Option<Relation> {
        let x = self.activities.iter().position(|a| a == x)?;
        let y = self.activities.iter().position(|a| a == y)?;
        Some(self.relations[x][y])
    }
}

impl std::fmt::Display for RelationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\t{}", self.activities.iter().join("\t"))?;
        for (act, row) in self.activities.iter().zip(&self.relations) {
            writeln!(f, "{}\t{}", act, row.iter().join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log;

    #[test]
    fn classifies_relations() {
        let fp = Footprint::from_event_log(&event_log![["a", "b", "c"], ["a", "c", "b"]]);
        assert_eq!(fp.relation_by_name("a", "b"), Some(Relation::Causal));
        assert_eq!(fp.relation_by_name("b", "a"), Some(Relation::InverseCausal));
        assert_eq!(fp.relation_by_name("a", "c"), Some(Relation::Causal));
        assert_eq!(fp.relation_by_name("b", "c"), Some(Relation::Parallel));
        assert_eq!(fp.relation_by_name("c", "b"), Some(Relation::Parallel));
        assert_eq!(fp.relation_by_name("a", "a"), Some(Relation::Unrelated));
        assert_eq!(fp.relation_by_name("a", "x"), None);
    }

    #[test]
    fn unrelated_choice() {
        let fp = Footprint::from_event_log(&event_log![["a", "b", "d"], ["a", "c", "d"]]);
        assert_eq!(fp.relation_by_name("b", "c"), Some(Relation::Unrelated));
        assert_eq!(fp.relation_by_name("a", "d"), Some(Relation::Unrelated));
        assert_eq!(fp.relation_by_name("c", "d"), Some(Relation::Causal));
    }

    #[test]
    fn relations_are_symmetric() {
        let fp = Footprint::from_event_log(&event_log![
            ["a", "b", "c", "d"],
            ["a", "c", "b", "d"],
            ["a", "e", "d"],
            ["b", "b", "a"]
        ]);
        assert_eq!(fp.check_symmetry(), Ok(()));
        for x in 0..fp.len() {
            assert_eq!(fp.relation(x, x), Relation::Unrelated);
            for y in 0..fp.len() {
                assert_eq!(fp.relation(x, y).mirror(), fp.relation(y, x));
            }
        }
    }

    #[test]
    fn table_matches_relation_function() {
        let fp = Footprint::from_event_log(&event_log![["b", "a"], ["a", "c"]]);
        let table = fp.relation_table();
        assert_eq!(table.activities, vec!["a", "b", "c"]);
        for x in fp.activities() {
            for y in fp.activities() {
                assert_eq!(table.get(x, y), fp.relation_by_name(x, y));
            }
        }
        assert_eq!(
            table.to_string(),
            "\ta\tb\tc\na\t#L\t←L\t→L\nb\t→L\t#L\t#L\nc\t←L\t#L\t#L\n"
        );
    }
}
