use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::event_log::event_log_struct::Activity;

use super::{
    config::{EnumerationLimits, INTERRUPT_CHECK_INTERVAL},
    error::AlphaError,
    footprint::{Footprint, Relation},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Set of activities, as a bitmask over the sorted activity universe of a [`Footprint`]
pub struct ActivitySet(u64);

impl ActivitySet {
    /// The empty set
    pub fn empty() -> Self {
        Self(0)
    }
    /// Set containing only activity `act`
    pub fn singleton(act: usize) -> Self {
        Self(1 << act)
    }
    /// Copy of this set with `act` added
    pub fn with(self, act: usize) -> Self {
        Self(self.0 | (1 << act))
    }
    /// Check if `act` is contained
    pub fn contains(&self, act: usize) -> bool {
        self.0 & (1 << act) != 0
    }
    /// Number of activities
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
    /// `true` if this set contains no activity
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    /// Check if every activity of `self` is also in `other`
    pub fn is_subset(&self, other: &ActivitySet) -> bool {
        self.0 & !other.0 == 0
    }
    /// Check if `self` and `other` share no activity
    pub fn is_disjoint(&self, other: &ActivitySet) -> bool {
        self.0 & other.0 == 0
    }
    /// Intersection of both sets
    pub fn intersection(&self, other: &ActivitySet) -> ActivitySet {
        Self(self.0 & other.0)
    }
    /// Union of both sets
    pub fn union(&self, other: &ActivitySet) -> ActivitySet {
        Self(self.0 | other.0)
    }
    /// Iterate over the contained activity indices (ascending)
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let bits = self.0;
        (0..u64::BITS as usize).filter(move |i| bits & (1 << i) != 0)
    }
    /// Labels of the contained activities (sorted, as the universe is sorted)
    pub fn names<'a>(&self, activities: &'a [Activity]) -> Vec<&'a Activity> {
        self.iter().map(|i| &activities[i]).collect()
    }
}

impl FromIterator<usize> for ActivitySet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        iter.into_iter().fold(ActivitySet::empty(), ActivitySet::with)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Place candidate `(A, B)`: every activity in `a` is causally followed by every activity in `b`
pub struct CandidatePair {
    /// Input activities (A)
    pub a: ActivitySet,
    /// Output activities (B)
    pub b: ActivitySet,
}

impl CandidatePair {
    /// Create a new pair
    pub fn new(a: ActivitySet, b: ActivitySet) -> Self {
        Self { a, b }
    }

    /// Check if `self` is dominated by `other`, i.e., `A ⊆ A'` and `B ⊆ B'` with one inclusion strict
    pub fn is_dominated_by(&self, other: &CandidatePair) -> bool {
        self != other && self.a.is_subset(&other.a) && self.b.is_subset(&other.b)
    }
}

/// Check that all activities of `set` are pairwise [`Relation::Unrelated`]
pub fn is_independent(fp: &Footprint, set: &ActivitySet) -> bool {
    set.iter()
        .all(|x| set.iter().all(|y| fp.relation(x, y) == Relation::Unrelated))
}

/// Check that `relation(a, b)` is [`Relation::Causal`] for all `a` in `a_set` and `b` in `b_set`
pub fn all_causal_between(fp: &Footprint, a_set: &ActivitySet, b_set: &ActivitySet) -> bool {
    a_set
        .iter()
        .all(|a| b_set.iter().all(|b| fp.relation(a, b) == Relation::Causal))
}

/// For each activity `x`: all activities `y` with `relation(x, y) == rel`
fn relation_masks(fp: &Footprint, rel: Relation) -> Vec<ActivitySet> {
    (0..fp.len())
        .map(|x| (0..fp.len()).filter(|&y| fp.relation(x, y) == rel).collect())
        .collect()
}

/// Enumerate all non-empty subsets whose activities are pairwise unrelated (sorted)
///
/// Sets are only extended by activities unrelated to all current members, so
/// dependent subsets are never materialized.
fn independent_subsets(
    unrelated: &[ActivitySet],
    limits: &EnumerationLimits,
) -> Result<Vec<ActivitySet>, AlphaError> {
    let n = unrelated.len();
    let mut result: Vec<ActivitySet> = Vec::new();
    let mut stack: Vec<(ActivitySet, usize)> =
        (0..n).rev().map(|i| (ActivitySet::singleton(i), i)).collect();
    while let Some((set, last)) = stack.pop() {
        if result.len() % INTERRUPT_CHECK_INTERVAL == 0 {
            limits.check_interrupted()?;
        }
        result.push(set);
        for next in (last + 1..n).rev() {
            if set.is_subset(&unrelated[next]) {
                stack.push((set.with(next), next));
            }
        }
    }
    result.sort();
    Ok(result)
}

/// All candidate pairs with input set `a`
fn candidates_with_input(
    a: &ActivitySet,
    independent: &[ActivitySet],
    causal_succ: &[ActivitySet],
    limits: &EnumerationLimits,
) -> Result<Vec<CandidatePair>, AlphaError> {
    limits.check_interrupted()?;
    let common_succ = a
        .iter()
        .fold(ActivitySet(u64::MAX), |acc, x| acc.intersection(&causal_succ[x]));
    if common_succ.is_empty() {
        return Ok(Vec::new());
    }
    Ok(independent
        .iter()
        .filter(|b| b.is_subset(&common_succ) && a.is_disjoint(b))
        .map(|b| CandidatePair::new(*a, *b))
        .collect())
}

///
/// Build all place candidates (XL)
///
/// Returns every pair `(A, B)` of non-empty, disjoint activity sets such that
/// the activities within `A` (and within `B`) are pairwise unrelated and every `a` in `A`
/// is causally followed by every `b` in `B`.
///
/// __Complexity__: exponential in the number of activities. In the worst case
/// all `2^n - 1` subsets are independent and `O(4^n)` pairs are tested.
/// The universe size is therefore checked against [`EnumerationLimits`] before anything is
/// enumerated, and cancellation as well as the deadline are checked periodically.
///
pub fn build_candidates(
    fp: &Footprint,
    limits: &EnumerationLimits,
) -> Result<BTreeSet<CandidatePair>, AlphaError> {
    limits.check_universe(fp.len())?;
    limits.check_interrupted()?;

    let unrelated = relation_masks(fp, Relation::Unrelated);
    let causal_succ = relation_masks(fp, Relation::Causal);
    let independent = independent_subsets(&unrelated, limits)?;
    log::debug!(
        "{} of {} activity subsets are independent",
        independent.len(),
        (1_u128 << fp.len()) - 1
    );

    let per_input: Vec<Vec<CandidatePair>> = if limits.parallel {
        independent
            .par_iter()
            .map(|a| candidates_with_input(a, &independent, &causal_succ, limits))
            .collect::<Result<_, _>>()?
    } else {
        independent
            .iter()
            .map(|a| candidates_with_input(a, &independent, &causal_succ, limits))
            .collect::<Result<_, _>>()?
    };
    Ok(per_input.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        alpha::config::{CancellationToken, EnumerationLimits},
        event_log,
    };

    fn set(fp: &Footprint, acts: &[&str]) -> ActivitySet {
        acts.iter().map(|a| fp.index_of(a).unwrap()).collect()
    }

    /// Direct implementation of the definition over all subset pairs
    fn brute_force(fp: &Footprint) -> BTreeSet<CandidatePair> {
        let n = fp.len();
        let subsets: Vec<ActivitySet> = (1..(1_u64 << n)).map(ActivitySet).collect();
        let mut res = BTreeSet::new();
        for a in &subsets {
            if !is_independent(fp, a) {
                continue;
            }
            for b in &subsets {
                if is_independent(fp, b) && a.is_disjoint(b) && all_causal_between(fp, a, b) {
                    res.insert(CandidatePair::new(*a, *b));
                }
            }
        }
        res
    }

    #[test]
    fn activity_set_operations() {
        let s: ActivitySet = [0, 3, 5].into_iter().collect();
        assert_eq!(s.len(), 3);
        assert!(s.contains(3) && !s.contains(1));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 3, 5]);
        assert!(ActivitySet::singleton(3).is_subset(&s));
        assert!(!s.is_subset(&ActivitySet::singleton(3)));
        assert!(s.is_disjoint(&ActivitySet::singleton(4)));
        assert!(ActivitySet::empty().is_empty());
        assert_eq!(s.union(&ActivitySet::singleton(1)).len(), 4);
        let big = ActivitySet::singleton(63);
        assert_eq!(big.iter().collect::<Vec<_>>(), vec![63]);
    }

    #[test]
    fn parallel_branches_are_not_merged() {
        let fp = Footprint::from_event_log(&event_log![["a", "b", "c"], ["a", "c", "b"]]);
        let xl = build_candidates(&fp, &EnumerationLimits::with_max_activities(10)).unwrap();
        let expected: BTreeSet<CandidatePair> = [
            CandidatePair::new(set(&fp, &["a"]), set(&fp, &["b"])),
            CandidatePair::new(set(&fp, &["a"]), set(&fp, &["c"])),
        ]
        .into_iter()
        .collect();
        assert_eq!(xl, expected);
    }

    #[test]
    fn choices_are_merged() {
        let fp = Footprint::from_event_log(&event_log![["a", "b", "d"], ["a", "c", "d"]]);
        let xl = build_candidates(&fp, &EnumerationLimits::with_max_activities(10)).unwrap();
        assert_eq!(xl.len(), 6);
        assert!(xl.contains(&CandidatePair::new(
            set(&fp, &["a"]),
            set(&fp, &["b", "c"])
        )));
        assert!(xl.contains(&CandidatePair::new(
            set(&fp, &["b", "c"]),
            set(&fp, &["d"])
        )));
    }

    #[test]
    fn matches_definition_on_larger_log() {
        let fp = Footprint::from_event_log(&event_log![
            ["a", "b", "c", "d"],
            ["a", "c", "b", "d"],
            ["a", "e", "d"],
            ["f", "e", "g"],
            ["a", "b", "g"]
        ]);
        let expected = brute_force(&fp);
        let limits = EnumerationLimits::with_max_activities(10);
        assert_eq!(build_candidates(&fp, &limits).unwrap(), expected);
        let par_limits = EnumerationLimits {
            parallel: true,
            ..limits
        };
        assert_eq!(build_candidates(&fp, &par_limits).unwrap(), expected);
        for cnd in &expected {
            assert!(!cnd.a.is_empty() && !cnd.b.is_empty());
            assert!(cnd.a.is_disjoint(&cnd.b));
        }
    }

    #[test]
    fn respects_limits() {
        let fp = Footprint::from_event_log(&event_log![["a", "b", "c", "d"]]);
        assert_eq!(
            build_candidates(&fp, &EnumerationLimits::with_max_activities(3)),
            Err(AlphaError::ResourceLimit {
                activities: 4,
                max_activities: 3
            })
        );
        let token = CancellationToken::new();
        token.cancel();
        let limits = EnumerationLimits {
            cancellation: token,
            ..EnumerationLimits::with_max_activities(10)
        };
        assert_eq!(build_candidates(&fp, &limits), Err(AlphaError::Cancelled));
    }
}
