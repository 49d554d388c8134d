use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;

use super::{
    candidate_building::{ActivitySet, CandidatePair},
    config::{EnumerationLimits, INTERRUPT_CHECK_INTERVAL},
    error::AlphaError,
};

/// Check if `(A ∪ {x}, B)` or `(A, B ∪ {x})` is a candidate for some activity `x`
fn has_direct_extension(
    cnd: &CandidatePair,
    universe: &ActivitySet,
    cnds: &HashSet<CandidatePair>,
) -> bool {
    universe
        .iter()
        .filter(|&x| !cnd.a.contains(x) && !cnd.b.contains(x))
        .any(|x| {
            cnds.contains(&CandidatePair::new(cnd.a.with(x), cnd.b))
                || cnds.contains(&CandidatePair::new(cnd.a, cnd.b.with(x)))
        })
}

///
/// Select the maximal place candidates (YL)
///
/// Keeps every candidate that is not dominated by another candidate, i.e., there is no
/// `(A', B')` with `A ⊆ A'` and `B ⊆ B'` where at least one inclusion is strict.
///
/// `cnds` has to be downward closed (as XL from
/// [`build_candidates`](super::candidate_building::build_candidates) is): shrinking either side of
/// a candidate to a non-empty subset yields a candidate again. A candidate is then dominated
/// exactly if it can be extended by a single activity, so every candidate is tested with at most
/// `2n` set lookups.
///
/// Cancellation and the deadline of `limits` are checked every
/// [`INTERRUPT_CHECK_INTERVAL`] candidates.
///
pub fn select_maximal_pairs(
    cnds: &BTreeSet<CandidatePair>,
    limits: &EnumerationLimits,
) -> Result<BTreeSet<CandidatePair>, AlphaError> {
    let lookup: HashSet<CandidatePair> = cnds.iter().copied().collect();
    let universe = cnds
        .iter()
        .fold(ActivitySet::empty(), |acc, cnd| acc.union(&cnd.a).union(&cnd.b));
    let is_maximal = |cnd: &CandidatePair| !has_direct_extension(cnd, &universe, &lookup);

    let cnds_vec: Vec<CandidatePair> = cnds.iter().copied().collect();
    let mut maximal = BTreeSet::new();
    for chunk in cnds_vec.chunks(INTERRUPT_CHECK_INTERVAL) {
        limits.check_interrupted()?;
        if limits.parallel {
            maximal.par_extend(chunk.par_iter().filter(|cnd| is_maximal(cnd)).copied());
        } else {
            maximal.extend(chunk.iter().filter(|cnd| is_maximal(cnd)).copied());
        }
    }
    Ok(maximal)
}

/// Check that no pair in `pairs` dominates another
///
/// Quadratic in the number of pairs; interruptions are checked once per pair.
pub fn is_antichain(
    pairs: &BTreeSet<CandidatePair>,
    limits: &EnumerationLimits,
) -> Result<bool, AlphaError> {
    for p1 in pairs {
        limits.check_interrupted()?;
        if pairs.iter().any(|p2| p1.is_dominated_by(p2)) {
            return Ok(false);
        }
    }
    Ok(true)
}
