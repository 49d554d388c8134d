use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{
    event_log::event_log_struct::Activity,
    petri_net::petri_net_struct::{ArcType, Marking, PetriNet, TransitionID},
};

use super::{
    candidate_building::{ActivitySet, CandidatePair},
    error::AlphaError,
};

/// Name of the source place (`iL`)
pub const SOURCE_PLACE: &str = "iL";
/// Name of the sink place (`oL`)
pub const SINK_PLACE: &str = "oL";

/// Escape the separators used in place names, so that names are unique per `(A, B)`
fn escape_label(label: &str) -> String {
    let mut res = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '\\' | ',' | '_') {
            res.push('\\');
        }
        res.push(c);
    }
    res
}

fn join_set(set: &ActivitySet, activities: &[Activity]) -> String {
    set.names(activities)
        .into_iter()
        .map(|a| escape_label(a))
        .join(",")
}

///
/// Canonical name of the place generated for `(A, B)`: `p_{A}_{B}`
///
/// Both sets are listed in sorted order and comma-joined, e.g., `p_a_b,c`.
/// Separator characters inside labels are escaped with `\`.
///
pub fn place_name(activities: &[Activity], pair: &CandidatePair) -> String {
    format!(
        "p_{}_{}",
        join_set(&pair.a, activities),
        join_set(&pair.b, activities)
    )
}

///
/// Construct the workflow net `(PL, TL, FL)` from the maximal pairs (YL)
///
/// * one transition per activity (TL)
/// * one place per maximal pair, with arcs from all `a` in `A` and to all `b` in `B`
/// * the source place [`SOURCE_PLACE`] with arcs to all start activities (TI)
/// * the sink place [`SINK_PLACE`] with arcs from all end activities (TO)
///
/// The source carries the initial marking, the sink the final marking.
///
pub fn synthesize_net(
    activities: &[Activity],
    yl: &BTreeSet<CandidatePair>,
    start_activities: &BTreeSet<usize>,
    end_activities: &BTreeSet<usize>,
) -> Result<PetriNet, AlphaError> {
    let mut pn = PetriNet::new();
    let transitions: Vec<TransitionID> = activities
        .iter()
        .map(|act| pn.add_transition(act.clone()))
        .collect();

    let source = pn.add_place(SOURCE_PLACE);
    let sink = pn.add_place(SINK_PLACE);

    for pair in yl {
        if pair.a.is_empty() || pair.b.is_empty() {
            return Err(AlphaError::InvariantViolation(format!(
                "maximal pair with empty side: ({:?}, {:?})",
                pair.a.names(activities),
                pair.b.names(activities)
            )));
        }
        let name = place_name(activities, pair);
        if pn.places.contains_key(&name) {
            return Err(AlphaError::InvariantViolation(format!(
                "place name {} generated twice",
                name
            )));
        }
        let place_id = pn.add_place(name);
        pair.a.iter().for_each(|in_act| {
            pn.add_arc(ArcType::transition_to_place(&transitions[in_act], &place_id))
        });
        pair.b.iter().for_each(|out_act| {
            pn.add_arc(ArcType::place_to_transition(&place_id, &transitions[out_act]))
        });
    }

    start_activities.iter().for_each(|act| {
        pn.add_arc(ArcType::place_to_transition(&source, &transitions[*act]))
    });
    end_activities.iter().for_each(|act| {
        pn.add_arc(ArcType::transition_to_place(&transitions[*act], &sink))
    });

    pn.initial_marking = Some(Marking::from([(source, 1)]));
    pn.final_markings = Some(vec![Marking::from([(sink, 1)])]);
    Ok(pn)
}
