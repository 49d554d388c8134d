use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::alpha::error::AlphaError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Place in a Petri net
pub struct Place {
    name: String,
}

impl Place {
    /// Canonical name of the place
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Transition in a Petri net (labelled with an activity)
pub struct Transition {
    /// Transition label
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a Petri net
pub enum ArcType {
    /// From Place to Transition
    PlaceTransition(String, String),
    /// From Transition to Place
    TransitionPlace(String, String),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: &PlaceID, to: &TransitionID) -> ArcType {
        ArcType::PlaceTransition(from.0.clone(), to.0.clone())
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: &TransitionID, to: &PlaceID) -> ArcType {
        ArcType::TransitionPlace(from.0.clone(), to.0.clone())
    }
    /// Source and target node names
    pub fn endpoints(&self) -> (&str, &str) {
        match self {
            ArcType::PlaceTransition(from, to) | ArcType::TransitionPlace(from, to) => {
                (from.as_str(), to.as_str())
            }
        }
    }
}

impl std::fmt::Display for ArcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (from, to) = self.endpoints();
        write!(f, "({}, {})", from, to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
///
/// Arc in a Petri net
///
/// Connecting a transition and a place (or the other way around)
pub struct Arc {
    /// Source and target of Arc
    pub from_to: ArcType,
    /// Weight (i.e., how many tokens this arc moves)
    pub weight: u32,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Eq, Hash, PartialOrd, Ord)]
/// Place ID (the canonical place name)
pub struct PlaceID(pub String);
impl From<&Place> for PlaceID {
    fn from(value: &Place) -> Self {
        PlaceID(value.name.clone())
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Eq, Hash, PartialOrd, Ord)]
/// Transition ID (the activity label)
pub struct TransitionID(pub String);

/// Marking of a Petri net: Assigning [`PlaceID`]s to a number of tokens
pub type Marking = BTreeMap<PlaceID, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
///
/// A Petri net of [`Place`]s and [`Transition`]s
///
/// Bipartite graph of [`Place`]s and [`Transition`]s with [`Arc`]s connecting them, as well as initial and final [`Marking`]s.
/// Nodes are identified by name, so iteration order (and serialization) is deterministic.
pub struct PetriNet {
    /// Places
    pub places: BTreeMap<String, Place>,
    /// Transitions
    pub transitions: BTreeMap<String, Transition>,
    /// Arcs
    pub arcs: Vec<Arc>,
    /// Initial marking
    pub initial_marking: Option<Marking>,
    /// Final markings (any of them are accepted as a final marking)
    pub final_markings: Option<Vec<Marking>>,
}

impl Default for PetriNet {
    fn default() -> Self {
        Self::new()
    }
}
impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self {
            places: BTreeMap::new(),
            transitions: BTreeMap::new(),
            arcs: Vec::new(),
            initial_marking: None,
            final_markings: None,
        }
    }
    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
    /// Add a place with the given name
    ///
    /// Adding a place twice keeps the existing place
    pub fn add_place(&mut self, name: impl Into<String>) -> PlaceID {
        let name = name.into();
        self.places
            .entry(name.clone())
            .or_insert_with(|| Place { name: name.clone() });
        PlaceID(name)
    }

    /// Add a transition with a label
    ///
    /// Adding a transition twice keeps the existing transition
    pub fn add_transition(&mut self, label: impl Into<String>) -> TransitionID {
        let label = label.into();
        self.transitions
            .entry(label.clone())
            .or_insert_with(|| Transition {
                label: label.clone(),
            });
        TransitionID(label)
    }
    /// Add an arc (moving one token)
    pub fn add_arc(&mut self, from_to: ArcType) {
        self.arcs.push(Arc { from_to, weight: 1 });
    }

    /// Get the preset of a [`PetriNet`] place
    pub fn preset_of_place(&self, p: &PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::TransitionPlace(from, to) if to == &p.0 => {
                    Some(TransitionID(from.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Get the preset of [`PetriNet`] transition
    pub fn preset_of_transition(&self, t: &TransitionID) -> Vec<PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::PlaceTransition(from, to) if to == &t.0 => Some(PlaceID(from.clone())),
                _ => None,
            })
            .collect()
    }

    /// Get postset of [`PetriNet`] place
    pub fn postset_of_place(&self, p: &PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::PlaceTransition(from, to) if from == &p.0 => {
                    Some(TransitionID(to.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Get postset of [`PetriNet`] transition
    pub fn postset_of_transition(&self, t: &TransitionID) -> Vec<PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::TransitionPlace(from, to) if from == &t.0 => Some(PlaceID(to.clone())),
                _ => None,
            })
            .collect()
    }

    /// Check if place is in initial marking
    pub fn is_in_initial_marking(&self, p: &PlaceID) -> bool {
        self.initial_marking
            .as_ref()
            .is_some_and(|m| m.contains_key(p))
    }

    /// Check if place is in _any_ final marking
    pub fn is_in_a_final_marking(&self, p: &PlaceID) -> bool {
        self.final_markings
            .as_ref()
            .is_some_and(|ms| ms.iter().any(|m| m.contains_key(p)))
    }

    /// Source place of a workflow net: the single place of the initial marking
    pub fn source_place(&self) -> Option<&PlaceID> {
        single_place(self.initial_marking.as_ref()?)
    }

    /// Sink place of a workflow net: the single place of the (first) final marking
    pub fn sink_place(&self) -> Option<&PlaceID> {
        single_place(self.final_markings.as_ref()?.first()?)
    }

    /// All arcs (FL), sorted
    ///
    /// Arcs keep their direction, so a transition labelled like a place (e.g., `iL`) stays
    /// distinguishable from that place.
    pub fn arc_list(&self) -> Vec<ArcType> {
        let mut arcs: Vec<ArcType> = self.arcs.iter().map(|arc| arc.from_to.clone()).collect();
        arcs.sort();
        arcs
    }

    ///
    /// Check the boundary invariant of a workflow net
    ///
    /// * There is a source place that has only outgoing arcs
    /// * There is a sink place that has only incoming arcs
    /// * Every other place has at least one incoming and one outgoing arc
    /// * Every arc connects existing nodes
    ///
    pub fn check_boundary(&self) -> Result<(), AlphaError> {
        let violation = |msg: String| Err(AlphaError::InvariantViolation(msg));
        for arc in &self.arcs {
            let (place, transition) = match &arc.from_to {
                ArcType::PlaceTransition(p, t) | ArcType::TransitionPlace(t, p) => (p, t),
            };
            if !self.places.contains_key(place) || !self.transitions.contains_key(transition) {
                return violation(format!("arc {:?} references an unknown node", arc.from_to));
            }
        }
        let Some(source) = self.source_place() else {
            return violation("net has no unique source place".to_string());
        };
        let Some(sink) = self.sink_place() else {
            return violation("net has no unique sink place".to_string());
        };
        for place in self.places.values() {
            let id: PlaceID = place.into();
            let (preset, postset) = (self.preset_of_place(&id), self.postset_of_place(&id));
            if &id == source {
                if !preset.is_empty() {
                    return violation(format!("source place {} has incoming arcs", id.0));
                }
            } else if &id == sink {
                if !postset.is_empty() {
                    return violation(format!("sink place {} has outgoing arcs", id.0));
                }
            } else if preset.is_empty() || postset.is_empty() {
                return violation(format!(
                    "place {} needs at least one incoming and one outgoing arc",
                    id.0
                ));
            }
        }
        Ok(())
    }
}

fn single_place(marking: &Marking) -> Option<&PlaceID> {
    if marking.len() == 1 {
        marking.keys().next()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow_net() -> PetriNet {
        let mut net = PetriNet::new();
        let i = net.add_place("iL");
        let o = net.add_place("oL");
        let p = net.add_place("p_a_b");
        let a = net.add_transition("a");
        let b = net.add_transition("b");
        net.add_arc(ArcType::place_to_transition(&i, &a));
        net.add_arc(ArcType::transition_to_place(&a, &p));
        net.add_arc(ArcType::place_to_transition(&p, &b));
        net.add_arc(ArcType::transition_to_place(&b, &o));
        net.initial_marking = Some(Marking::from([(i, 1)]));
        net.final_markings = Some(vec![Marking::from([(o, 1)])]);
        net
    }

    #[test]
    fn petri_nets() {
        let mut net = PetriNet::new();
        let p1 = net.add_place("p1");
        let t1 = net.add_transition("Have fun");
        let t2 = net.add_transition("Sleep");
        net.add_arc(ArcType::place_to_transition(&p1, &t1));
        net.add_arc(ArcType::transition_to_place(&t2, &p1));

        assert!(net.postset_of_transition(&t1).is_empty());
        assert!(net.preset_of_transition(&t1) == vec![p1.clone()]);
        assert!(net.postset_of_place(&p1) == vec![t1.clone()]);
        assert!(net.preset_of_place(&p1) == vec![t2.clone()]);
        assert!(net.preset_of_transition(&t2).is_empty());
        assert!(net.arcs.iter().all(|arc| arc.weight == 1));
    }

    #[test]
    fn adding_nodes_twice_is_idempotent() {
        let mut net = PetriNet::new();
        net.add_place("p");
        net.add_place("p");
        net.add_transition("t");
        net.add_transition("t");
        assert_eq!(net.places.len(), 1);
        assert_eq!(net.transitions.len(), 1);
    }

    #[test]
    fn boundary_of_workflow_net() {
        let net = workflow_net();
        assert_eq!(net.source_place(), Some(&PlaceID("iL".into())));
        assert_eq!(net.sink_place(), Some(&PlaceID("oL".into())));
        assert!(net.is_in_initial_marking(&PlaceID("iL".into())));
        assert!(net.is_in_a_final_marking(&PlaceID("oL".into())));
        assert_eq!(net.check_boundary(), Ok(()));
        assert_eq!(
            net.arc_list(),
            vec![
                ArcType::PlaceTransition("iL".into(), "a".into()),
                ArcType::PlaceTransition("p_a_b".into(), "b".into()),
                ArcType::TransitionPlace("a".into(), "p_a_b".into()),
                ArcType::TransitionPlace("b".into(), "oL".into()),
            ]
        );
        assert_eq!(net.arc_list()[0].to_string(), "(iL, a)");
    }

    #[test]
    fn arcs_keep_direction_for_shadowed_names() {
        let mut net = PetriNet::new();
        let i = net.add_place("iL");
        let o = net.add_place("oL");
        let t_i = net.add_transition("iL");
        let t_o = net.add_transition("oL");
        net.add_arc(ArcType::place_to_transition(&i, &t_i));
        net.add_arc(ArcType::transition_to_place(&t_o, &o));
        assert_eq!(
            net.arc_list(),
            vec![
                ArcType::PlaceTransition("iL".into(), "iL".into()),
                ArcType::TransitionPlace("oL".into(), "oL".into()),
            ]
        );
    }

    #[test]
    fn boundary_violations() {
        let mut dangling = workflow_net();
        dangling.add_place("p_dangling");
        assert!(dangling.check_boundary().unwrap_err().is_internal());

        let mut source_with_input = workflow_net();
        source_with_input.add_arc(ArcType::transition_to_place(
            &TransitionID("b".into()),
            &PlaceID("iL".into()),
        ));
        assert!(source_with_input.check_boundary().is_err());

        let mut unknown_node = workflow_net();
        unknown_node.add_arc(ArcType::transition_to_place(
            &TransitionID("zz".into()),
            &PlaceID("p_a_b".into()),
        ));
        assert!(unknown_node.check_boundary().is_err());

        let mut no_source = workflow_net();
        no_source.initial_marking = None;
        assert!(no_source.check_boundary().is_err());
    }

    #[test]
    fn json_roundtrip() {
        let net = workflow_net();
        let parsed = PetriNet::from_json(&net.to_json()).unwrap();
        assert_eq!(parsed, net);
    }
}
