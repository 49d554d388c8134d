use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    event_log::event_log_struct::Activity,
    petri_net::petri_net_struct::{ArcType, PetriNet},
};

use super::{candidate_building::CandidatePair, footprint::RelationTable};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
/// Pair of activity sets `(A, B)`, by label
pub struct NamedPair {
    /// Input activities (sorted)
    pub a: Vec<Activity>,
    /// Output activities (sorted)
    pub b: Vec<Activity>,
}

impl NamedPair {
    /// Resolve a [`CandidatePair`] against the (sorted) activity universe
    pub fn from_pair(activities: &[Activity], pair: &CandidatePair) -> Self {
        Self {
            a: pair.a.names(activities).into_iter().cloned().collect(),
            b: pair.b.names(activities).into_iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for NamedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", format_set(&self.a), format_set(&self.b))
    }
}

fn format_set<S: std::fmt::Display>(items: &[S]) -> String {
    format!("{{{}}}", items.iter().join(", "))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One labelled section of the textual report
pub struct ReportSection {
    /// Section heading
    pub label: String,
    /// Section body (may span multiple lines)
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
///
/// Intermediate results of one Alpha discovery run
///
/// All values are taken from the discovery steps themselves, in their order of computation.
///
pub struct AlphaReport {
    /// Footprint matrix
    pub relation_table: RelationTable,
    /// TL: all transitions (activities)
    pub tl: Vec<Activity>,
    /// TI: activities starting a trace
    pub ti: Vec<Activity>,
    /// TO: activities ending a trace
    pub to: Vec<Activity>,
    /// XL: all place candidates
    pub xl: Vec<NamedPair>,
    /// YL: maximal place candidates
    pub yl: Vec<NamedPair>,
    /// PL: place names
    pub pl: Vec<String>,
    /// FL: arcs, tagged as place → transition or transition → place
    pub fl: Vec<ArcType>,
}

impl AlphaReport {
    /// Assemble the report from the results of the individual steps
    pub fn new(
        relation_table: RelationTable,
        activities: &[Activity],
        start_activities: &BTreeSet<usize>,
        end_activities: &BTreeSet<usize>,
        xl: &BTreeSet<CandidatePair>,
        yl: &BTreeSet<CandidatePair>,
        net: &PetriNet,
    ) -> Self {
        let names = |acts: &BTreeSet<usize>| -> Vec<Activity> {
            acts.iter().map(|i| activities[*i].clone()).collect()
        };
        let named_pairs = |pairs: &BTreeSet<CandidatePair>| -> Vec<NamedPair> {
            pairs
                .iter()
                .map(|p| NamedPair::from_pair(activities, p))
                .sorted()
                .collect()
        };
        Self {
            relation_table,
            tl: activities.to_vec(),
            ti: names(start_activities),
            to: names(end_activities),
            xl: named_pairs(xl),
            yl: named_pairs(yl),
            pl: net.places.keys().cloned().collect(),
            fl: net.arc_list(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// All report sections in order: relation table, TL, TI, TO, XL, YL, PL, FL and the resulting net
    ///
    /// In the text, arcs are written as `(source, target)`. An activity labelled like a place
    /// (e.g., `iL`) is only told apart from that place by [`AlphaReport::fl`].
    pub fn sections(&self) -> Vec<ReportSection> {
        let section = |label: &str, content: String| ReportSection {
            label: label.to_string(),
            content,
        };
        let pairs = |pairs: &[NamedPair]| pairs.iter().map(|p| format!("{}\n", p)).join("");
        let arcs = format_set(&self.fl);
        vec![
            section("Relation table", self.relation_table.to_string()),
            section("Step 1: TL (transitions)", format_set(&self.tl)),
            section("Step 2: TI (initial transitions)", format_set(&self.ti)),
            section("Step 3: TO (final transitions)", format_set(&self.to)),
            section("Step 4: XL (pairs (A, B) before filtering)", pairs(&self.xl)),
            section("Step 5: YL (maximal pairs)", pairs(&self.yl)),
            section("Step 6: PL (places)", format_set(&self.pl)),
            section("Step 7: FL (arcs)", arcs.clone()),
            section(
                "Step 8: α(L) = (PL, TL, FL)",
                format!(
                    "Places (P): {}\nTransitions (T): {}\nArcs (F): {}",
                    format_set(&self.pl),
                    format_set(&self.tl),
                    arcs
                ),
            ),
        ]
    }
}

impl std::fmt::Display for AlphaReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "===== Alpha Algorithm =====")?;
        for s in self.sections() {
            writeln!(f)?;
            writeln!(f, "{}:", s.label)?;
            writeln!(f, "{}", s.content.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_pair_display() {
        let pair = NamedPair {
            a: vec!["a".into()],
            b: vec!["b".into(), "c".into()],
        };
        assert_eq!(pair.to_string(), "({a}, {b, c})");
        assert_eq!(format_set::<String>(&[]), "{}");
    }
}
