use std::time::Instant;

use serde::Serialize;

use crate::{
    event_log::{activity_projection::EventLogActivityProjection, EventLog},
    petri_net::petri_net_struct::PetriNet,
};

use super::{
    candidate_building::build_candidates,
    candidate_pruning::{is_antichain, select_maximal_pairs},
    config::{AlphaConfig, CancellationToken},
    error::AlphaError,
    footprint::Footprint,
    net_synthesis::synthesize_net,
    report::AlphaReport,
};

#[derive(Debug, Clone, Serialize)]
/// Result of Alpha discovery: the discovered net and the intermediate steps leading to it
pub struct AlphaResult {
    /// Discovered workflow net
    pub net: PetriNet,
    /// Intermediate results (footprint, TL, TI, TO, XL, YL, PL, FL)
    pub report: AlphaReport,
}

///
/// Discover a [`PetriNet`] using the Alpha algorithm
///
/// Additionally returns an [`AlphaReport`] with all intermediate results
///
pub fn alpha_discover_petri_net(
    log: &EventLog,
    config: &AlphaConfig,
) -> Result<AlphaResult, AlphaError> {
    alpha_discover_petri_net_with_cancellation(log, config, CancellationToken::new())
}

/// Run Alpha discovery
///
/// Building and pruning of candidates can be aborted through the passed [`CancellationToken`]
pub fn alpha_discover_petri_net_with_cancellation(
    log: &EventLog,
    config: &AlphaConfig,
    cancellation: CancellationToken,
) -> Result<AlphaResult, AlphaError> {
    log::info!("Started Alpha Discovery");
    let total_start = Instant::now();
    let limits = config.limits(cancellation);

    let log_proj = EventLogActivityProjection::from(log);
    let footprint = Footprint::from_projection(&log_proj);
    footprint.check_symmetry()?;
    let start_activities = log_proj.start_activities();
    let end_activities = log_proj.end_activities();
    log::info!(
        "#Activities: {}, #Variants: {}, #Directly-follows pairs: {}",
        footprint.len(),
        log_proj.traces.len(),
        footprint.directly_follows_pairs().len()
    );

    let mut start = Instant::now();
    let xl = build_candidates(&footprint, &limits)?;
    log::info!("Built candidates (XL): {}", xl.len());
    log::debug!("Building candidates took: {:.4}s", start.elapsed().as_secs_f32());

    start = Instant::now();
    let yl = select_maximal_pairs(&xl, &limits)?;
    if !is_antichain(&yl, &limits)? {
        return Err(AlphaError::InvariantViolation(
            "selected pairs are not pairwise maximal".to_string(),
        ));
    }
    log::info!("Maximal candidates (YL): {}", yl.len());
    log::debug!("Selecting maximal pairs took: {:.4}s", start.elapsed().as_secs_f32());

    start = Instant::now();
    let net = synthesize_net(
        footprint.activities(),
        &yl,
        &start_activities,
        &end_activities,
    )?;
    net.check_boundary()?;
    log::debug!("Building PN took: {:.4}s", start.elapsed().as_secs_f32());

    let report = AlphaReport::new(
        footprint.relation_table(),
        footprint.activities(),
        &start_activities,
        &end_activities,
        &xl,
        &yl,
        &net,
    );
    log::info!(
        "Whole Discovery took: {:.4}s ({} places, {} transitions, {} arcs)",
        total_start.elapsed().as_secs_f32(),
        net.places.len(),
        net.transitions.len(),
        net.arcs.len()
    );
    Ok(AlphaResult { net, report })
}
