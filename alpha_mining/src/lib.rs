#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Event Logs ([`EventLog`]) and their textual notation
///
pub mod event_log {
    /// Activity projection of event logs
    pub mod activity_projection;
    /// [`EventLog`] and [`Trace`] structs
    pub mod event_log_struct;
    /// Parser for the angle-bracket trace notation (`<a,b,c>,<a,c,b>`)
    pub mod import_trace_text;
    /// Macros for the creation of [`EventLog`]s
    pub mod macros;

    pub use event_log_struct::{Activity, EventLog, EventLogError, Trace};
}

///
/// Petri nets
///
pub mod petri_net {
    /// [`PetriNet`] struct
    pub mod petri_net_struct;

    #[doc(inline)]
    pub use petri_net_struct::PetriNet;
}

///
/// Module for the Alpha Process Discovery algorithm
///
pub mod alpha {
    /// Alpha Place Candidate Building (XL)
    pub mod candidate_building;
    /// Alpha Place Candidate Pruning (YL)
    pub mod candidate_pruning;
    /// Algorithm parameters and enumeration limits
    pub mod config;
    /// Errors raised during discovery
    pub mod error;
    /// Footprint (relations between activities)
    pub mod footprint;
    /// Full Alpha Discovery algorithm
    pub mod full;
    /// Construction of the workflow net (PL, FL)
    pub mod net_synthesis;
    /// Step-by-step report of a discovery run
    pub mod report;
    #[cfg(test)]
    mod tests;
}

#[doc(inline)]
pub use alpha::full::alpha_discover_petri_net;

#[doc(inline)]
pub use alpha::full::alpha_discover_petri_net_with_cancellation;

#[doc(inline)]
pub use alpha::full::AlphaResult;

#[doc(inline)]
pub use alpha::config::{AlphaConfig, CancellationToken, EnumerationLimits};

#[doc(inline)]
pub use alpha::error::AlphaError;

#[doc(inline)]
pub use alpha::report::AlphaReport;

#[doc(inline)]
pub use event_log::event_log_struct::EventLog;

#[doc(inline)]
pub use event_log::import_trace_text::parse_event_log;

#[doc(inline)]
pub use event_log::import_trace_text::TraceParseError;

#[doc(inline)]
pub use petri_net::petri_net_struct::PetriNet;

///
/// Serialize a [`PetriNet`] as a JSON [`String`]
///
pub fn petrinet_to_json(net: &PetriNet) -> String {
    net.to_json()
}
///
/// Deserialize a [`PetriNet`] from a JSON [`String`]
///
pub fn json_to_petrinet(net_json: &str) -> Result<PetriNet, serde_json::Error> {
    PetriNet::from_json(net_json)
}
