use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use super::error::AlphaError;

/// Default upper bound on the number of distinct activities for candidate enumeration
pub const DEFAULT_MAX_ACTIVITIES: usize = 20;

/// Activity sets are bitmasks over `u64`; larger universes can never be enumerated
pub const MAX_SUPPORTED_ACTIVITIES: usize = 64;

/// Number of processed subsets or candidates between two cancellation/deadline checks
pub const INTERRUPT_CHECK_INTERVAL: usize = 1024;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
/// Algorithm parameters for Alpha discovery
pub struct AlphaConfig {
    /// Maximal size of the activity universe (capped at [`MAX_SUPPORTED_ACTIVITIES`])
    pub max_activities: usize,
    /// Build and prune candidate pairs on the rayon thread pool
    pub parallel: bool,
    /// Optional time budget (in milliseconds) for building (XL) and pruning (YL) candidates
    pub timeout_ms: Option<u64>,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            max_activities: DEFAULT_MAX_ACTIVITIES,
            parallel: false,
            timeout_ms: None,
        }
    }
}

impl AlphaConfig {
    /// Serialize Alpha parameters to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
    /// Deserialize Alpha parameters from JSON string
    ///
    /// Missing fields fall back to their [`Default`] values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build [`EnumerationLimits`] for one discovery run, starting the timeout clock now
    pub fn limits(&self, cancellation: CancellationToken) -> EnumerationLimits {
        EnumerationLimits {
            max_activities: self.max_activities,
            deadline: self
                .timeout_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            cancellation,
            parallel: self.parallel,
        }
    }
}

///
/// Shared flag to abort a running discovery from another thread
///
/// Cloning yields a handle to the same flag.
///
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a new (not cancelled) token
    pub fn new() -> Self {
        Self::default()
    }
    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
/// Bounds for the (exponential) candidate enumeration and pruning
pub struct EnumerationLimits {
    /// Maximal size of the activity universe
    pub max_activities: usize,
    /// Point in time after which candidate building or pruning is aborted
    pub deadline: Option<Instant>,
    /// Cancellation flag checked periodically while building and pruning candidates
    pub cancellation: CancellationToken,
    /// Build and prune on the rayon thread pool
    pub parallel: bool,
}

impl EnumerationLimits {
    /// Limits with only an upper bound on the activity universe
    pub fn with_max_activities(max_activities: usize) -> Self {
        Self {
            max_activities,
            deadline: None,
            cancellation: CancellationToken::new(),
            parallel: false,
        }
    }

    /// Effective bound (never above [`MAX_SUPPORTED_ACTIVITIES`])
    pub fn effective_max_activities(&self) -> usize {
        self.max_activities.min(MAX_SUPPORTED_ACTIVITIES)
    }

    /// Fail if the universe of `activities` activities may not be enumerated
    pub fn check_universe(&self, activities: usize) -> Result<(), AlphaError> {
        let max_activities = self.effective_max_activities();
        if activities > max_activities {
            return Err(AlphaError::ResourceLimit {
                activities,
                max_activities,
            });
        }
        Ok(())
    }

    /// Fail if enumeration was cancelled or ran past its deadline
    pub fn check_interrupted(&self) -> Result<(), AlphaError> {
        if self.cancellation.is_cancelled() {
            return Err(AlphaError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(AlphaError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_json_defaults() {
        let cfg = AlphaConfig::from_json(r#"{"parallel": true}"#).unwrap();
        assert_eq!(
            cfg,
            AlphaConfig {
                max_activities: DEFAULT_MAX_ACTIVITIES,
                parallel: true,
                timeout_ms: None
            }
        );
        assert_eq!(AlphaConfig::from_json(&cfg.to_json()).unwrap(), cfg);
        assert!(AlphaConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn limits_report_interruptions() {
        let token = CancellationToken::new();
        let limits = AlphaConfig::default().limits(token.clone());
        assert_eq!(limits.check_interrupted(), Ok(()));
        token.cancel();
        assert_eq!(limits.check_interrupted(), Err(AlphaError::Cancelled));

        let expired = AlphaConfig {
            timeout_ms: Some(0),
            ..Default::default()
        }
        .limits(CancellationToken::new());
        assert_eq!(expired.check_interrupted(), Err(AlphaError::DeadlineExceeded));
    }

    #[test]
    fn universe_bound_is_capped() {
        let limits = EnumerationLimits::with_max_activities(1000);
        assert_eq!(limits.effective_max_activities(), MAX_SUPPORTED_ACTIVITIES);
        assert!(limits.check_universe(64).is_ok());
        assert_eq!(
            limits.check_universe(65),
            Err(AlphaError::ResourceLimit {
                activities: 65,
                max_activities: 64
            })
        );
    }
}
