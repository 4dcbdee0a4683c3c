use std::time::Duration;

use atelier_core::annotation::DEFAULT_MIN_DRAG;

use crate::promotion::PromotionPolicy;

/// Default artificial delay of the simulated strategy.
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(3_000);

/// Default upper bound on one live generation call.
pub const DEFAULT_LIVE_TIMEOUT: Duration = Duration::from_secs(120);

/// Engine tuning loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a simulated revision takes before its draft is staged.
    pub simulated_delay: Duration,
    /// Minimum normalized width or height of an annotation drag.
    pub min_drag: f64,
    /// Which notes a promotion resolves.
    pub promotion_policy: PromotionPolicy,
    /// Upper bound on one live generation call.
    pub live_timeout: Duration,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var              | Default       |
    /// |----------------------|---------------|
    /// | `SIMULATED_DELAY_MS` | `3000`        |
    /// | `MIN_DRAG_THRESHOLD` | `0.004`       |
    /// | `PROMOTION_POLICY`   | `resolve_all` |
    /// | `LIVE_TIMEOUT_SECS`  | `120`         |
    pub fn from_env() -> Self {
        let simulated_delay_ms: u64 = std::env::var("SIMULATED_DELAY_MS")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("SIMULATED_DELAY_MS must be a valid u64");

        let min_drag: f64 = std::env::var("MIN_DRAG_THRESHOLD")
            .unwrap_or_else(|_| DEFAULT_MIN_DRAG.to_string())
            .parse()
            .expect("MIN_DRAG_THRESHOLD must be a valid f64");

        let promotion_policy: PromotionPolicy = std::env::var("PROMOTION_POLICY")
            .unwrap_or_else(|_| "resolve_all".into())
            .parse()
            .expect("PROMOTION_POLICY must be resolve_all or resolve_submitted");

        let live_timeout_secs: u64 = std::env::var("LIVE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("LIVE_TIMEOUT_SECS must be a valid u64");

        Self {
            simulated_delay: Duration::from_millis(simulated_delay_ms),
            min_drag,
            promotion_policy,
            live_timeout: Duration::from_secs(live_timeout_secs),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulated_delay: DEFAULT_SIMULATED_DELAY,
            min_drag: DEFAULT_MIN_DRAG,
            promotion_policy: PromotionPolicy::default(),
            live_timeout: DEFAULT_LIVE_TIMEOUT,
        }
    }
}
