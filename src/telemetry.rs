//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: provider name (e.g. "openai", "ollama")
//! - `outcome`: "ok" or an error kind from [`MimirError::kind`](crate::MimirError::kind)

/// Total diagnosis attempts, including refused ones.
///
/// Labels: `outcome`.
pub const ATTEMPTS_TOTAL: &str = "mimir_attempts_total";

/// Provider call duration in seconds.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const PROVIDER_DURATION_SECONDS: &str = "mimir_provider_duration_seconds";

/// Attempts refused because the session quota was used up.
pub const QUOTA_REJECTIONS_TOTAL: &str = "mimir_quota_rejections_total";
