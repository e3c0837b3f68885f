//! Fallback-chain metrics.

use std::time::Duration;

use serde::Serialize;

/// How a single backend attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum AttemptOutcome {
    /// The backend served the request.
    Served,
    /// The backend is not configured.
    NotConfigured(String),
    /// The backend failed (provider, network or timeout).
    Failed(String),
}

impl AttemptOutcome {
    pub fn is_served(&self) -> bool {
        matches!(self, AttemptOutcome::Served)
    }
}

/// Metrics for one backend attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// Backend name.
    pub backend: String,
    pub outcome: AttemptOutcome,
    /// Attempt duration (microseconds).
    pub duration_us: u64,
}

/// Ordered record of every backend attempted for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FallbackTrace {
    pub attempts: Vec<AttemptRecord>,
}

impl FallbackTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt.
    pub fn record(&mut self, backend: &str, outcome: AttemptOutcome, duration: Duration) {
        self.attempts.push(AttemptRecord {
            backend: backend.to_string(),
            outcome,
            duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        });
    }

    /// Name of the backend that served the request, if any did.
    pub fn served_by(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.outcome.is_served())
            .map(|a| a.backend.as_str())
    }

    /// Number of failed or skipped attempts before the serving one.
    pub fn fallbacks(&self) -> usize {
        self.attempts.iter().filter(|a| !a.outcome.is_served()).count()
    }

    /// Total time spent across attempts (microseconds).
    pub fn total_us(&self) -> u64 {
        self.attempts.iter().map(|a| a.duration_us).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_summary() {
        let mut trace = FallbackTrace::new();
        trace.record(
            "elasticsearch",
            AttemptOutcome::Failed("timeout".into()),
            Duration::from_millis(500),
        );
        trace.record("algolia", AttemptOutcome::Served, Duration::from_millis(40));

        assert_eq!(trace.served_by(), Some("algolia"));
        assert_eq!(trace.fallbacks(), 1);
        assert_eq!(trace.total_us(), 540_000);
    }

    #[test]
    fn test_trace_json() {
        let mut trace = FallbackTrace::new();
        trace.record("relational", AttemptOutcome::Served, Duration::from_micros(12));
        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"backend\":\"relational\""));
        assert!(json.contains("\"kind\":\"served\""));
    }
}
