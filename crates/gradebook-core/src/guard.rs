//! Per-client login attempt throttle.
//!
//! The guard is consulted before every login attempt and updated after it.
//! State lives only in process memory: it is created at startup, swept
//! periodically and dropped with the process.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Throttle limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    /// Consecutive failures after which further attempts are blocked.
    pub max_attempts: u32,
    /// Time after the last failure at which the failure count resets.
    pub lockout_window: Duration,
    /// Records idle for longer than this are removed by [`LoginAttemptGuard::sweep`].
    pub stale_after: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        let lockout_window = Duration::from_secs(15 * 60);
        Self {
            max_attempts: 3,
            lockout_window,
            stale_after: lockout_window * 4,
        }
    }
}

/// Outcome of [`LoginAttemptGuard::check_and_consume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// The client must wait `retry_after` before the window lapses.
    Blocked { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    failure_count: u32,
    last_attempt: Instant,
}

impl AttemptRecord {
    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.last_attempt) > window
    }
}

/// Failed-login tracker keyed by an opaque client identifier (usually the source IP).
///
/// Every operation is a single atomic update of one map entry, so concurrent
/// requests for the same identifier never lose increments.
pub struct LoginAttemptGuard {
    records: DashMap<String, AttemptRecord>,
    config: GuardConfig,
}

impl LoginAttemptGuard {
    pub fn new(config: GuardConfig) -> Self {
        tracing::info!(
            "Login guard: {} attempts per {}s window",
            config.max_attempts,
            config.lockout_window.as_secs()
        );
        Self {
            records: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Decides whether a login attempt for `identifier` may proceed.
    ///
    /// An expired record has its count reset before the decision is made.
    pub fn check_and_consume(&self, identifier: &str) -> Decision {
        self.check_and_consume_at(identifier, Instant::now())
    }

    pub fn check_and_consume_at(&self, identifier: &str, now: Instant) -> Decision {
        let Some(mut record) = self.records.get_mut(identifier) else {
            return Decision::Allowed;
        };

        let window = self.config.lockout_window;
        if record.is_expired(now, window) {
            record.failure_count = 0;
        }

        if record.failure_count >= self.config.max_attempts {
            let elapsed = now.saturating_duration_since(record.last_attempt);
            Decision::Blocked {
                retry_after: window.saturating_sub(elapsed),
            }
        } else {
            Decision::Allowed
        }
    }

    /// Counts one failed attempt and returns the new consecutive failure count.
    pub fn record_failure(&self, identifier: &str) -> u32 {
        self.record_failure_at(identifier, Instant::now())
    }

    pub fn record_failure_at(&self, identifier: &str, now: Instant) -> u32 {
        let window = self.config.lockout_window;
        let count = {
            let mut entry = self
                .records
                .entry(identifier.to_string())
                .or_insert(AttemptRecord {
                    failure_count: 0,
                    last_attempt: now,
                });
            let record = entry.value_mut();
            if record.is_expired(now, window) {
                record.failure_count = 0;
            }
            record.failure_count = record.failure_count.saturating_add(1);
            record.last_attempt = now;
            record.failure_count
        };

        if count == self.config.max_attempts {
            tracing::warn!(
                "Login lockout triggered for {identifier} ({count} consecutive failures)"
            );
        }
        count
    }

    /// Forgets all failures for `identifier` after a successful login.
    pub fn record_success(&self, identifier: &str) {
        self.records.remove(identifier);
    }

    /// Current consecutive failure count as stored (no expiry applied).
    pub fn failure_count(&self, identifier: &str) -> u32 {
        self.records
            .get(identifier)
            .map(|r| r.failure_count)
            .unwrap_or(0)
    }

    /// Removes zero-count records and records idle longer than `stale_after`.
    ///
    /// Returns the number of records removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.records.len();
        let stale_after = self.config.stale_after;
        self.records.retain(|_, record| {
            record.failure_count > 0 && !record.is_expired(now, stale_after)
        });
        let removed = before.saturating_sub(self.records.len());
        if removed > 0 {
            tracing::debug!("Login guard sweep removed {removed} records");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for LoginAttemptGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const IP: &str = "10.0.0.1";

    fn guard() -> LoginAttemptGuard {
        LoginAttemptGuard::new(GuardConfig::default())
    }

    fn mins(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn unknown_identifier_is_allowed() {
        let guard = guard();
        assert_eq!(guard.check_and_consume(IP), Decision::Allowed);
        assert_eq!(guard.failure_count(IP), 0);
        assert!(guard.is_empty());
    }

    #[test]
    fn check_does_not_create_records() {
        let guard = guard();
        guard.check_and_consume(IP);
        assert!(guard.is_empty());
    }

    #[test]
    fn blocks_after_max_failures_within_window() {
        let guard = guard();
        let t0 = Instant::now();

        for i in 0..3 {
            assert!(guard.check_and_consume_at(IP, t0 + Duration::from_secs(i * 10)).is_allowed());
            guard.record_failure_at(IP, t0 + Duration::from_secs(i * 10));
        }

        let decision = guard.check_and_consume_at(IP, t0 + Duration::from_secs(50));
        assert!(matches!(decision, Decision::Blocked { .. }));
    }

    #[test]
    fn below_limit_is_allowed() {
        let guard = guard();
        let t0 = Instant::now();
        guard.record_failure_at(IP, t0);
        guard.record_failure_at(IP, t0);

        assert!(guard.check_and_consume_at(IP, t0).is_allowed());
        assert_eq!(guard.failure_count(IP), 2);
    }

    #[test]
    fn blocked_reports_remaining_window() {
        let guard = guard();
        let t0 = Instant::now();
        for _ in 0..3 {
            guard.record_failure_at(IP, t0);
        }

        let decision = guard.check_and_consume_at(IP, t0 + mins(5));
        assert_eq!(decision, Decision::Blocked { retry_after: mins(10) });
    }

    #[test]
    fn window_expiry_allows_and_resets_count() {
        let guard = guard();
        let t0 = Instant::now();
        for _ in 0..5 {
            guard.record_failure_at(IP, t0);
        }
        assert_eq!(guard.failure_count(IP), 5);

        let later = t0 + mins(15) + Duration::from_secs(1);
        assert_eq!(guard.check_and_consume_at(IP, later), Decision::Allowed);
        assert_eq!(guard.failure_count(IP), 0);
    }

    #[test]
    fn exactly_at_window_boundary_is_still_blocked() {
        let guard = guard();
        let t0 = Instant::now();
        for _ in 0..3 {
            guard.record_failure_at(IP, t0);
        }

        let decision = guard.check_and_consume_at(IP, t0 + mins(15));
        assert_eq!(decision, Decision::Blocked { retry_after: Duration::ZERO });
    }

    #[test]
    fn failure_after_expiry_starts_new_count() {
        let guard = guard();
        let t0 = Instant::now();
        guard.record_failure_at(IP, t0);
        guard.record_failure_at(IP, t0);

        let count = guard.record_failure_at(IP, t0 + mins(20));
        assert_eq!(count, 1);
    }

    #[test]
    fn success_clears_failures() {
        let guard = guard();
        let t0 = Instant::now();
        for _ in 0..3 {
            guard.record_failure_at(IP, t0);
        }
        assert!(!guard.check_and_consume_at(IP, t0).is_allowed());

        guard.record_success(IP);

        assert_eq!(guard.failure_count(IP), 0);
        assert!(guard.check_and_consume_at(IP, t0).is_allowed());
        assert!(guard.is_empty());
    }

    #[test]
    fn identifiers_are_tracked_independently() {
        let guard = guard();
        let t0 = Instant::now();
        for _ in 0..3 {
            guard.record_failure_at(IP, t0);
        }

        assert!(!guard.check_and_consume_at(IP, t0).is_allowed());
        assert!(guard.check_and_consume_at("10.0.0.2", t0).is_allowed());
    }

    #[test]
    fn record_failure_returns_running_count() {
        let guard = guard();
        let t0 = Instant::now();
        assert_eq!(guard.record_failure_at(IP, t0), 1);
        assert_eq!(guard.record_failure_at(IP, t0), 2);
        assert_eq!(guard.record_failure_at(IP, t0), 3);
    }

    #[test]
    fn sweep_removes_stale_and_zero_records() {
        let guard = guard();
        let t0 = Instant::now();
        guard.record_failure_at("stale", t0);
        guard.record_failure_at("fresh", t0 + mins(59));
        guard.record_failure_at("reset", t0 + mins(50));

        let removed = guard.sweep(t0 + mins(61));
        assert_eq!(removed, 1);
        assert_eq!(guard.failure_count("fresh"), 1);
        assert_eq!(guard.failure_count("stale"), 0);

        // Expiry through a check leaves a zero-count record behind.
        guard.check_and_consume_at("reset", t0 + mins(70));
        assert_eq!(guard.failure_count("reset"), 0);

        let removed = guard.sweep(t0 + mins(71));
        assert_eq!(removed, 1);
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn sweep_does_not_change_decisions() {
        let guard = guard();
        let t0 = Instant::now();
        for _ in 0..3 {
            guard.record_failure_at(IP, t0);
        }
        guard.sweep(t0 + mins(1));
        assert!(!guard.check_and_consume_at(IP, t0 + mins(1)).is_allowed());
    }

    #[test]
    fn concurrent_failures_are_not_lost() {
        let config = GuardConfig {
            max_attempts: 1_000,
            ..GuardConfig::default()
        };
        let guard = Arc::new(LoginAttemptGuard::new(config));

        std::thread::scope(|s| {
            for _ in 0..8 {
                let guard = Arc::clone(&guard);
                s.spawn(move || {
                    for _ in 0..50 {
                        guard.record_failure(IP);
                    }
                });
            }
        });

        assert_eq!(guard.failure_count(IP), 400);
        assert!(guard.check_and_consume(IP).is_allowed());
    }

    #[test]
    fn default_config_matches_documented_limits() {
        let config = GuardConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.lockout_window, mins(15));
        assert_eq!(config.stale_after, mins(60));
        assert_eq!(LoginAttemptGuard::default().config(), &config);
    }
}
