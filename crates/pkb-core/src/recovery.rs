//! Session recovery after a failed authenticated fetch.
//!
//! `Normal -> Recovering -> {Recovered, Expired}`. Both terminal states are
//! resolved by a full client reload, which starts a new machine at `Normal`.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryState {
    #[default]
    Normal,
    /// Waiting for the user to trigger a retry.
    Recovering { reason: String },
    /// Refresh succeeded; a reload is pending.
    Recovered,
    /// Refresh failed; the token was cleared and the user must acknowledge.
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct SessionRecovery {
    state: RecoveryState,
}

impl SessionRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &RecoveryState {
        &self.state
    }

    pub const fn is_normal(&self) -> bool {
        matches!(self.state, RecoveryState::Normal)
    }

    pub const fn is_recovering(&self) -> bool {
        matches!(self.state, RecoveryState::Recovering { .. })
    }

    /// Enter `Recovering` after an authenticated call failed. Returns `false`
    /// if the machine was not in `Normal`.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if !self.is_normal() {
            return false;
        }
        let reason = reason.into();
        tracing::warn!("Session check failed, awaiting retry: {}", reason);
        self.state = RecoveryState::Recovering { reason };
        true
    }

    /// Record the outcome of the user-triggered refresh. Ignored unless
    /// `Recovering`.
    pub fn refreshed(&mut self, succeeded: bool) -> bool {
        if !self.is_recovering() {
            return false;
        }
        self.state = if succeeded {
            tracing::info!("Session refreshed");
            RecoveryState::Recovered
        } else {
            tracing::warn!("Session refresh failed; session expired");
            RecoveryState::Expired
        };
        true
    }

    /// A retry ended without a verdict on the session (server unreachable,
    /// token not stored). Stays `Recovering` with the new reason.
    pub fn retry_failed(&mut self, reason: impl Into<String>) -> bool {
        let RecoveryState::Recovering { reason: current } = &mut self.state else {
            return false;
        };
        *current = reason.into();
        tracing::warn!("Session refresh did not complete: {}", current);
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn failure_then_successful_refresh() {
        let mut recovery = SessionRecovery::new();
        assert!(recovery.fail("HTTP 401"));
        assert_eq!(
            recovery.state(),
            &RecoveryState::Recovering {
                reason: "HTTP 401".to_string()
            }
        );
        assert!(recovery.refreshed(true));
        assert_eq!(recovery.state(), &RecoveryState::Recovered);
    }

    #[test]
    fn failure_then_failed_refresh_expires() {
        let mut recovery = SessionRecovery::new();
        recovery.fail("HTTP 401");
        recovery.refreshed(false);
        assert_eq!(recovery.state(), &RecoveryState::Expired);
    }

    #[test]
    fn refresh_outcome_ignored_when_not_recovering() {
        let mut recovery = SessionRecovery::new();
        assert!(!recovery.refreshed(true));
        assert!(recovery.is_normal());
    }

    #[test]
    fn inconclusive_retry_stays_recovering() {
        let mut recovery = SessionRecovery::new();
        assert!(!recovery.retry_failed("offline"));
        assert!(recovery.is_normal());

        recovery.fail("HTTP 401");
        assert!(recovery.retry_failed("offline"));
        assert_eq!(
            recovery.state(),
            &RecoveryState::Recovering {
                reason: "offline".to_string()
            }
        );
        assert!(recovery.refreshed(true));
    }

    #[test]
    fn second_failure_does_not_restart_recovery() {
        let mut recovery = SessionRecovery::new();
        recovery.fail("first");
        assert!(!recovery.fail("second"));
        assert_eq!(
            recovery.state(),
            &RecoveryState::Recovering {
                reason: "first".to_string()
            }
        );
    }
}
