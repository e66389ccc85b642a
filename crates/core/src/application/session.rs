// Session/Connectivity Policy - decides which connect/token jobs to submit.
//
// Pure policy driven by observed results, deliberately decoupled from the
// execution engine: `check_and_retry` returns the job kinds that are due and
// the caller submits them. Never forces a UI-visible error state.

use tracing::{info, warn};

use super::constants::{
    CONNECT_RETRY_INTERVAL_MS, MAX_TOKEN_ATTEMPTS, TOKEN_RETRY_INTERVAL_MS,
};
use super::interval_elapsed;
use crate::domain::{JobKind, JobResult, ResultPayload, SessionToken};

/// Connectivity + token acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    ConnectedNoToken,
    ConnectedHasToken,
}

pub struct SessionPolicy {
    state: SessionState,
    token: SessionToken,
    address: String,
    last_connect_attempt: Option<i64>,
    last_token_attempt: Option<i64>,
    token_attempts: u32,
    token_retries_exhausted: bool,
}

impl SessionPolicy {
    pub fn new() -> Self {
        Self {
            state: SessionState::Disconnected,
            token: SessionToken::default(),
            address: String::new(),
            last_connect_attempt: None,
            last_token_attempt: None,
            token_attempts: 0,
            token_retries_exhausted: false,
        }
    }

    /// Called once per control-loop tick. Returns the jobs that are due.
    pub fn check_and_retry(&mut self, now: i64) -> Vec<JobKind> {
        let mut due = Vec::new();
        match self.state {
            SessionState::Disconnected => {
                if interval_elapsed(self.last_connect_attempt, now, CONNECT_RETRY_INTERVAL_MS) {
                    self.last_connect_attempt = Some(now);
                    due.push(JobKind::Connect);
                }
            }
            SessionState::ConnectedNoToken => {
                if self.token_attempts >= MAX_TOKEN_ATTEMPTS {
                    if !self.token_retries_exhausted {
                        self.token_retries_exhausted = true;
                        warn!(
                            attempts = self.token_attempts,
                            "giving up on session token until reconnect, \
                             transport-only polling remains available"
                        );
                    }
                } else if interval_elapsed(self.last_token_attempt, now, TOKEN_RETRY_INTERVAL_MS) {
                    self.last_token_attempt = Some(now);
                    self.token_attempts += 1;
                    due.push(JobKind::GetSessionToken);
                }
            }
            SessionState::ConnectedHasToken => {}
        }
        due
    }

    /// Feed one completed job result into the policy.
    pub fn observe(&mut self, result: &JobResult) {
        match &result.payload {
            ResultPayload::Connect { connected, address } => {
                if result.success && *connected {
                    info!(address = %address, "connected to DAW");
                    self.address = address.clone();
                    self.token_attempts = 0;
                    self.last_token_attempt = None;
                    self.token_retries_exhausted = false;
                    // A token cached from an earlier session stays valid.
                    self.state = if self.token.is_acquired() {
                        SessionState::ConnectedHasToken
                    } else {
                        SessionState::ConnectedNoToken
                    };
                } else {
                    if self.state != SessionState::Disconnected {
                        warn!("connection to DAW lost");
                    }
                    self.state = SessionState::Disconnected;
                }
            }
            ResultPayload::SessionToken { token } => {
                if result.success && token.is_acquired() {
                    if self.token.is_acquired() && token != &self.token {
                        info!(token = %token, "session token changed");
                    } else if !self.token.is_acquired() {
                        info!(token = %token, "session token acquired");
                    }
                    self.token = token.clone();
                    self.token_attempts = 0;
                    self.token_retries_exhausted = false;
                    if self.state != SessionState::Disconnected {
                        self.state = SessionState::ConnectedHasToken;
                    }
                }
                // Failures never clear a cached token; retry pacing is
                // handled in check_and_retry.
            }
            _ => {}
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state != SessionState::Disconnected
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobResult;

    fn connect_result(success: bool) -> JobResult {
        JobResult {
            job_id: 1,
            success,
            completed_at: 0,
            payload: ResultPayload::Connect {
                connected: success,
                address: if success {
                    "http://192.168.1.50:8080".to_string()
                } else {
                    String::new()
                },
            },
        }
    }

    fn token_result(success: bool, token: &str) -> JobResult {
        JobResult {
            job_id: 2,
            success,
            completed_at: 0,
            payload: ResultPayload::SessionToken {
                token: SessionToken::new(token),
            },
        }
    }

    #[test]
    fn starts_disconnected_and_probes_immediately() {
        let mut policy = SessionPolicy::new();
        assert_eq!(policy.state(), SessionState::Disconnected);
        assert_eq!(policy.check_and_retry(1_000), vec![JobKind::Connect]);
        // Second tick inside the retry window submits nothing.
        assert!(policy.check_and_retry(2_000).is_empty());
        // After the interval the probe goes out again.
        assert_eq!(policy.check_and_retry(11_000), vec![JobKind::Connect]);
    }

    #[test]
    fn successful_connect_moves_to_no_token() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));
        assert_eq!(policy.state(), SessionState::ConnectedNoToken);
        assert_eq!(policy.address(), "http://192.168.1.50:8080");
    }

    #[test]
    fn token_fetches_are_paced_and_capped() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));

        let mut now = 0;
        let mut submitted = 0;
        // 5 attempts spaced >= 5s apart, then silence.
        for _ in 0..10 {
            submitted += policy
                .check_and_retry(now)
                .iter()
                .filter(|k| matches!(k, JobKind::GetSessionToken))
                .count();
            now += TOKEN_RETRY_INTERVAL_MS;
        }
        assert_eq!(submitted, MAX_TOKEN_ATTEMPTS as usize);
        assert!(policy.check_and_retry(now + 60_000).is_empty());
    }

    #[test]
    fn token_success_resets_attempts_and_caches_token() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));
        assert_eq!(policy.check_and_retry(0), vec![JobKind::GetSessionToken]);

        policy.observe(&token_result(true, "_RS75a1b2c3"));
        assert_eq!(policy.state(), SessionState::ConnectedHasToken);
        assert_eq!(policy.token().as_str(), "_RS75a1b2c3");
        assert!(policy.check_and_retry(60_000).is_empty());
    }

    #[test]
    fn failed_token_fetch_never_clears_a_cached_token() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));
        policy.observe(&token_result(true, "_RS75a1b2c3"));

        policy.observe(&token_result(false, ""));
        assert_eq!(policy.token().as_str(), "_RS75a1b2c3");
        assert_eq!(policy.state(), SessionState::ConnectedHasToken);
    }

    #[test]
    fn reconnect_with_cached_token_skips_token_phase() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));
        policy.observe(&token_result(true, "_RS75a1b2c3"));

        policy.observe(&connect_result(false));
        assert_eq!(policy.state(), SessionState::Disconnected);

        policy.observe(&connect_result(true));
        assert_eq!(policy.state(), SessionState::ConnectedHasToken);
    }

    #[test]
    fn reconnect_reopens_the_token_attempt_budget() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));

        let mut now = 0;
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            assert!(!policy.check_and_retry(now).is_empty());
            now += TOKEN_RETRY_INTERVAL_MS;
        }
        assert!(policy.check_and_retry(now).is_empty());

        // Drop and re-establish the connection.
        policy.observe(&connect_result(false));
        policy.observe(&connect_result(true));
        assert_eq!(
            policy.check_and_retry(now + CONNECT_RETRY_INTERVAL_MS),
            vec![JobKind::GetSessionToken]
        );
    }

    #[test]
    fn replaces_token_only_on_different_non_empty_value() {
        let mut policy = SessionPolicy::new();
        policy.observe(&connect_result(true));
        policy.observe(&token_result(true, "_RSold"));
        policy.observe(&token_result(true, "_RSnew"));
        assert_eq!(policy.token().as_str(), "_RSnew");
    }
}
