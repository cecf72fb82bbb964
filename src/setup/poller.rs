//! Waiting for the setup job to complete.
//!
//! The poller is a small state machine:
//!
//! ```text
//! AwaitingResult -> Polling -> { Complete, TimedOut, Failed }
//! ```
//!
//! A single deadline is armed when polling starts. Each loop step races the
//! deadline against the next poll (sleep until due, then POST). Whichever
//! settles first decides the next state; the losing future is dropped, so an
//! in-flight request is abandoned once the deadline has fired.

use super::models::{SetupRequest, SetupResponse, SetupStatus, SETUP_PATH};
use crate::client::{Transport, TransportError};
use crate::config::PollConfig;
use crate::error::FetchError;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant, Sleep};
use tracing::{debug, info, warn};

/// Timing policy for polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total time allowed from entering the polling state.
    pub timeout: Duration,
    /// Delay between a poll reply and the next poll.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            interval: Duration::from_millis(1_000),
        }
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(config: &PollConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

/// State of one wait.
#[derive(Debug)]
pub enum PollState {
    /// Holding whatever the trigger step captured.
    AwaitingResult(Option<SetupResponse>),
    /// Deadline armed. `next_poll` is `None` once polling has stalled.
    Polling {
        attempts: u32,
        next_poll: Option<Instant>,
    },
    Complete,
    TimedOut,
    Failed(FetchError),
}

/// Polls the setup endpoint until the job completes.
pub struct SetupPoller<'a, T: ?Sized> {
    transport: &'a T,
    request: &'a SetupRequest,
    policy: PollPolicy,
}

impl<'a, T> SetupPoller<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn new(transport: &'a T, request: &'a SetupRequest, policy: PollPolicy) -> Self {
        Self {
            transport,
            request,
            policy,
        }
    }

    /// Drive the state machine from the trigger's reply to a terminal state.
    pub async fn wait(&self, initial: Option<SetupResponse>) -> Result<(), FetchError> {
        let mut state = PollState::AwaitingResult(initial);
        let mut deadline: Option<Pin<Box<Sleep>>> = None;

        loop {
            state = match state {
                PollState::AwaitingResult(initial) => self.on_initial(initial),
                PollState::Polling {
                    attempts,
                    next_poll,
                } => {
                    let deadline =
                        deadline.get_or_insert_with(|| Box::pin(sleep(self.policy.timeout)));

                    tokio::select! {
                        biased;

                        _ = deadline.as_mut() => PollState::TimedOut,

                        outcome = self.poll_once(next_poll) => {
                            self.on_poll_reply(attempts + 1, outcome)
                        }
                    }
                }
                PollState::Complete => {
                    info!(username = %self.request.username, "Setup complete");
                    return Ok(());
                }
                PollState::TimedOut => {
                    warn!(
                        username = %self.request.username,
                        timeout_ms = self.policy.timeout.as_millis() as u64,
                        "Setup polling timed out"
                    );
                    return Err(FetchError::Timeout {
                        waited: self.policy.timeout,
                    });
                }
                PollState::Failed(e) => {
                    warn!(username = %self.request.username, error = %e, "Setup polling failed");
                    return Err(e);
                }
            };
        }
    }

    fn on_initial(&self, initial: Option<SetupResponse>) -> PollState {
        let Some(response) = initial else {
            return PollState::Failed(FetchError::MissingIdentifier);
        };
        let Some(id) = response.id() else {
            return PollState::Failed(FetchError::MissingIdentifier);
        };

        if response.status().is_some_and(|s| s.is_terminal()) {
            debug!(id, "Setup already complete, skipping polling");
            return PollState::Complete;
        }

        info!(
            username = %self.request.username,
            id,
            interval_ms = self.policy.interval.as_millis() as u64,
            timeout_ms = self.policy.timeout.as_millis() as u64,
            "Waiting for setup to complete"
        );

        PollState::Polling {
            attempts: 0,
            next_poll: Some(Instant::now() + self.policy.interval),
        }
    }

    /// Wait until the next poll is due, then send it. Never resolves when
    /// polling has stalled.
    async fn poll_once(&self, next_poll: Option<Instant>) -> Result<SetupResponse, TransportError> {
        match next_poll {
            Some(at) => sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }

        let response = self.transport.post(SETUP_PATH, &self.request.body()).await?;
        Ok(SetupResponse::from_body(response.body))
    }

    fn on_poll_reply(
        &self,
        attempts: u32,
        outcome: Result<SetupResponse, TransportError>,
    ) -> PollState {
        match outcome {
            Ok(response) => match response.status() {
                None => PollState::Failed(FetchError::MissingStatus),
                Some(status) if status.is_terminal() => PollState::Complete,
                Some(status) => {
                    if status == SetupStatus::Failed {
                        warn!(attempt = attempts, "Server reports setup failed, still waiting");
                    } else {
                        debug!(attempt = attempts, %status, "Setup still pending");
                    }
                    PollState::Polling {
                        attempts,
                        next_poll: Some(Instant::now() + self.policy.interval),
                    }
                }
            },
            // Only a successful reply schedules the next poll, so a 400 here
            // leaves the loop waiting on the deadline.
            Err(e) if e.is_benign_conflict() => {
                warn!(attempt = attempts, error = %e, "Error polling setup");
                PollState::Polling {
                    attempts,
                    next_poll: None,
                }
            }
            Err(e) => PollState::Failed(FetchError::Transport(e)),
        }
    }
}
