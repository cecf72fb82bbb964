//! End-to-end stats fetch: trigger setup, wait for it, then aggregate.

use crate::client::Transport;
use crate::error::FetchError;
use crate::setup::{trigger_setup, PollPolicy, SetupPoller, SetupRequest};
use crate::stats::{aggregate_stats, StatsBundle};
use tracing::info;

/// Fetches the stats bundle for a user over one transport.
pub struct StatsFetcher<T> {
    transport: T,
    policy: PollPolicy,
}

impl<T: Transport> StatsFetcher<T> {
    pub fn new(transport: T, policy: PollPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run setup for `username` and, once it is complete, fetch all four
    /// stats resources. Either the full bundle or an error is returned.
    pub async fn fetch_stats(&self, username: &str) -> Result<StatsBundle, FetchError> {
        let request = SetupRequest::new(username);

        info!(username, "Requesting setup");
        let initial = trigger_setup(&self.transport, &request).await?;

        SetupPoller::new(&self.transport, &request, self.policy)
            .wait(initial)
            .await?;

        info!(username, "Fetching stats");
        let bundle = aggregate_stats(&self.transport, username).await?;
        info!(username, "Stats fetched");

        Ok(bundle)
    }
}
