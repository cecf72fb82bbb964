//! Error types for fetching stats.

use crate::client::TransportError;
use crate::stats::StatsResource;
use std::time::Duration;
use thiserror::Error;

/// Why fetching stats for a user failed.
///
/// A 400 from the setup endpoint has no variant here: it is always
/// swallowed where it happens.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The setup reply had no job id to poll on (or no reply was captured).
    #[error("Error polling setup: no id in initial response")]
    MissingIdentifier,

    /// A poll reply had no status.
    #[error("Error polling setup: no status in response")]
    MissingStatus,

    /// Setup did not complete before the deadline.
    #[error("Error polling setup: timeout after {}ms", .waited.as_millis())]
    Timeout { waited: Duration },

    /// A setup request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// One of the four stats requests failed.
    #[error("Failed to fetch {resource}: {source}")]
    Aggregation {
        resource: StatsResource,
        #[source]
        source: TransportError,
    },
}
