//! Initial setup request.

use super::models::{SetupRequest, SetupResponse, SETUP_PATH};
use crate::client::{Transport, TransportError};
use tracing::{debug, warn};

/// Ask the server to start the setup job for `request.username`.
///
/// A 400 means the job already exists or is in progress: it is logged and
/// swallowed, and `Ok(None)` is returned. Every other failure is returned
/// unchanged.
pub async fn trigger_setup<T>(
    transport: &T,
    request: &SetupRequest,
) -> Result<Option<SetupResponse>, TransportError>
where
    T: Transport + ?Sized,
{
    match transport.post(SETUP_PATH, &request.body()).await {
        Ok(response) => {
            let http_status = response.status;
            let response = SetupResponse::from_body(response.body);
            debug!(
                username = %request.username,
                http_status,
                id = ?response.id(),
                status = ?response.status,
                "Setup requested"
            );
            Ok(Some(response))
        }
        Err(e) if e.is_benign_conflict() => {
            warn!(username = %request.username, error = %e, "Error requesting initial setup");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
