//! Concurrent fetch of the four stats resources.

use super::models::{StatsBundle, StatsResource};
use crate::client::Transport;
use crate::error::FetchError;
use serde_json::Value;
use tracing::{debug, warn};

/// Fetch all four stats payloads for `username` at once.
///
/// All requests are in flight together. The first failure fails the whole
/// bundle and the remaining requests are dropped.
pub async fn aggregate_stats<T>(transport: &T, username: &str) -> Result<StatsBundle, FetchError>
where
    T: Transport + ?Sized,
{
    let fetch = move |resource: StatsResource| async move {
        let query = [("username", username)];
        match transport.get(resource.path(), &query).await {
            Ok(response) => {
                debug!(%resource, "Fetched");
                Ok::<Value, FetchError>(response.body)
            }
            Err(source) => {
                warn!(%resource, error = %source, "Stats request failed");
                Err(FetchError::Aggregation { resource, source })
            }
        }
    };

    let (game_stats, win_stats, loss_stats, draw_stats) = futures::try_join!(
        fetch(StatsResource::Game),
        fetch(StatsResource::Win),
        fetch(StatsResource::Loss),
        fetch(StatsResource::Draw),
    )?;

    Ok(StatsBundle {
        game_stats,
        win_stats,
        loss_stats,
        draw_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{self, status_error, ScriptedTransport};
    use crate::client::{ApiResponse, TransportError};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_bundle_holds_each_body() {
        let transport = ScriptedTransport::new().with_stats();

        let bundle = aggregate_stats(&transport, "hikaru").await.unwrap();

        assert_eq!(
            bundle,
            StatsBundle {
                game_stats: mock::game_stats_body(),
                win_stats: mock::win_stats_body(),
                loss_stats: mock::loss_stats_body(),
                draw_stats: mock::draw_stats_body(),
            }
        );

        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        for call in &calls {
            assert_eq!(call.method, "GET");
            assert_eq!(
                call.query,
                vec![("username".to_string(), "hikaru".to_string())]
            );
        }
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_bundle() {
        let transport = ScriptedTransport::new()
            .with_stats()
            .get_err("/winstats", status_error(500));

        let err = aggregate_stats(&transport, "hikaru").await.unwrap_err();

        match err {
            FetchError::Aggregation { resource, source } => {
                assert_eq!(resource, StatsResource::Win);
                assert_eq!(source, status_error(500));
            }
            other => panic!("expected aggregation error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_run_concurrently() {
        let slow = Duration::from_millis(200);
        let transport = ScriptedTransport::new()
            .get_delayed("/gamestats", slow, Ok(ApiResponse::ok(json!({}))))
            .get_delayed("/winstats", slow, Ok(ApiResponse::ok(json!({}))))
            .get_delayed("/lossstats", slow, Ok(ApiResponse::ok(json!({}))))
            .get_delayed("/drawstats", slow, Ok(ApiResponse::ok(json!({}))));
        let start = Instant::now();

        aggregate_stats(&transport, "hikaru").await.unwrap();

        assert!(start.elapsed() < Duration::from_millis(400));
        assert!(transport.calls().iter().all(|c| c.at == start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_fast_without_waiting_for_slow_requests() {
        let transport = ScriptedTransport::new()
            .get_delayed("/gamestats", Duration::from_secs(10), Ok(ApiResponse::ok(json!({}))))
            .get_ok("/winstats", json!({}))
            .get_ok("/lossstats", json!({}))
            .get_err("/drawstats", TransportError::Network("connection reset".to_string()));
        let start = Instant::now();

        let err = aggregate_stats(&transport, "hikaru").await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Aggregation {
                resource: StatsResource::Draw,
                ..
            }
        ));
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
