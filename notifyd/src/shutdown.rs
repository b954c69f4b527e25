use std::time::Duration;

use crate::app::SharedState;

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: server and notification service cancelled");

    if let Some(worker) = state.take_worker().await {
        match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
            Ok(Ok(())) => tracing::info!("Shutdown: notification service drained"),
            Ok(Err(e)) => tracing::error!("Shutdown: notification service panicked: {e}"),
            Err(_) => tracing::warn!("Shutdown: notification service did not stop in time"),
        }
    }

    tracing::info!("Shutdown sequence completed");
}
