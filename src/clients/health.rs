use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{info, warn};

use super::OperatorClient;

/// Pings the backend every `interval` until `shutdown` fires.
pub async fn run_health_checker(
    client: Arc<OperatorClient>,
    interval: Duration,
    mut shutdown: watch::Receiver<()>,
) {
    // Initial check
    ping(&client).await;

    let mut ticker = time::interval(interval);
    ticker.tick().await; // skip first immediate tick

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ping(&client).await;
            }
            _ = shutdown.changed() => {
                info!("health checker shutting down");
                return;
            }
        }
    }
}

async fn ping(client: &OperatorClient) {
    let was_healthy = client.is_healthy();
    match client.ping().await {
        Ok(()) if !was_healthy => info!("operator backend {} is reachable", client.base_url),
        Ok(()) => {}
        Err(e) => warn!("health check failed for {}: {}", client.base_url, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_checker_stops_on_shutdown() {
        let client = Arc::new(OperatorClient::new("http://127.0.0.1:9".to_string(), None).unwrap());
        let (tx, rx) = watch::channel(());
        let handle = tokio::spawn(run_health_checker(client.clone(), Duration::from_secs(60), rx));
        tx.send(()).unwrap();
        time::timeout(Duration::from_secs(15), handle)
            .await
            .expect("checker did not stop")
            .unwrap();
        assert!(!client.is_healthy());
    }
}
