use axum::{
    extract::State,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures_util::StreamExt;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;

use crate::clients::OperatorClient;
use crate::models::operator::ListTenantsResponse;
use crate::AppState;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TenantSummaryEvent {
    pub tenants: usize,
    pub healthy: usize,
    pub pools: i64,
    pub deleting: usize,
    pub backend_healthy: bool,
}

impl TenantSummaryEvent {
    pub fn from_list(list: &ListTenantsResponse, backend_healthy: bool) -> Self {
        Self {
            tenants: list.tenants.len(),
            healthy: list
                .tenants
                .iter()
                .filter(|t| t.health_status == "green")
                .count(),
            pools: list.tenants.iter().map(|t| t.pool_count).sum(),
            deleting: list
                .tenants
                .iter()
                .filter(|t| !t.deletion_date.is_empty())
                .count(),
            backend_healthy,
        }
    }
}

async fn summary_event(client: &OperatorClient) -> Event {
    match client.list_tenants().await {
        Ok(list) => {
            let summary = TenantSummaryEvent::from_list(&list, client.is_healthy());
            let data = serde_json::to_string(&summary).unwrap_or_default();
            Event::default().event("tenant-summary").data(data)
        }
        Err(e) => {
            tracing::debug!("tenant summary poll failed: {}", e);
            Event::default().event("backend-error").data(e.user_message())
        }
    }
}

/// SSE endpoint that streams the tenant summary shown on the dashboard,
/// polling the backend every `sse_interval_secs`.
pub async fn handle_tenant_events(State(state): State<AppState>) -> Response {
    let client = state.client.clone();
    let ticks = IntervalStream::new(tokio::time::interval(state.config.sse_interval()));

    let stream = ticks.then(move |_| {
        let client = client.clone();
        async move { Ok::<_, Infallible>(summary_event(&client).await) }
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default().interval(Duration::from_secs(15)))
        .into_response()
}
