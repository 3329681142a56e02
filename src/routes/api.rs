use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::models::views::TenantRow;
use crate::routes::tables::{self, TableQuery};
use crate::AppState;

pub async fn handle_healthz() -> &'static str {
    "ok\n"
}

#[derive(Debug, Serialize)]
pub struct RowsPage<T> {
    pub total: usize,
    pub start: usize,
    pub rows: Vec<T>,
}

/// Clamps an inclusive `[start, stop]` request to the rows that exist.
pub fn page_bounds(start: usize, stop: Option<usize>, total: usize) -> Option<RangeInclusive<usize>> {
    if total == 0 || start >= total {
        return None;
    }
    let stop = stop.unwrap_or(total - 1).min(total - 1);
    (start <= stop).then_some(start..=stop)
}

/// Rows for the tenant table's infinite scroll, sorted the same way as
/// the page that requested them. `start`/`stop` is the visible range and
/// `loaded` the number of rows the caller already holds.
///
/// The console's own tenant page windows rows server-side and does not
/// call this. It serves external scripts that page through tenants with
/// the same sort and column query parameters as `/ui/tenants`.
pub async fn handle_tenant_rows(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let number = |key: &str| params.get(key).and_then(|s| s.parse::<usize>().ok());
    let start = number("start").unwrap_or(0);
    let stop = number("stop");
    let loaded = number("loaded").unwrap_or(0);

    let list = match state.client.list_tenants().await {
        Ok(l) => l,
        Err(e) => {
            tracing::warn!("listing tenants for row page: {}", e);
            return (StatusCode::BAD_GATEWAY, e.user_message()).into_response();
        }
    };

    let mut rows: Vec<TenantRow> = list.tenants.iter().map(TenantRow::from).collect();
    let total = rows.len();
    let table = TableQuery::from_params(&params)
        .apply(tables::tenants())
        .with_infinite_scroll(total);
    table.sort_records(&mut rows);

    let request = page_bounds(start, stop, total)
        .and_then(|visible| table.rows_to_load(*visible.start()..*visible.end() + 1, loaded));
    let page = match request {
        Some(req) => RowsPage {
            total,
            start: req.start_index,
            rows: rows.drain(req.start_index..=req.stop_index).collect(),
        },
        None => RowsPage {
            total,
            start,
            rows: Vec::new(),
        },
    };
    Json(page).into_response()
}
