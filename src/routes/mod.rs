pub mod api;
pub mod forms;
pub mod sse;
pub mod tables;
pub mod ui;
pub mod widgets;
pub mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health & row paging
        .route("/healthz", get(api::handle_healthz))
        .route("/api/ui/tenants/rows", get(api::handle_tenant_rows))
        // Dashboard UI
        .route("/ui/", get(ui::handle_dashboard))
        .route("/ui/tenants", get(ui::handle_tenants))
        .route(
            "/ui/tenants/add",
            get(ui::handle_add_tenant).post(ui::handle_add_tenant_submit),
        )
        .route("/ui/tenants/{namespace}/{name}", get(ui::handle_tenant_detail))
        .route(
            "/ui/tenants/delete/{namespace}/{name}",
            post(ui::handle_delete_tenant),
        )
        .route(
            "/ui/tenants/{namespace}/{name}/pods/delete/{pod}",
            post(ui::handle_delete_pod),
        )
        .route(
            "/ui/tenants/{namespace}/{name}/pvcs/delete/{pvc_namespace}/{pvc}",
            post(ui::handle_delete_pvc),
        )
        .route(
            "/ui/tenants/{namespace}/{name}/pools/add",
            get(ui::handle_add_pool).post(ui::handle_add_pool_submit),
        )
        .route("/ui/pvcs", get(ui::handle_pvcs))
        .route("/ui/drives", get(ui::handle_drives))
        .route("/ui/drives/format", post(ui::handle_format_drives))
        .route("/ui/license", get(ui::handle_license))
        .route("/ui/license/consent", post(ui::handle_license_consent))
        .route("/ui/profile", get(ui::handle_profile))
        // Live updates
        .route("/ui/events/tenants", get(sse::handle_tenant_events))
        .route("/ws/profile", get(ws::handle_profile_ws))
        // Static files
        .nest_service("/ui/static", ServeDir::new("static"))
        // Root redirect
        .route(
            "/",
            get(|| async {
                axum::response::Redirect::to("/ui/")
            }),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
