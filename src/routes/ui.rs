use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::components::table::{SelectionMode, TableRecord, TableView};
use crate::components::wizard::{ButtonKind, StepLink, Wizard};
use crate::helpers::human_time;
use crate::models::operator::{License, TenantCredential};
use crate::models::views::*;
use crate::routes::forms::{self, Applied, Outcome, PoolFields, PoolForm, TenantForm, WizardForm, WizardPost};
use crate::routes::tables::{self, TableQuery};
use crate::routes::widgets::{self, TableLinks};
use crate::routes::ws::PROFILE_TYPES;
use crate::AppState;

pub const CONSENT_COOKIE: &str = "agpl_consent";

struct Breadcrumb {
    label: String,
    url: String,
}

/// Chrome shared by every page: title, navigation and banners.
struct Page {
    title: String,
    console_title: String,
    current_nav: &'static str,
    breadcrumbs: Vec<Breadcrumb>,
    error_banner: String,
    notice_banner: String,
    consent_required: bool,
}

fn page(state: &AppState, headers: &HeaderMap, title: &str, nav: &'static str, trail: &[(&str, &str)]) -> Page {
    let mut breadcrumbs = vec![Breadcrumb {
        label: "Dashboard".to_string(),
        url: "/ui/".to_string(),
    }];
    breadcrumbs.extend(trail.iter().map(|(label, url)| Breadcrumb {
        label: label.to_string(),
        url: url.to_string(),
    }));
    Page {
        title: title.to_string(),
        console_title: state.config.console_title.clone(),
        current_nav: nav,
        breadcrumbs,
        error_banner: String::new(),
        notice_banner: String::new(),
        consent_required: !consent_given(headers),
    }
}

/// True when the license acknowledgement cookie is present.
pub fn consent_given(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|c| c.trim().split_once('='))
        .any(|(k, v)| k == CONSENT_COOKIE && v == "true")
}

fn render_template(tmpl: &impl Template) -> Response {
    match tmpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn failed_view(what: &str) -> TableView {
    TableView::Empty {
        message: format!("{} could not be loaded.", what),
    }
}

// --- Dashboard ---

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    page: Page,
    tenant_count: usize,
    healthy_tenants: usize,
    pool_count: i64,
    drive_count: usize,
    drives_available: bool,
    backend_healthy: bool,
    last_ping_display: String,
    sse_interval_ms: u64,
}

pub async fn handle_dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (tenants, drives) = tokio::join!(state.client.list_tenants(), state.client.list_drives());
    let mut page = page(&state, &headers, "Dashboard", "dashboard", &[]);

    let mut summary = DashboardSummary {
        backend_healthy: state.client.is_healthy(),
        last_ping: state.client.last_ping(),
        ..Default::default()
    };
    match tenants {
        Ok(list) => {
            summary.tenant_count = list.tenants.len();
            summary.healthy_tenants = list
                .tenants
                .iter()
                .filter(|t| t.health_status == "green")
                .count();
            summary.pool_count = list.tenants.iter().map(|t| t.pool_count).sum();
        }
        Err(e) => {
            warn!("dashboard: listing tenants: {}", e);
            page.error_banner = e.user_message();
        }
    }
    let mut drives_available = true;
    match drives {
        Ok(list) => summary.drive_count = list.drives.len(),
        Err(e) => {
            // Clusters without DirectPV answer 404 here.
            debug!("dashboard: listing drives: {}", e);
            drives_available = false;
        }
    }

    let tmpl = DashboardTemplate {
        page,
        tenant_count: summary.tenant_count,
        healthy_tenants: summary.healthy_tenants,
        pool_count: summary.pool_count,
        drive_count: summary.drive_count,
        drives_available,
        backend_healthy: summary.backend_healthy,
        last_ping_display: human_time(summary.last_ping),
        sse_interval_ms: state.config.sse_interval().as_millis() as u64,
    };
    render_template(&tmpl)
}

// --- Tenants ---

#[derive(Template)]
#[template(path = "tenants.html")]
struct TenantsTemplate {
    page: Page,
    table_html: String,
    tenant_count: usize,
}

pub async fn handle_tenants(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    tenants_page(&state, &headers, &params, String::new()).await
}

async fn tenants_page(
    state: &AppState,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    error_banner: String,
) -> Response {
    let query = TableQuery::from_params(params);
    let table = query.apply(tables::tenants());
    let links = TableLinks::new("/ui/tenants", TableQuery::state_of(&table));
    let mut page = page(state, headers, "Tenants", "tenants", &[("Tenants", "/ui/tenants")]);
    page.error_banner = error_banner;

    let mut tenant_count = 0;
    let table_html = match state.client.list_tenants().await {
        Ok(list) => {
            let mut rows: Vec<TenantRow> = list.tenants.iter().map(TenantRow::from).collect();
            table.sort_records(&mut rows);
            tenant_count = rows.len();
            let table = table.with_infinite_scroll(rows.len());
            let (range, pager) = widgets::window(
                &links,
                query.top,
                state.config.table.viewport_height,
                rows.len(),
            );
            let view = table.render_window(&rows, false, state.config.table.container_width, range);
            widgets::render_table(&view, &links, None, Some(pager))
        }
        Err(e) => {
            warn!("listing tenants: {}", e);
            if page.error_banner.is_empty() {
                page.error_banner = e.user_message();
            }
            widgets::render_table(&failed_view("Tenants"), &links, None, None)
        }
    };

    render_template(&TenantsTemplate {
        page,
        table_html,
        tenant_count,
    })
}

pub async fn handle_delete_tenant(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name)): Path<(String, String)>,
) -> Response {
    match state.client.delete_tenant(&namespace, &name).await {
        Ok(()) => {
            info!("deleted tenant {}/{}", namespace, name);
            Redirect::to("/ui/tenants").into_response()
        }
        Err(e) => {
            warn!("deleting tenant {}/{}: {}", namespace, name, e);
            tenants_page(&state, &headers, &HashMap::new(), e.user_message()).await
        }
    }
}

// --- Tenant detail ---

#[derive(Template)]
#[template(path = "tenant_detail.html")]
struct TenantDetailTemplate {
    page: Page,
    found: bool,
    name: String,
    namespace: String,
    state: String,
    image: String,
    health: String,
    health_class: String,
    drives_online: i32,
    drives_offline: i32,
    minio_endpoint: String,
    console_endpoint: String,
    created: String,
    delete_url: String,
    add_pool_url: String,
    pools_html: String,
    pods_html: String,
    pvcs_html: String,
    events_html: String,
}

pub async fn handle_tenant_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name)): Path<(String, String)>,
) -> Response {
    tenant_detail_page(&state, &headers, &namespace, &name, String::new()).await
}

async fn tenant_detail_page(
    state: &AppState,
    headers: &HeaderMap,
    namespace: &str,
    name: &str,
    error_banner: String,
) -> Response {
    let (tenant, pods, pvcs, events) = tokio::join!(
        state.client.get_tenant(namespace, name),
        state.client.list_tenant_pods(namespace, name),
        state.client.list_tenant_pvcs(namespace, name),
        state.client.list_tenant_events(namespace, name),
    );

    let detail_url = format!("/ui/tenants/{}/{}", namespace, name);
    let mut page = page(
        state,
        headers,
        name,
        "tenants",
        &[("Tenants", "/ui/tenants"), (name, detail_url.as_str())],
    );
    page.error_banner = error_banner;
    let width = state.config.table.container_width;
    let links = TableLinks::new(&detail_url, String::new());

    let mut tmpl = TenantDetailTemplate {
        page,
        found: false,
        name: name.to_string(),
        namespace: namespace.to_string(),
        state: String::new(),
        image: String::new(),
        health: String::new(),
        health_class: String::new(),
        drives_online: 0,
        drives_offline: 0,
        minio_endpoint: String::new(),
        console_endpoint: String::new(),
        created: String::new(),
        delete_url: format!("/ui/tenants/delete/{}/{}", namespace, name),
        add_pool_url: format!("{}/pools/add", detail_url),
        pools_html: String::new(),
        pods_html: String::new(),
        pvcs_html: String::new(),
        events_html: String::new(),
    };

    let tenant = match tenant {
        Ok(t) => t,
        Err(e) => {
            warn!("getting tenant {}/{}: {}", namespace, name, e);
            let status = if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            };
            if tmpl.page.error_banner.is_empty() {
                tmpl.page.error_banner = e.user_message();
            }
            return (status, render_template(&tmpl)).into_response();
        }
    };

    tmpl.found = true;
    tmpl.state = tenant.current_state.clone();
    tmpl.image = tenant.image.clone();
    if let Some(status) = &tenant.status {
        tmpl.health = status.health_status.clone();
        tmpl.drives_online = status.drives_online;
        tmpl.drives_offline = status.drives_offline;
    }
    if tmpl.health.is_empty() {
        tmpl.health = "unknown".to_string();
    }
    tmpl.health_class = health_class(&tmpl.health).to_string();
    if let Some(endpoints) = &tenant.endpoints {
        tmpl.minio_endpoint = endpoints.minio.clone();
        tmpl.console_endpoint = endpoints.console.clone();
    }
    tmpl.created = crate::helpers::parse_age(&tenant.creation_date);

    let pools: Vec<PoolRow> = tenant.pools.iter().map(PoolRow::from).collect();
    tmpl.pools_html = widgets::render_table(&tables::pools().render(&pools, false, width), &links, None, None);

    tmpl.pods_html = match pods {
        Ok(pods) => {
            let rows: Vec<PodRow> = pods.iter().map(PodRow::from).collect();
            let view = tables::pods(namespace, name).render(&rows, false, width);
            widgets::render_table(&view, &links, None, None)
        }
        Err(e) => {
            warn!("listing pods of {}/{}: {}", namespace, name, e);
            widgets::render_table(&failed_view("Pods"), &links, None, None)
        }
    };

    tmpl.pvcs_html = match pvcs {
        Ok(list) => {
            let rows: Vec<PvcRow> = list.pvcs.iter().map(PvcRow::from).collect();
            let view = tables::tenant_pvcs(namespace, name).render(&rows, false, width);
            widgets::render_table(&view, &links, None, None)
        }
        Err(e) => {
            warn!("listing PVCs of {}/{}: {}", namespace, name, e);
            widgets::render_table(&failed_view("Volumes"), &links, None, None)
        }
    };

    tmpl.events_html = match events {
        Ok(events) => {
            let rows = event_rows(&events);
            widgets::render_table(&tables::events().render(&rows, false, width), &links, None, None)
        }
        Err(e) => {
            warn!("listing events of {}/{}: {}", namespace, name, e);
            widgets::render_table(&failed_view("Events"), &links, None, None)
        }
    };

    render_template(&tmpl)
}

pub async fn handle_delete_pod(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name, pod)): Path<(String, String, String)>,
) -> Response {
    match state.client.delete_tenant_pod(&namespace, &name, &pod).await {
        Ok(()) => {
            info!("deleted pod {} of tenant {}/{}", pod, namespace, name);
            Redirect::to(&format!("/ui/tenants/{}/{}", namespace, name)).into_response()
        }
        Err(e) => {
            warn!("deleting pod {} of {}/{}: {}", pod, namespace, name, e);
            tenant_detail_page(&state, &headers, &namespace, &name, e.user_message()).await
        }
    }
}

pub async fn handle_delete_pvc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name, pvc_namespace, pvc)): Path<(String, String, String, String)>,
) -> Response {
    if pvc_namespace != namespace {
        let msg = format!("Volume {}/{} does not belong to tenant {}/{}", pvc_namespace, pvc, namespace, name);
        return tenant_detail_page(&state, &headers, &namespace, &name, msg).await;
    }
    match state.client.delete_tenant_pvc(&namespace, &name, &pvc).await {
        Ok(()) => {
            info!("deleted PVC {} of tenant {}/{}", pvc, namespace, name);
            Redirect::to(&format!("/ui/tenants/{}/{}", namespace, name)).into_response()
        }
        Err(e) => {
            warn!("deleting PVC {} of {}/{}: {}", pvc, namespace, name, e);
            tenant_detail_page(&state, &headers, &namespace, &name, e.user_message()).await
        }
    }
}

// --- Wizards ---

struct ButtonView {
    label: String,
    id: String,
    enabled: bool,
    primary: bool,
    finish: bool,
}

struct EntryView {
    index: usize,
    name: String,
    value: String,
    error: String,
    removable: bool,
}

struct PairView {
    key_name: String,
    key: String,
    value_name: String,
    value: String,
}

/// Step list, buttons and hidden state shared by the wizard pages.
struct WizardChrome {
    action: String,
    step: usize,
    steps: Vec<StepLink>,
    buttons: Vec<ButtonView>,
    /// Submitted when Enter is pressed in a field.
    default_button: String,
    default_finish: bool,
    loading: bool,
    hidden: Vec<(String, String)>,
    debounce_ms: u64,
}

fn wizard_chrome(action: &str, wizard: &Wizard, hidden: Vec<(String, String)>, debounce: Duration) -> WizardChrome {
    let buttons: Vec<ButtonView> = wizard
        .current_step()
        .map(|s| {
            s.buttons
                .iter()
                .map(|b| ButtonView {
                    label: b.label.clone(),
                    id: b.id(),
                    enabled: b.enabled,
                    primary: !matches!(b.kind, ButtonKind::Back),
                    finish: matches!(b.kind, ButtonKind::Custom(_)),
                })
                .collect()
        })
        .unwrap_or_default();
    let default = buttons.iter().rev().find(|b| b.primary);
    let default_button = default.map(|b| b.label.clone()).unwrap_or_default();
    let default_finish = default.is_some_and(|b| b.finish);

    WizardChrome {
        action: action.to_string(),
        step: wizard.current(),
        steps: wizard.step_list(),
        buttons,
        default_button,
        default_finish,
        loading: wizard.loading_step,
        hidden,
        debounce_ms: debounce.as_millis() as u64,
    }
}

/// Pool sizing inputs, shown by both wizards.
struct PoolView {
    servers: String,
    volumes_per_server: String,
    volume_size_gi: String,
    label_entries: Vec<PairView>,
    labels_value: String,
}

impl From<&PoolFields> for PoolView {
    fn from(pool: &PoolFields) -> Self {
        PoolView {
            servers: pool.servers.clone(),
            volumes_per_server: pool.volumes_per_server.clone(),
            volume_size_gi: pool.volume_size_gi.clone(),
            label_entries: pool
                .labels
                .pairs()
                .iter()
                .enumerate()
                .map(|(i, p)| PairView {
                    key_name: pool.labels.key_field_name(i),
                    key: p.key.clone(),
                    value_name: pool.labels.value_field_name(i),
                    value: p.value.clone(),
                })
                .collect(),
            labels_value: pool.labels.committed_value().to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "tenant_add.html")]
struct TenantAddTemplate {
    page: Page,
    chrome: WizardChrome,
    errors: BTreeMap<String, String>,
    name: String,
    namespace: String,
    storage_class: String,
    pool: PoolView,
    image: String,
    domain_entries: Vec<EntryView>,
    domains_value: String,
}

impl TenantAddTemplate {
    fn err(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }

    fn build(page: Page, form: &TenantForm, wizard: &Wizard, show_errors: bool, debounce: Duration) -> Self {
        let step = wizard.current();
        let errors = if show_errors {
            form.field_errors(step)
        } else {
            BTreeMap::new()
        };
        let entries = form.domains.entries();
        let domain_entries = entries
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let name = form.domains.field_name(i);
                EntryView {
                    index: i,
                    error: errors.get(&name).cloned().unwrap_or_default(),
                    name,
                    value: v.clone(),
                    removable: i + 1 < entries.len(),
                }
            })
            .collect();

        TenantAddTemplate {
            page,
            chrome: wizard_chrome("/ui/tenants/add", wizard, form.hidden_fields(step), debounce),
            errors,
            name: form.name.clone(),
            namespace: form.namespace.clone(),
            storage_class: form.storage_class.clone(),
            pool: PoolView::from(&form.pool),
            image: form.image.clone(),
            domain_entries,
            domains_value: form.domains.committed_value().to_string(),
        }
    }
}

fn render_tenant_wizard(
    state: &AppState,
    headers: &HeaderMap,
    form: &TenantForm,
    wizard: &Wizard,
    show_errors: bool,
    error_banner: String,
) -> Response {
    let mut page = page(
        state,
        headers,
        "Create Tenant",
        "tenants",
        &[("Tenants", "/ui/tenants"), ("Create", "/ui/tenants/add")],
    );
    page.error_banner = error_banner;
    let debounce = state.config.editor_debounce();
    render_template(&TenantAddTemplate::build(page, form, wizard, show_errors, debounce))
}

fn log_editor_changes(changed: &[(String, String)]) {
    for (editor, value) in changed {
        debug!("wizard {} committed: {:?}", editor, value);
    }
}

pub async fn handle_add_tenant(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let form = TenantForm::new(state.config.editor_debounce());
    let wizard = form.wizard(0);
    render_tenant_wizard(&state, &headers, &form, &wizard, false, String::new())
}

#[derive(Template)]
#[template(path = "tenant_created.html")]
struct TenantCreatedTemplate {
    page: Page,
    name: String,
    namespace: String,
    detail_url: String,
    credentials: Vec<TenantCredential>,
}

pub async fn handle_add_tenant_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let mut form = TenantForm::from_fields(&fields, state.config.editor_debounce());
    let post = WizardPost::from_fields(&fields);
    let Applied {
        mut wizard,
        outcome,
        changed,
    } = forms::apply(&mut form, &post, Instant::now());
    log_editor_changes(&changed);

    let Outcome::Create = outcome else {
        let show_errors = matches!(outcome, Outcome::Show { show_errors: true });
        return render_tenant_wizard(&state, &headers, &form, &wizard, show_errors, String::new());
    };
    wizard.loading_step = false;

    let req = match form.to_request() {
        Ok(r) => r,
        Err(e) => {
            let step = form.first_invalid_step().unwrap_or(0) as isize;
            return render_tenant_wizard(&state, &headers, &form, &form.wizard(step), true, e.user_message());
        }
    };
    match state.client.create_tenant(&req).await {
        Ok(resp) => {
            info!("created tenant {}/{}", req.namespace, req.name);
            let detail_url = format!("/ui/tenants/{}/{}", req.namespace, req.name);
            let mut page = page(
                &state,
                &headers,
                "Tenant Created",
                "tenants",
                &[("Tenants", "/ui/tenants"), (req.name.as_str(), detail_url.as_str())],
            );
            page.notice_banner = format!("Tenant {} was created.", req.name);
            render_template(&TenantCreatedTemplate {
                page,
                name: req.name,
                namespace: req.namespace,
                detail_url,
                credentials: resp.console,
            })
        }
        Err(e) => {
            warn!("creating tenant {}/{}: {}", req.namespace, req.name, e);
            render_tenant_wizard(&state, &headers, &form, &wizard, false, e.user_message())
        }
    }
}

#[derive(Template)]
#[template(path = "pool_add.html")]
struct PoolAddTemplate {
    page: Page,
    chrome: WizardChrome,
    errors: BTreeMap<String, String>,
    tenant: String,
    namespace: String,
    pool_name: String,
    storage_class: String,
    pool: PoolView,
}

impl PoolAddTemplate {
    fn err(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }
}

fn render_pool_wizard(
    state: &AppState,
    headers: &HeaderMap,
    (namespace, tenant): (&str, &str),
    form: &PoolForm,
    wizard: &Wizard,
    show_errors: bool,
    error_banner: String,
) -> Response {
    let detail_url = format!("/ui/tenants/{}/{}", namespace, tenant);
    let action = format!("{}/pools/add", detail_url);
    let mut page = page(
        state,
        headers,
        "Add Pool",
        "tenants",
        &[
            ("Tenants", "/ui/tenants"),
            (tenant, detail_url.as_str()),
            ("Add Pool", action.as_str()),
        ],
    );
    page.error_banner = error_banner;
    let step = wizard.current();
    render_template(&PoolAddTemplate {
        page,
        chrome: wizard_chrome(&action, wizard, form.hidden_fields(step), state.config.editor_debounce()),
        errors: if show_errors {
            form.field_errors(step)
        } else {
            BTreeMap::new()
        },
        tenant: tenant.to_string(),
        namespace: namespace.to_string(),
        pool_name: form.name.clone(),
        storage_class: form.storage_class.clone(),
        pool: PoolView::from(&form.pool),
    })
}

/// Names of the tenant's pools, or the backend error.
async fn pool_names(state: &AppState, namespace: &str, name: &str) -> Result<Vec<String>, crate::error::ConsoleError> {
    let tenant = state.client.get_tenant(namespace, name).await?;
    Ok(tenant.pools.into_iter().map(|p| p.name).collect())
}

pub async fn handle_add_pool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name)): Path<(String, String)>,
) -> Response {
    let existing = match pool_names(&state, &namespace, &name).await {
        Ok(names) => names,
        Err(e) => {
            warn!("getting tenant {}/{} for a new pool: {}", namespace, name, e);
            return tenant_detail_page(&state, &headers, &namespace, &name, e.user_message()).await;
        }
    };
    let form = PoolForm::new(existing, state.config.editor_debounce());
    let wizard = form.wizard(0);
    render_pool_wizard(&state, &headers, (&namespace, &name), &form, &wizard, false, String::new())
}

pub async fn handle_add_pool_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((namespace, name)): Path<(String, String)>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let existing = match pool_names(&state, &namespace, &name).await {
        Ok(names) => names,
        Err(e) => {
            warn!("getting tenant {}/{} for a new pool: {}", namespace, name, e);
            Vec::new()
        }
    };
    let mut form = PoolForm::from_fields(&fields, existing, state.config.editor_debounce());
    let post = WizardPost::from_fields(&fields);
    let Applied {
        mut wizard,
        outcome,
        changed,
    } = forms::apply(&mut form, &post, Instant::now());
    log_editor_changes(&changed);

    let tenant = (namespace.as_str(), name.as_str());
    let Outcome::Create = outcome else {
        let show_errors = matches!(outcome, Outcome::Show { show_errors: true });
        return render_pool_wizard(&state, &headers, tenant, &form, &wizard, show_errors, String::new());
    };
    wizard.loading_step = false;

    let pool = match form.to_pool() {
        Ok(p) => p,
        Err(e) => {
            return render_pool_wizard(&state, &headers, tenant, &form, &form.wizard(0), true, e.user_message());
        }
    };
    match state.client.add_pool(&namespace, &name, &pool).await {
        Ok(()) => {
            info!("added pool {} to tenant {}/{}", pool.name, namespace, name);
            Redirect::to(&format!("/ui/tenants/{}/{}", namespace, name)).into_response()
        }
        Err(e) => {
            warn!("adding pool {} to {}/{}: {}", pool.name, namespace, name, e);
            render_pool_wizard(&state, &headers, tenant, &form, &wizard, false, e.user_message())
        }
    }
}

// --- PVCs ---

#[derive(Template)]
#[template(path = "pvcs.html")]
struct PvcsTemplate {
    page: Page,
    table_html: String,
}

pub async fn handle_pvcs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let table = TableQuery::from_params(&params).apply(tables::pvcs());
    let links = TableLinks::new("/ui/pvcs", TableQuery::state_of(&table));
    let mut page = page(&state, &headers, "Volumes", "pvcs", &[("Volumes", "/ui/pvcs")]);

    let view = match state.client.list_all_pvcs().await {
        Ok(list) => {
            let mut rows: Vec<PvcRow> = list.pvcs.iter().map(PvcRow::from).collect();
            table.sort_records(&mut rows);
            table.render(&rows, false, state.config.table.container_width)
        }
        Err(e) => {
            warn!("listing PVCs: {}", e);
            page.error_banner = e.user_message();
            failed_view("Volumes")
        }
    };

    render_template(&PvcsTemplate {
        page,
        table_html: widgets::render_table(&view, &links, None, None),
    })
}

// --- Drives ---

#[derive(Template)]
#[template(path = "drives.html")]
struct DrivesTemplate {
    page: Page,
    table_html: String,
    selected_count: usize,
}

pub async fn handle_drives(State(state): State<AppState>, headers: HeaderMap) -> Response {
    drives_page(&state, &headers, Vec::new(), false, String::new(), String::new()).await
}

async fn drives_page(
    state: &AppState,
    headers: &HeaderMap,
    selected: Vec<String>,
    toggle_all: bool,
    error_banner: String,
    notice_banner: String,
) -> Response {
    let mut page = page(state, headers, "Drives", "drives", &[("Drives", "/ui/drives")]);
    page.error_banner = error_banner;
    page.notice_banner = notice_banner;
    let links = TableLinks::new("/ui/drives", String::new());

    let mut selected_count = 0;
    let view = match state.client.list_drives().await {
        Ok(list) => {
            let rows: Vec<DriveRow> = list.drives.iter().map(DriveRow::from).collect();
            let mut selection = tables::checkbox_selection(selected);
            if toggle_all {
                selection.toggle_all(rows.iter().map(|r| r.record_id()));
            }
            selected_count = selection.len();
            tables::drives(selection).render(&rows, false, state.config.table.container_width)
        }
        Err(e) if e.is_not_found() => tables::drives(Default::default()).render(&[], false, 0.0),
        Err(e) => {
            warn!("listing drives: {}", e);
            if page.error_banner.is_empty() {
                page.error_banner = e.user_message();
            }
            failed_view("Drives")
        }
    };

    render_template(&DrivesTemplate {
        page,
        table_html: widgets::render_table(&view, &links, Some((SelectionMode::Checkbox, true)), None),
        selected_count,
    })
}

pub async fn handle_format_drives(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let selected = tables::selected_ids(&fields);
    if fields.get("intent").map(String::as_str) == Some("select_all") {
        return drives_page(&state, &headers, selected, true, String::new(), String::new()).await;
    }

    match state.client.format_drives(selected.clone()).await {
        Ok(resp) if resp.format_issues_list.is_empty() => {
            info!("formatted {} drives", selected.len());
            let notice = format!("Formatting started for {} drive(s).", selected.len());
            drives_page(&state, &headers, Vec::new(), false, String::new(), notice).await
        }
        Ok(resp) => {
            let issues: Vec<String> = resp
                .format_issues_list
                .iter()
                .map(|i| format!("{}:{}: {}", i.node, i.drive, i.error))
                .collect();
            warn!("formatting drives reported issues: {}", issues.join("; "));
            let banner = format!("Some drives could not be formatted: {}", issues.join("; "));
            drives_page(&state, &headers, selected, false, banner, String::new()).await
        }
        Err(e) => {
            warn!("formatting drives: {}", e);
            drives_page(&state, &headers, selected, false, e.user_message(), String::new()).await
        }
    }
}

// --- License ---

#[derive(Template)]
#[template(path = "license.html")]
struct LicenseTemplate {
    page: Page,
    registered: bool,
    organization: String,
    email: String,
    plan: String,
    capacity: String,
    expires_at: String,
    consent: bool,
}

pub async fn handle_license(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut page = page(&state, &headers, "License", "license", &[("License", "/ui/license")]);
    let view = match state.client.license_info().await {
        Ok(license) => LicenseView::from(&license),
        Err(e) if e.is_not_found() => LicenseView::from(&License::default()),
        Err(e) => {
            warn!("fetching license: {}", e);
            page.error_banner = e.user_message();
            LicenseView::from(&License::default())
        }
    };

    render_template(&LicenseTemplate {
        consent: !page.consent_required,
        page,
        registered: view.registered,
        organization: view.organization,
        email: view.email,
        plan: view.plan,
        capacity: view.capacity,
        expires_at: view.expires_at,
    })
}

pub async fn handle_license_consent() -> Response {
    let cookie = format!(
        "{}=true; Path=/; Max-Age=31536000; SameSite=Lax",
        CONSENT_COOKIE
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to("/ui/license")).into_response()
}

// --- Profiling ---

struct ProfileOption {
    value: &'static str,
    label: &'static str,
    checked: bool,
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    page: Page,
    options: Vec<ProfileOption>,
}

pub async fn handle_profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let page = page(&state, &headers, "Profile", "profile", &[("Profile", "/ui/profile")]);
    let options = PROFILE_TYPES
        .iter()
        .map(|&(value, label)| ProfileOption {
            value,
            label,
            checked: value == "cpu",
        })
        .collect();
    render_template(&ProfileTemplate { page, options })
}
