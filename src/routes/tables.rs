//! Column and action definitions for each table the console shows, and
//! the query-string state (sort, shown columns, scroll offset) that
//! survives between page loads.

use std::collections::HashMap;

use crate::components::table::{
    ActionKind, ActionTarget, Align, Column, DataTable, ItemAction, Selection, SelectionMode,
    SortDirection, SortState,
};
use crate::models::views::{DriveRow, EventRow, PodRow, PoolRow, PvcRow, TenantRow};

pub const TENANT_DEFAULT_COLUMNS: [&str; 6] = ["name", "namespace", "health", "pools", "capacity", "usage"];

pub fn tenants() -> DataTable<TenantRow> {
    DataTable::new(
        "tenants",
        vec![
            Column::new("Name", "name", |t: &TenantRow| t.name.clone()).sortable(),
            Column::new("Namespace", "namespace", |t: &TenantRow| t.namespace.clone()).sortable(),
            Column::new("State", "state", |t: &TenantRow| t.state.clone()).sortable(),
            Column::new("Health", "health", |t: &TenantRow| t.health.clone())
                .width(100.0)
                .badge(|t: &TenantRow| t.health_class.clone())
                .sortable(),
            Column::new("Pools", "pools", |t: &TenantRow| t.pools.to_string())
                .width(80.0)
                .align(Align::Right)
                .sortable(),
            Column::new("Instances", "instances", |t: &TenantRow| t.instances.to_string())
                .width(90.0)
                .align(Align::Right)
                .sortable(),
            Column::new("Volumes", "volumes", |t: &TenantRow| t.volumes.to_string())
                .width(90.0)
                .align(Align::Right)
                .sortable(),
            Column::new("Capacity", "capacity", |t: &TenantRow| t.capacity.clone()).width(110.0),
            Column::new("Usage", "usage", |t: &TenantRow| {
                format!("{} ({})", t.usage, t.usage_percent)
            }),
            Column::new("Age", "age", |t: &TenantRow| t.age.clone()).width(80.0),
        ],
    )
    .with_actions(vec![
        ItemAction::view("/ui/tenants").disabled_when(|t: &TenantRow| t.deleting),
        ItemAction::new(
            ActionKind::Delete,
            "Delete",
            ActionTarget::Submit("/ui/tenants/delete".to_string()),
        )
        .disabled_when(|t: &TenantRow| t.deleting)
        .loading_when(|t: &TenantRow| t.deleting),
    ])
    .with_columns_selector(TENANT_DEFAULT_COLUMNS.iter().map(|k| k.to_string()))
    .with_empty_message("There are no tenants yet. Use Create Tenant to add one.")
}

pub fn pools() -> DataTable<PoolRow> {
    DataTable::new(
        "pools",
        vec![
            Column::new("Name", "name", |p: &PoolRow| p.name.clone()),
            Column::new("Servers", "servers", |p: &PoolRow| p.servers.to_string())
                .width(90.0)
                .align(Align::Right),
            Column::new("Volumes/Server", "volumes_per_server", |p: &PoolRow| {
                p.volumes_per_server.to_string()
            })
            .width(130.0)
            .align(Align::Right),
            Column::new("Total Volumes", "total_volumes", |p: &PoolRow| p.total_volumes.to_string())
                .width(120.0)
                .align(Align::Right),
            Column::new("Volume Size", "volume_size", |p: &PoolRow| p.volume_size.clone()).width(110.0),
            Column::new("Storage Class", "storage_class", |p: &PoolRow| p.storage_class.clone()),
        ],
    )
}

/// Pods of one tenant; delete posts to the tenant's pod delete route.
pub fn pods(namespace: &str, tenant: &str) -> DataTable<PodRow> {
    DataTable::new(
        "pods",
        vec![
            Column::new("Name", "name", |p: &PodRow| p.name.clone()).sortable(),
            Column::new("Status", "status", |p: &PodRow| p.status.clone())
                .width(100.0)
                .badge(|p: &PodRow| p.status_class.clone())
                .sortable(),
            Column::new("IP", "ip", |p: &PodRow| p.ip.clone()).width(130.0),
            Column::new("Restarts", "restarts", |p: &PodRow| p.restarts.to_string())
                .width(90.0)
                .align(Align::Right)
                .sortable(),
            Column::new("Node", "node", |p: &PodRow| p.node.clone()).sortable(),
            Column::new("Age", "age", |p: &PodRow| p.age.clone()).width(80.0),
        ],
    )
    .with_actions(vec![ItemAction::new(
        ActionKind::Delete,
        "Delete",
        ActionTarget::Submit(format!("/ui/tenants/{}/{}/pods/delete", namespace, tenant)),
    )])
    .with_empty_message("No pods are running for this tenant.")
}

/// Volumes of one tenant, with a delete action. Ids are `namespace/name`,
/// so the delete route ends in both.
pub fn tenant_pvcs(namespace: &str, tenant: &str) -> DataTable<PvcRow> {
    pvcs()
        .with_actions(vec![ItemAction::new(
            ActionKind::Delete,
            "Delete",
            ActionTarget::Submit(format!("/ui/tenants/{}/{}/pvcs/delete", namespace, tenant)),
        )])
        .with_empty_message("This tenant has no volumes.")
}

pub fn events() -> DataTable<EventRow> {
    DataTable::new(
        "events",
        vec![
            Column::new("Type", "type", |e: &EventRow| e.event_type.clone())
                .width(100.0)
                .badge(|e: &EventRow| e.type_class.clone()),
            Column::new("Reason", "reason", |e: &EventRow| e.reason.clone()).width(160.0),
            Column::new("Age", "age", |e: &EventRow| e.seen.clone()).width(80.0),
            Column::new("Message", "message", |e: &EventRow| e.message.clone()),
        ],
    )
    .with_empty_message("No events recorded for this tenant.")
}

pub fn pvcs() -> DataTable<PvcRow> {
    let mut table = DataTable::new(
        "PVCs",
        vec![
            Column::new("Name", "name", |p: &PvcRow| p.name.clone()).sortable(),
            Column::new("Namespace", "namespace", |p: &PvcRow| p.namespace.clone()).sortable(),
            Column::new("Status", "status", |p: &PvcRow| p.status.clone()).width(90.0),
            Column::new("Tenant", "tenant", |p: &PvcRow| p.tenant.clone()).sortable(),
            Column::new("Volume", "volume", |p: &PvcRow| p.volume.clone()),
            Column::new("Capacity", "capacity", |p: &PvcRow| p.capacity.clone()).width(90.0),
            Column::new("Storage Class", "storage_class", |p: &PvcRow| p.storage_class.clone()),
            Column::new("Age", "age", |p: &PvcRow| p.age.clone()).width(80.0),
        ],
    );
    table.text_selectable = true;
    table
}

pub fn drives(selection: Selection) -> DataTable<DriveRow> {
    DataTable::new(
        "drives",
        vec![
            Column::new("Drive", "drive", |d: &DriveRow| d.drive.clone()).sortable(),
            Column::new("Node", "node", |d: &DriveRow| d.node.clone()).sortable(),
            Column::new("Capacity", "capacity", |d: &DriveRow| d.capacity.clone()).width(110.0),
            Column::new("Allocated", "allocated", |d: &DriveRow| d.allocated.clone()).width(110.0),
            Column::new("Volumes", "volumes", |d: &DriveRow| d.volumes.to_string())
                .width(90.0)
                .align(Align::Right)
                .sortable(),
            Column::new("Status", "status", |d: &DriveRow| d.status.clone())
                .width(110.0)
                .sortable(),
            Column::new("Message", "message", |d: &DriveRow| d.message.clone()),
        ],
    )
    .with_selection(selection)
    .with_empty_message("No drives found. Is DirectPV installed on this cluster?")
    .with_loading_message("Scanning drives...")
}

/// Ids of the rows ticked in a posted table form (`select-<index>` fields).
pub fn selected_ids(fields: &HashMap<String, String>) -> Vec<String> {
    let mut picked: Vec<(usize, &String)> = fields
        .iter()
        .filter_map(|(k, v)| Some((k.strip_prefix("select-")?.parse().ok()?, v)))
        .collect();
    picked.sort();
    picked.into_iter().map(|(_, v)| v.clone()).collect()
}

pub fn checkbox_selection(ids: Vec<String>) -> Selection {
    Selection::new(SelectionMode::Checkbox)
        .with_select_all()
        .with_selected(ids)
}

/// Table state carried in the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub sort: Option<SortState>,
    /// Column clicked since the last render; flips or moves the sort.
    pub click: Option<String>,
    pub columns: Option<Vec<String>>,
    pub top: u32,
}

impl TableQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let sort = params
            .get("sort")
            .filter(|s| !s.is_empty())
            .map(|column| SortState {
                column: column.clone(),
                direction: params
                    .get("dir")
                    .map(|d| SortDirection::parse(d))
                    .unwrap_or(SortDirection::Asc),
            });

        // The column selector form posts one checkbox per shown column.
        let columns = if params.contains_key("cols_form") {
            let mut keys: Vec<String> = params
                .keys()
                .filter_map(|k| k.strip_prefix("col-"))
                .map(str::to_string)
                .collect();
            keys.sort();
            Some(keys)
        } else {
            params.get("cols").map(|c| {
                c.split(',')
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
        };

        TableQuery {
            sort,
            click: params.get("click").filter(|c| !c.is_empty()).cloned(),
            columns,
            top: params.get("top").and_then(|t| t.parse().ok()).unwrap_or(0),
        }
    }

    /// Applies sort, click and column visibility to `table`.
    pub fn apply<R: crate::components::table::TableRecord>(&self, mut table: DataTable<R>) -> DataTable<R> {
        if let Some(sort) = &self.sort {
            table = table.with_sort(sort.clone());
        }
        if let Some(key) = &self.click {
            table.trigger_sort(key);
        }
        if let Some(shown) = &self.columns {
            let keys: Vec<String> = table.columns().iter().map(|c| c.key.clone()).collect();
            for key in keys {
                table.set_column_shown(&key, shown.contains(&key));
            }
        }
        table
    }

    /// Query string that reproduces `table`'s sort and shown columns.
    pub fn state_of<R: crate::components::table::TableRecord>(table: &DataTable<R>) -> String {
        let mut parts = Vec::new();
        if let Some(sort) = &table.sort {
            parts.push(format!("sort={}", sort.column));
            parts.push(format!("dir={}", sort.direction.as_str()));
        }
        let choices = table.column_choices();
        if !choices.is_empty() {
            let shown: Vec<&str> = choices
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.key.as_str())
                .collect();
            parts.push(format!("cols={}", shown.join(",")));
        }
        parts.join("&")
    }
}
