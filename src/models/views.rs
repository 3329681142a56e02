use chrono::{DateTime, Utc};

use crate::components::table::TableRecord;
use crate::helpers::{human_bytes, parse_age, unix_age, usage_percent};
use crate::models::operator;

#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub tenant_count: usize,
    pub healthy_tenants: usize,
    pub pool_count: i64,
    pub drive_count: usize,
    pub backend_healthy: bool,
    pub last_ping: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct TenantRow {
    pub namespace: String,
    pub name: String,
    pub state: String,
    pub health: String,
    pub health_class: String,
    pub pools: i64,
    pub instances: i64,
    pub volumes: i64,
    pub capacity: String,
    pub usage: String,
    pub usage_percent: String,
    pub age: String,
    pub deleting: bool,
}

impl TableRecord for TenantRow {
    fn record_id(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

pub fn health_class(health: &str) -> &'static str {
    match health {
        "green" => "badge-success",
        "yellow" => "badge-warning",
        "red" => "badge-error",
        _ => "badge-info",
    }
}

impl From<&operator::TenantList> for TenantRow {
    fn from(t: &operator::TenantList) -> Self {
        // Older backends only report raw capacity.
        let (capacity, used) = if t.capacity > 0 {
            (t.capacity, t.capacity_usage)
        } else {
            (t.capacity_raw, t.capacity_raw_usage)
        };
        let health = if t.health_status.is_empty() {
            "unknown".to_string()
        } else {
            t.health_status.clone()
        };
        TenantRow {
            namespace: t.namespace.clone(),
            name: t.name.clone(),
            state: t.current_state.clone(),
            health_class: health_class(&health).to_string(),
            health,
            pools: t.pool_count,
            instances: t.instance_count,
            volumes: t.volume_count,
            capacity: human_bytes(capacity),
            usage: human_bytes(used),
            usage_percent: usage_percent(used, capacity),
            age: parse_age(&t.creation_date),
            deleting: !t.deletion_date.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PoolRow {
    pub name: String,
    pub servers: i64,
    pub volumes_per_server: i32,
    pub volume_size: String,
    pub total_volumes: i64,
    pub storage_class: String,
}

impl TableRecord for PoolRow {
    fn record_id(&self) -> String {
        self.name.clone()
    }
}

impl From<&operator::Pool> for PoolRow {
    fn from(p: &operator::Pool) -> Self {
        PoolRow {
            name: p.name.clone(),
            servers: p.servers,
            volumes_per_server: p.volumes_per_server,
            volume_size: human_bytes(p.volume_configuration.size),
            total_volumes: p.servers * p.volumes_per_server as i64,
            storage_class: p.volume_configuration.storage_class_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PodRow {
    pub name: String,
    pub status: String,
    pub status_class: String,
    pub ip: String,
    pub restarts: i64,
    pub node: String,
    pub age: String,
}

impl TableRecord for PodRow {
    fn record_id(&self) -> String {
        self.name.clone()
    }
}

impl From<&operator::TenantPod> for PodRow {
    fn from(p: &operator::TenantPod) -> Self {
        PodRow {
            name: p.name.clone(),
            status_class: match p.status.as_str() {
                "Running" => "badge-success",
                "Pending" => "badge-warning",
                "Failed" => "badge-error",
                _ => "badge-info",
            }
            .to_string(),
            status: p.status.clone(),
            ip: p.pod_ip.clone(),
            restarts: p.restarts,
            node: p.node.clone(),
            age: unix_age(p.time_created),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PvcRow {
    pub namespace: String,
    pub name: String,
    pub status: String,
    pub volume: String,
    pub tenant: String,
    pub capacity: String,
    pub storage_class: String,
    pub age: String,
}

impl TableRecord for PvcRow {
    fn record_id(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl From<&operator::PvcsListResponse> for PvcRow {
    fn from(p: &operator::PvcsListResponse) -> Self {
        PvcRow {
            namespace: p.namespace.clone(),
            name: p.name.clone(),
            status: p.status.clone(),
            volume: p.volume.clone(),
            tenant: p.tenant.clone(),
            capacity: p.capacity.clone(),
            storage_class: p.storage_class.clone(),
            age: p.age.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriveRow {
    pub join_name: String,
    pub drive: String,
    pub node: String,
    pub capacity: String,
    pub allocated: String,
    pub volumes: i64,
    pub status: String,
    pub message: String,
}

impl TableRecord for DriveRow {
    fn record_id(&self) -> String {
        self.join_name.clone()
    }
}

impl From<&operator::DirectPvDrive> for DriveRow {
    fn from(d: &operator::DirectPvDrive) -> Self {
        DriveRow {
            join_name: d.join_name(),
            drive: d.drive.clone(),
            node: d.node.clone(),
            capacity: human_bytes(d.capacity),
            allocated: human_bytes(d.allocated),
            volumes: d.volumes,
            status: d.status.clone(),
            message: d.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventRow {
    pub event_type: String,
    pub type_class: String,
    pub reason: String,
    pub seen: String,
    pub last_seen: i64,
    pub message: String,
}

impl TableRecord for EventRow {
    fn record_id(&self) -> String {
        format!("{}-{}", self.last_seen, self.reason)
    }
}

impl From<&operator::TenantEvent> for EventRow {
    fn from(e: &operator::TenantEvent) -> Self {
        EventRow {
            type_class: match e.event_type.as_str() {
                "Warning" => "badge-warning",
                _ => "badge-info",
            }
            .to_string(),
            event_type: e.event_type.clone(),
            reason: e.reason.clone(),
            seen: unix_age(e.last_seen),
            last_seen: e.last_seen,
            message: e.message.clone(),
        }
    }
}

/// Event rows, most recent first.
pub fn event_rows(events: &[operator::TenantEvent]) -> Vec<EventRow> {
    let mut rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
    rows.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    rows
}

#[derive(Debug, Clone, Default)]
pub struct LicenseView {
    pub registered: bool,
    pub organization: String,
    pub email: String,
    pub plan: String,
    pub capacity: String,
    pub expires_at: String,
}

impl From<&operator::License> for LicenseView {
    fn from(l: &operator::License) -> Self {
        LicenseView {
            registered: !l.plan.is_empty() || l.account_id > 0,
            organization: l.organization.clone(),
            email: l.email.clone(),
            plan: if l.plan.is_empty() {
                "community".to_string()
            } else {
                l.plan.clone()
            },
            capacity: human_bytes(l.storage_capacity),
            expires_at: l.expires_at.clone(),
        }
    }
}
