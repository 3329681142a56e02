use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Records exchanged with the operator backend. Field names follow the
// backend's JSON, which mixes snake_case and camelCase.

// --- Tenants ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantList {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub pool_count: i64,
    #[serde(default)]
    pub instance_count: i64,
    #[serde(default)]
    pub volume_count: i64,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub capacity_usage: i64,
    #[serde(default)]
    pub capacity_raw: i64,
    #[serde(default)]
    pub capacity_raw_usage: i64,
    #[serde(default, rename = "currentState")]
    pub current_state: String,
    #[serde(default)]
    pub health_status: String,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub deletion_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListTenantsResponse {
    #[serde(default)]
    pub tenants: Vec<TenantList>,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tenant {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "currentState")]
    pub current_state: String,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub endpoints: Option<TenantEndpoints>,
    #[serde(default, rename = "encryptionEnabled")]
    pub encryption_enabled: bool,
    #[serde(default, rename = "idpOidcEnabled")]
    pub idp_oidc_enabled: bool,
    #[serde(default, rename = "idpAdEnabled")]
    pub idp_ad_enabled: bool,
    #[serde(default, rename = "minioTLS")]
    pub minio_tls: bool,
    #[serde(default)]
    pub status: Option<TenantStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantEndpoints {
    #[serde(default)]
    pub minio: String,
    #[serde(default)]
    pub console: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantStatus {
    #[serde(default)]
    pub write_quorum: i32,
    #[serde(default)]
    pub drives_online: i32,
    #[serde(default)]
    pub drives_offline: i32,
    #[serde(default)]
    pub drives_healing: i32,
    #[serde(default)]
    pub health_status: String,
}

// --- Pools ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Pool {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub servers: i64,
    pub volumes_per_server: i32,
    pub volume_configuration: VolumeConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VolumeConfiguration {
    pub size: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_class_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

// --- Pods & PVCs ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TenantPod {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub time_created: i64,
    #[serde(default, rename = "podIP")]
    pub pod_ip: String,
    #[serde(default)]
    pub restarts: i64,
    #[serde(default)]
    pub node: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PvcsListResponse {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub capacity: String,
    #[serde(default, rename = "storageClass")]
    pub storage_class: String,
    #[serde(default)]
    pub age: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListPvcsResponse {
    #[serde(default)]
    pub pvcs: Vec<PvcsListResponse>,
}

// --- Events ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantEvent {
    #[serde(default)]
    pub namespace: String,
    /// Unix seconds.
    #[serde(default)]
    pub last_seen: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub reason: String,
}

// --- Local drives ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DirectPvDrive {
    #[serde(default)]
    pub drive: String,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub allocated: i64,
    #[serde(default)]
    pub volumes: i64,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl DirectPvDrive {
    /// Drives are addressed as `node:drive` since paths repeat across nodes.
    pub fn join_name(&self) -> String {
        format!("{}:{}", self.node, self.drive)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DirectPvDriveList {
    #[serde(default)]
    pub drives: Vec<DirectPvDrive>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormatDrivesRequest {
    pub drives: Vec<String>,
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormatDriveError {
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub drive: String,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormatDrivesResponse {
    #[serde(default)]
    pub format_issues_list: Vec<FormatDriveError>,
}

// --- License ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct License {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub account_id: i64,
    #[serde(default)]
    pub storage_capacity: i64,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub expires_at: String,
}

// --- Tenant creation ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateTenantRequest {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    pub pools: Vec<Pool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<DomainsConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DomainsConfiguration {
    #[serde(default)]
    pub minio: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub console: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateTenantResponse {
    #[serde(default)]
    pub console: Vec<TenantCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantCredential {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_list_from_backend_json() {
        let body = r#"{
            "tenants": [{
                "name": "storage-lite",
                "namespace": "tenant-lite",
                "pool_count": 1,
                "instance_count": 4,
                "volume_count": 16,
                "capacity": 1073741824,
                "capacity_usage": 536870912,
                "currentState": "Initialized",
                "health_status": "green",
                "creation_date": "2024-03-01T10:00:00Z"
            }],
            "total": 1
        }"#;
        let resp: ListTenantsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.total, 1);
        let t = &resp.tenants[0];
        assert_eq!(t.name, "storage-lite");
        assert_eq!(t.current_state, "Initialized");
        assert_eq!(t.instance_count, 4);
        assert_eq!(t.deletion_date, "");
    }

    #[test]
    fn test_pod_and_pvc_field_names() {
        let pod: TenantPod = serde_json::from_str(
            r#"{"name":"pool-0-0","status":"Running","timeCreated":1700000000,"podIP":"10.0.0.4","restarts":2,"node":"worker-1"}"#,
        )
        .unwrap();
        assert_eq!(pod.pod_ip, "10.0.0.4");
        assert_eq!(pod.time_created, 1700000000);

        let pvcs: ListPvcsResponse = serde_json::from_str(
            r#"{"pvcs":[{"name":"data0-pool-0-0","storageClass":"standard","capacity":"10Gi"}]}"#,
        )
        .unwrap();
        assert_eq!(pvcs.pvcs[0].storage_class, "standard");
    }

    #[test]
    fn test_event_list() {
        let events: Vec<TenantEvent> = serde_json::from_str(
            r#"[{"namespace":"ns","last_seen":1700000000,"message":"Pool pool-0 created","event_type":"Normal","reason":"PoolCreated"}]"#,
        )
        .unwrap();
        assert_eq!(events[0].event_type, "Normal");
        assert_eq!(events[0].last_seen, 1700000000);
    }

    #[test]
    fn test_create_request_omits_empty_fields() {
        let req = CreateTenantRequest {
            name: "t1".to_string(),
            namespace: "ns".to_string(),
            pools: vec![Pool {
                servers: 4,
                volumes_per_server: 2,
                volume_configuration: VolumeConfiguration {
                    size: 1024,
                    ..Default::default()
                },
                ..Default::default()
            }],
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("image").is_none());
        assert!(v.get("domains").is_none());
        assert!(v["pools"][0].get("name").is_none());
        assert!(v["pools"][0]["volume_configuration"].get("labels").is_none());
        assert_eq!(v["pools"][0]["servers"], 4);
    }
}
