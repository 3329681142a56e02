pub mod health;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::ConsoleError;
use crate::models::operator::*;

const API_PREFIX: &str = "/api/v1";

/// Typed client for the operator backend's REST API.
pub struct OperatorClient {
    pub base_url: String,
    session_cookie: Option<String>,
    http: Client,
    state: Mutex<ClientState>,
}

struct ClientState {
    healthy: bool,
    last_ping: Option<DateTime<Utc>>,
}

impl OperatorClient {
    pub fn new(base_url: String, session_cookie: Option<String>) -> Result<Self, ConsoleError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ConsoleError::Config(format!("creating HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            session_cookie,
            http,
            state: Mutex::new(ClientState {
                healthy: false,
                last_ping: None,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .header("Accept", "application/json");
        if let Some(cookie) = &self.session_cookie {
            req = req.header("Cookie", cookie);
        }
        req
    }

    fn record_health(&self, healthy: bool) {
        // A poisoned lock only means a panic elsewhere; the flags stay usable.
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.healthy = healthy;
        if healthy {
            state.last_ping = Some(Utc::now());
        }
    }

    pub async fn ping(&self) -> Result<(), ConsoleError> {
        let result = self.send("GET", self.request(Method::GET, "/login"), "/login").await;
        self.record_health(result.is_ok());
        result.map(|_| ())
    }

    pub fn is_healthy(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).healthy
    }

    pub fn last_ping(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).last_ping
    }

    // --- Tenants ---

    pub async fn list_tenants(&self) -> Result<ListTenantsResponse, ConsoleError> {
        self.get_json("/tenants").await
    }

    pub async fn get_tenant(&self, ns: &str, name: &str) -> Result<Tenant, ConsoleError> {
        self.get_json(&format!("/namespaces/{}/tenants/{}", ns, name)).await
    }

    pub async fn create_tenant(
        &self,
        req: &CreateTenantRequest,
    ) -> Result<CreateTenantResponse, ConsoleError> {
        self.post_json("/tenants", req).await
    }

    pub async fn delete_tenant(&self, ns: &str, name: &str) -> Result<(), ConsoleError> {
        self.delete(&format!("/namespaces/{}/tenants/{}", ns, name)).await
    }

    pub async fn list_tenant_pods(&self, ns: &str, name: &str) -> Result<Vec<TenantPod>, ConsoleError> {
        self.get_json(&format!("/namespaces/{}/tenants/{}/pods", ns, name)).await
    }

    pub async fn delete_tenant_pod(&self, ns: &str, name: &str, pod: &str) -> Result<(), ConsoleError> {
        self.delete(&format!("/namespaces/{}/tenants/{}/pods/{}", ns, name, pod))
            .await
    }

    pub async fn list_tenant_pvcs(&self, ns: &str, name: &str) -> Result<ListPvcsResponse, ConsoleError> {
        self.get_json(&format!("/namespaces/{}/tenants/{}/pvcs", ns, name)).await
    }

    pub async fn delete_tenant_pvc(&self, ns: &str, name: &str, pvc: &str) -> Result<(), ConsoleError> {
        self.delete(&format!("/namespaces/{}/tenants/{}/pvc/{}", ns, name, pvc))
            .await
    }

    pub async fn list_tenant_events(&self, ns: &str, name: &str) -> Result<Vec<TenantEvent>, ConsoleError> {
        self.get_json(&format!("/namespaces/{}/tenants/{}/events", ns, name)).await
    }

    pub async fn add_pool(&self, ns: &str, name: &str, pool: &Pool) -> Result<(), ConsoleError> {
        self.post(&format!("/namespaces/{}/tenants/{}/pools", ns, name), pool)
            .await
    }

    pub async fn list_all_pvcs(&self) -> Result<ListPvcsResponse, ConsoleError> {
        self.get_json("/list-pvcs").await
    }

    // --- Local drives ---

    pub async fn list_drives(&self) -> Result<DirectPvDriveList, ConsoleError> {
        self.get_json("/directpv/drives").await
    }

    pub async fn format_drives(&self, drives: Vec<String>) -> Result<FormatDrivesResponse, ConsoleError> {
        if drives.is_empty() {
            return Err(ConsoleError::validation(
                "drives",
                "at least one drive needs to be selected",
            ));
        }
        self.post_json("/directpv/drives/format", &FormatDrivesRequest { drives, force: false })
            .await
    }

    // --- License & diagnostics ---

    pub async fn license_info(&self) -> Result<License, ConsoleError> {
        self.get_json("/subnet/apikey/info").await
    }

    /// Collects a profiling archive (zip) for the given profiler types.
    pub async fn profile(&self, types: &[String]) -> Result<Vec<u8>, ConsoleError> {
        let path = format!("/profile?types={}", types.join(","));
        let resp = self.send("GET", self.request(Method::GET, &path), &path).await?;
        let bytes = resp.bytes().await.map_err(|source| ConsoleError::Decode {
            path: path.clone(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    async fn send(
        &self,
        method: &'static str,
        req: RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ConsoleError> {
        let resp = req.send().await.map_err(|source| ConsoleError::Request {
            method,
            path: path.to_string(),
            source,
        })?;

        if resp.status().as_u16() >= 400 {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ConsoleError::from_status(method, path, status, &body));
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let resp = self.send("GET", self.request(Method::GET, path), path).await?;
        resp.json().await.map_err(|source| ConsoleError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ConsoleError> {
        let req = self.request(Method::POST, path).json(body);
        let resp = self.send("POST", req, path).await?;
        resp.json().await.map_err(|source| ConsoleError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn post(&self, path: &str, body: &impl serde::Serialize) -> Result<(), ConsoleError> {
        let req = self.request(Method::POST, path).json(body);
        self.send("POST", req, path).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        self.send("DELETE", self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}
