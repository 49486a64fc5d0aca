//! `reqwest` implementation of [`PulsarAdmin`].
//!
//! # Design
//! - Broker calls go to the web service URL, ledger calls to the bookie HTTP
//!   service; both are configured independently.
//! - Non-success responses are decoded into [`AdminError::Status`] with the
//!   server's `reason` text so classification can rely on the status code.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::PulsarAdmin;
use crate::error::{AdminError, AdminResult};
use crate::models::{ClusterData, NamespaceIsolationData, TenantInfo};

/// Header carrying the per-invocation trace identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

const ADMIN_ROOT: [&str; 2] = ["admin", "v2"];
const LEDGER_ROOT: [&str; 3] = ["api", "v1", "ledger"];

/// Connection settings for [`HttpAdmin`].
#[derive(Debug, Clone)]
pub struct HttpAdminConfig {
    /// Broker web service URL.
    pub web_service_url: Url,
    /// Bookie HTTP service URL.
    pub bookie_service_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Trace identifier sent as `x-request-id` on every request.
    pub request_id: Option<String>,
}

/// Administrative client speaking the broker and bookie REST APIs.
#[derive(Debug, Clone)]
pub struct HttpAdmin {
    client: Client,
    web_service_url: Url,
    bookie_service_url: Url,
}

/// Error body returned by the broker REST API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    reason: Option<String>,
    message: Option<String>,
}

impl HttpAdmin {
    /// Build a client from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Transport`] when the underlying HTTP client cannot
    /// be constructed or the request identifier is not a valid header value.
    pub fn new(config: HttpAdminConfig) -> AdminResult<Self> {
        let mut default_headers = HeaderMap::new();
        if let Some(request_id) = &config.request_id {
            let value = HeaderValue::from_str(request_id).map_err(|_| {
                AdminError::transport("trace identifier contains invalid characters")
            })?;
            default_headers.insert(HEADER_REQUEST_ID, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| AdminError::transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            web_service_url: config.web_service_url,
            bookie_service_url: config.bookie_service_url,
        })
    }

    fn admin_url(&self, segments: &[&str]) -> AdminResult<Url> {
        endpoint(&self.web_service_url, &ADMIN_ROOT, segments)
    }

    fn ledger_url(&self, action: &str, query: &[(&str, String)]) -> AdminResult<Url> {
        // Bookie endpoints are registered with a trailing slash.
        let mut url = endpoint(&self.bookie_service_url, &LEDGER_ROOT, &[action, ""])?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn isolation_url(&self, cluster: &str, rest: &[&str]) -> AdminResult<Url> {
        let mut segments = vec!["clusters", cluster, "namespaceIsolationPolicies"];
        segments.extend_from_slice(rest);
        self.admin_url(&segments)
    }

    async fn get_json(&self, url: Url) -> AdminResult<Value> {
        let response = self.send(self.client.get(url)).await?;
        read_json(response).await
    }

    async fn delete(&self, url: Url) -> AdminResult<()> {
        self.send(self.client.delete(url)).await.map(drop)
    }

    async fn put_json<T: Serialize + Sync>(&self, url: Url, body: &T) -> AdminResult<()> {
        self.send(self.client.put(url).json(body)).await.map(drop)
    }

    async fn post_json<T: Serialize + Sync>(&self, url: Url, body: &T) -> AdminResult<()> {
        self.send(self.client.post(url).json(body)).await.map(drop)
    }

    async fn send(&self, request: RequestBuilder) -> AdminResult<Response> {
        let request = request.build().map_err(AdminError::from)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "admin request");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| AdminError::transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

#[async_trait]
impl PulsarAdmin for HttpAdmin {
    async fn delete_ledger(&self, ledger_id: i64) -> AdminResult<()> {
        let url = self.ledger_url("delete", &[("ledger_id", ledger_id.to_string())])?;
        self.delete(url).await
    }

    async fn get_ledger_metadata(&self, ledger_id: i64) -> AdminResult<Value> {
        let url = self.ledger_url("metadata", &[("ledger_id", ledger_id.to_string())])?;
        self.get_json(url).await
    }

    async fn list_ledgers(&self, print_metadata: bool) -> AdminResult<Value> {
        let url = self.ledger_url("list", &[("print_metadata", print_metadata.to_string())])?;
        self.get_json(url).await
    }

    async fn get_ns_isolation_policy(&self, cluster: &str, policy: &str) -> AdminResult<Value> {
        let url = self.isolation_url(cluster, &[policy])?;
        self.get_json(url).await
    }

    async fn list_ns_isolation_policies(&self, cluster: &str) -> AdminResult<Value> {
        let url = self.isolation_url(cluster, &[])?;
        self.get_json(url).await
    }

    async fn set_ns_isolation_policy(
        &self,
        cluster: &str,
        policy: &str,
        data: &NamespaceIsolationData,
    ) -> AdminResult<()> {
        let url = self.isolation_url(cluster, &[policy])?;
        self.post_json(url, data).await
    }

    async fn delete_ns_isolation_policy(&self, cluster: &str, policy: &str) -> AdminResult<()> {
        let url = self.isolation_url(cluster, &[policy])?;
        self.delete(url).await
    }

    async fn list_brokers_with_ns_isolation_policy(&self, cluster: &str) -> AdminResult<Value> {
        let url = self.isolation_url(cluster, &["brokers"])?;
        self.get_json(url).await
    }

    async fn get_broker_with_ns_isolation_policy(
        &self,
        cluster: &str,
        broker: &str,
    ) -> AdminResult<Value> {
        let url = self.isolation_url(cluster, &["brokers", broker])?;
        self.get_json(url).await
    }

    async fn list_clusters(&self) -> AdminResult<Value> {
        let url = self.admin_url(&["clusters"])?;
        self.get_json(url).await
    }

    async fn get_cluster(&self, cluster: &str) -> AdminResult<Value> {
        let url = self.admin_url(&["clusters", cluster])?;
        self.get_json(url).await
    }

    async fn create_cluster(&self, cluster: &str, data: &ClusterData) -> AdminResult<()> {
        let url = self.admin_url(&["clusters", cluster])?;
        self.put_json(url, data).await
    }

    async fn update_cluster(&self, cluster: &str, data: &ClusterData) -> AdminResult<()> {
        let url = self.admin_url(&["clusters", cluster])?;
        self.post_json(url, data).await
    }

    async fn delete_cluster(&self, cluster: &str) -> AdminResult<()> {
        let url = self.admin_url(&["clusters", cluster])?;
        self.delete(url).await
    }

    async fn list_tenants(&self) -> AdminResult<Value> {
        let url = self.admin_url(&["tenants"])?;
        self.get_json(url).await
    }

    async fn get_tenant(&self, tenant: &str) -> AdminResult<Value> {
        let url = self.admin_url(&["tenants", tenant])?;
        self.get_json(url).await
    }

    async fn create_tenant(&self, tenant: &str, info: &TenantInfo) -> AdminResult<()> {
        let url = self.admin_url(&["tenants", tenant])?;
        self.put_json(url, info).await
    }

    async fn delete_tenant(&self, tenant: &str) -> AdminResult<()> {
        let url = self.admin_url(&["tenants", tenant])?;
        self.delete(url).await
    }
}

fn endpoint(base: &Url, root: &[&str], segments: &[&str]) -> AdminResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AdminError::InvalidUrl {
            message: format!("{base} cannot be used as a service URL"),
        })?
        .pop_if_empty()
        .extend(root)
        .extend(segments);
    Ok(url)
}

async fn read_json(response: Response) -> AdminResult<Value> {
    let bytes = response
        .bytes()
        .await
        .map_err(|err| AdminError::transport(err.to_string()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| AdminError::decode(format!("failed to parse response body: {err}")))
}

/// Decode a non-success response into a status error.
async fn error_from_response(response: Response) -> AdminError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let body = serde_json::from_slice::<ErrorBody>(&bytes).ok();

    let reason = body
        .and_then(|body| body.reason.or(body.message))
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or_else(|| {
            if body_text.is_empty() {
                format!("request failed with status {status}")
            } else {
                body_text
            }
        });

    AdminError::status(status.as_u16(), reason)
}
