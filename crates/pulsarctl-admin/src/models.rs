//! Request bodies sent to the administrative API.
//!
//! Responses are passed through as opaque JSON; only the payloads the CLI has to
//! construct are typed here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Namespace isolation policy submitted for a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceIsolationData {
    /// Namespace regexes the policy applies to.
    pub namespaces: Vec<String>,
    /// Broker regexes preferred for the namespaces.
    pub primary: Vec<String>,
    /// Broker regexes used when primaries are unavailable.
    pub secondary: Vec<String>,
    /// Failover behaviour between primary and secondary brokers.
    pub auto_failover_policy: AutoFailoverPolicy,
}

/// Failover policy attached to a namespace isolation policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFailoverPolicy {
    /// Policy type, e.g. `min_available`.
    pub policy_type: String,
    /// Policy parameters such as `min_limit` and `usage_threshold`.
    pub parameters: BTreeMap<String, String>,
}

/// Cluster registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterData {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Web service URL.
    pub service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Web service URL over TLS.
    pub service_url_tls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Binary protocol URL.
    pub broker_service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Binary protocol URL over TLS.
    pub broker_service_url_tls: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Clusters peered with this one for replication.
    pub peer_cluster_names: Vec<String>,
}

impl ClusterData {
    /// Whether at least one service URL is present.
    #[must_use]
    pub const fn has_any_url(&self) -> bool {
        self.service_url.is_some()
            || self.service_url_tls.is_some()
            || self.broker_service_url.is_some()
            || self.broker_service_url_tls.is_some()
    }
}

/// Tenant registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    /// Roles allowed to administer the tenant.
    pub admin_roles: Vec<String>,
    /// Clusters the tenant may use.
    pub allowed_clusters: Vec<String>,
}
