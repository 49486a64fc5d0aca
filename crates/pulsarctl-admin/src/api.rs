//! The administrative surface the CLI programs against.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AdminResult;
use crate::models::{ClusterData, NamespaceIsolationData, TenantInfo};

/// Administrative operations against brokers and bookies.
///
/// Each method maps to one REST call. Responses the CLI only displays are
/// returned as opaque [`Value`]s so their schema stays owned by the server.
#[async_trait]
pub trait PulsarAdmin: Send + Sync {
    /// Delete a ledger from the bookie cluster.
    async fn delete_ledger(&self, ledger_id: i64) -> AdminResult<()>;

    /// Fetch the metadata of a ledger.
    async fn get_ledger_metadata(&self, ledger_id: i64) -> AdminResult<Value>;

    /// List ledgers, optionally with their metadata.
    async fn list_ledgers(&self, print_metadata: bool) -> AdminResult<Value>;

    /// Fetch one namespace isolation policy of a cluster.
    async fn get_ns_isolation_policy(&self, cluster: &str, policy: &str) -> AdminResult<Value>;

    /// List the namespace isolation policies of a cluster.
    async fn list_ns_isolation_policies(&self, cluster: &str) -> AdminResult<Value>;

    /// Create or replace a namespace isolation policy.
    async fn set_ns_isolation_policy(
        &self,
        cluster: &str,
        policy: &str,
        data: &NamespaceIsolationData,
    ) -> AdminResult<()>;

    /// Delete a namespace isolation policy.
    async fn delete_ns_isolation_policy(&self, cluster: &str, policy: &str) -> AdminResult<()>;

    /// List brokers of a cluster together with the isolation policies they match.
    async fn list_brokers_with_ns_isolation_policy(&self, cluster: &str) -> AdminResult<Value>;

    /// Fetch the isolation policies matched by one broker.
    async fn get_broker_with_ns_isolation_policy(
        &self,
        cluster: &str,
        broker: &str,
    ) -> AdminResult<Value>;

    /// List cluster names.
    async fn list_clusters(&self) -> AdminResult<Value>;

    /// Fetch a cluster's configuration.
    async fn get_cluster(&self, cluster: &str) -> AdminResult<Value>;

    /// Register a new cluster.
    async fn create_cluster(&self, cluster: &str, data: &ClusterData) -> AdminResult<()>;

    /// Update an existing cluster.
    async fn update_cluster(&self, cluster: &str, data: &ClusterData) -> AdminResult<()>;

    /// Remove a cluster.
    async fn delete_cluster(&self, cluster: &str) -> AdminResult<()>;

    /// List tenant names.
    async fn list_tenants(&self) -> AdminResult<Value>;

    /// Fetch a tenant's configuration.
    async fn get_tenant(&self, tenant: &str) -> AdminResult<Value>;

    /// Create a tenant.
    async fn create_tenant(&self, tenant: &str, info: &TenantInfo) -> AdminResult<()>;

    /// Delete a tenant.
    async fn delete_tenant(&self, tenant: &str) -> AdminResult<()>;
}
