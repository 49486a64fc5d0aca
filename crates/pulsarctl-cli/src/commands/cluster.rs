//! Cluster registration commands.

use async_trait::async_trait;
use clap::{Arg, ArgAction};
use pulsarctl_admin::ClusterData;

use crate::args::ArgumentPolicy;
use crate::client::CliError;
use crate::registry::ResourceGroup;
use crate::verb::{Description, InvocationResult, Payload, Verb, VerbContext, VerbHandler};

const CLUSTER_MESSAGE: &str =
    "the cluster name is not specified or the cluster name is specified more than one";
const PERMISSION: &str = "This command requires super-user permissions.";

const URL: &str = "url";
const URL_SECURE: &str = "url-secure";
const BROKER_URL: &str = "broker-url";
const BROKER_URL_SECURE: &str = "broker-url-secure";
const PEER_CLUSTER: &str = "peer-cluster";

/// Cluster resource group.
#[must_use]
pub fn group() -> ResourceGroup {
    ResourceGroup::new("cluster", "Operations about clusters")
        .alias("clusters")
        .verb(list())
        .verb(get())
        .verb(create())
        .verb(update())
        .verb(delete())
}

fn list() -> Verb {
    Verb::new(
        "list",
        "List the available clusters",
        Description::new("List the available clusters.", PERMISSION)
            .example("List the available clusters", "pulsarctl cluster list")
            .output("normal output", "[ \"standalone\" ]"),
        ArgumentPolicy::none(),
        ListClusters,
    )
}

struct ListClusters;

#[async_trait]
impl VerbHandler for ListClusters {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        Ok(Payload::Json(ctx.admin().list_clusters().await?))
    }
}

fn get() -> Verb {
    Verb::new(
        "get",
        "Get the configuration data of a cluster",
        Description::new(
            "Get the configuration data for the specified cluster.",
            PERMISSION,
        )
        .example(
            "Get the configuration data of a cluster",
            "pulsarctl cluster get (cluster-name)",
        )
        .output(
            "normal output",
            "{\n  \"serviceUrl\" : \"http://localhost:8080\",\n  \"brokerServiceUrl\" : \"pulsar://localhost:6650\"\n}",
        )
        .output(
            "the cluster name is not specified or the cluster name is specified more than one",
            "error: the cluster name is not specified or the cluster name is specified more than one",
        ),
        ArgumentPolicy::exactly(1, CLUSTER_MESSAGE),
        GetCluster,
    )
}

struct GetCluster;

#[async_trait]
impl VerbHandler for GetCluster {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        Ok(Payload::Json(ctx.admin().get_cluster(ctx.name(0)?).await?))
    }
}

fn create() -> Verb {
    with_cluster_flags(Verb::new(
        "create",
        "Add a cluster",
        Description::new("Provisions a new cluster.", PERMISSION)
            .example(
                "Provisions a new cluster",
                "pulsarctl cluster create (cluster-name) --url http://localhost:8080",
            )
            .output("normal output", "Cluster (cluster-name) added")
            .output(
                "no service URL given",
                "error: at least one of --url, --url-secure, --broker-url or --broker-url-secure is required",
            ),
        ArgumentPolicy::exactly(1, CLUSTER_MESSAGE),
        CreateCluster,
    ))
}

struct CreateCluster;

#[async_trait]
impl VerbHandler for CreateCluster {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let name = ctx.name(0)?;
        let data = cluster_data(ctx);
        if !data.has_any_url() {
            return Err(CliError::invalid_value(format!(
                "at least one of --{URL}, --{URL_SECURE}, --{BROKER_URL} or --{BROKER_URL_SECURE} is required"
            )));
        }
        ctx.admin().create_cluster(name, &data).await?;
        Ok(Payload::Message(format!("Cluster {name} added")))
    }
}

fn update() -> Verb {
    with_cluster_flags(Verb::new(
        "update",
        "Update the configuration data of a cluster",
        Description::new(
            "Updates the configuration data for the specified cluster.",
            PERMISSION,
        )
        .example(
            "Updates the service URL of a cluster",
            "pulsarctl cluster update (cluster-name) --url http://example:8080",
        )
        .output("normal output", "Cluster (cluster-name) updated"),
        ArgumentPolicy::exactly(1, CLUSTER_MESSAGE),
        UpdateCluster,
    ))
}

struct UpdateCluster;

#[async_trait]
impl VerbHandler for UpdateCluster {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let name = ctx.name(0)?;
        ctx.admin().update_cluster(name, &cluster_data(ctx)).await?;
        Ok(Payload::Message(format!("Cluster {name} updated")))
    }
}

fn delete() -> Verb {
    Verb::new(
        "delete",
        "Delete a cluster",
        Description::new("Deletes an existing cluster.", PERMISSION)
            .example("Deletes an existing cluster", "pulsarctl cluster delete (cluster-name)")
            .output("normal output", "Cluster (cluster-name) deleted"),
        ArgumentPolicy::exactly(1, CLUSTER_MESSAGE),
        DeleteCluster,
    )
}

struct DeleteCluster;

#[async_trait]
impl VerbHandler for DeleteCluster {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let name = ctx.name(0)?;
        ctx.admin().delete_cluster(name).await?;
        Ok(Payload::Message(format!("Cluster {name} deleted")))
    }
}

fn with_cluster_flags(verb: Verb) -> Verb {
    verb.flag(url_flag(URL, "Pulsar cluster web service URL"))
        .flag(url_flag(URL_SECURE, "Pulsar cluster TLS secured web service URL"))
        .flag(url_flag(BROKER_URL, "Pulsar cluster broker service URL"))
        .flag(url_flag(
            BROKER_URL_SECURE,
            "Pulsar cluster TLS secured broker service URL",
        ))
        .flag(
            Arg::new(PEER_CLUSTER)
                .long(PEER_CLUSTER)
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Clusters peered with this one for replication"),
        )
}

fn url_flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("URL")
        .value_parser(non_empty)
        .help(help)
}

fn non_empty(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("URL must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn cluster_data(ctx: &VerbContext<'_>) -> ClusterData {
    let owned = |id: &str| ctx.flag(id).map(str::to_string);
    ClusterData {
        service_url: owned(URL),
        service_url_tls: owned(URL_SECURE),
        broker_service_url: owned(BROKER_URL),
        broker_service_url_tls: owned(BROKER_URL_SECURE),
        peer_cluster_names: ctx.flag_values(PEER_CLUSTER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsarctl_admin::AdminError;
    use serde_json::{Value, json};

    use crate::commands::registry;
    use crate::commands::test_support::{StubAdmin, invoke};

    #[tokio::test]
    async fn create_sends_the_given_urls() {
        let registry = registry();
        let admin = StubAdmin::returning(Value::Null);
        let payload = invoke(
            &registry,
            "cluster",
            &[
                "create",
                "east",
                "--url",
                "http://east:8080",
                "--broker-url",
                "pulsar://east:6650",
                "--peer-cluster",
                "west,north",
            ],
            &admin,
        )
        .await
        .expect("created");
        assert_eq!(payload, Payload::Message("Cluster east added".into()));
        assert_eq!(admin.calls(), ["create_cluster east"]);
        assert_eq!(
            admin.bodies(),
            [json!({
                "serviceUrl": "http://east:8080",
                "brokerServiceUrl": "pulsar://east:6650",
                "peerClusterNames": ["west", "north"]
            })]
        );
    }

    #[tokio::test]
    async fn create_without_urls_is_rejected_locally() {
        let registry = registry();
        let admin = StubAdmin::returning(Value::Null);
        let err = invoke(&registry, "cluster", &["create", "east"], &admin)
            .await
            .expect_err("no URL");
        assert!(matches!(err, CliError::InvalidValue(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(admin.calls().is_empty());
    }

    #[tokio::test]
    async fn update_allows_partial_data() {
        let registry = registry();
        let admin = StubAdmin::returning(Value::Null);
        invoke(
            &registry,
            "cluster",
            &["update", "east", "--url-secure", "https://east:8443"],
            &admin,
        )
        .await
        .expect("updated");
        assert_eq!(admin.bodies(), [json!({"serviceUrlTls": "https://east:8443"})]);
    }

    #[tokio::test]
    async fn conflicts_are_caller_errors() {
        let registry = registry();
        let admin = StubAdmin::failing(AdminError::status(409, "Cluster already exists"));
        let err = invoke(
            &registry,
            "cluster",
            &["create", "east", "--url", "http://east:8080"],
            &admin,
        )
        .await
        .expect_err("conflict");
        assert_eq!(err.display_message(), "Cluster already exists");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn get_and_delete_take_one_name() {
        let registry = registry();
        let admin = StubAdmin::returning(json!({"serviceUrl": "http://east:8080"}));
        invoke(&registry, "cluster", &["get", "east"], &admin)
            .await
            .expect("fetched");
        let payload = invoke(&registry, "cluster", &["delete", "east"], &admin)
            .await
            .expect("deleted");
        assert_eq!(payload, Payload::Message("Cluster east deleted".into()));

        let err = invoke(&registry, "cluster", &["delete"], &admin)
            .await
            .expect_err("no name");
        assert_eq!(err.display_message(), CLUSTER_MESSAGE);
        assert_eq!(admin.calls(), ["get_cluster east", "delete_cluster east"]);
    }

    #[tokio::test]
    async fn list_returns_the_server_answer() {
        let registry = registry();
        let admin = StubAdmin::returning(json!(["standalone"]));
        let payload = invoke(&registry, "clusters", &["list"], &admin)
            .await
            .expect("listed");
        assert_eq!(payload, Payload::Json(json!(["standalone"])));
    }
}
