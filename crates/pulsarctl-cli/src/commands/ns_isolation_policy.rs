//! Namespace isolation policy commands.
//!
//! Every verb addresses a cluster first; `get`, `set`, `delete` and `broker`
//! take a second name (policy or broker).

use std::collections::BTreeMap;

use async_trait::async_trait;
use clap::{Arg, ArgAction};
use pulsarctl_admin::{AutoFailoverPolicy, NamespaceIsolationData};

use crate::args::ArgumentPolicy;
use crate::client::{CliError, CliResult};
use crate::registry::ResourceGroup;
use crate::verb::{Description, InvocationResult, Payload, Verb, VerbContext, VerbHandler};

const CLUSTER_MESSAGE: &str =
    "the cluster name is not specified or the cluster name is specified more than one";
const CLUSTER_AND_POLICY: &[&str] = &["cluster name", "policy name"];
const CLUSTER_AND_BROKER: &[&str] = &["cluster name", "broker name"];
const PERMISSION: &str = "This command requires super-user permissions.";

const NAMESPACES: &str = "namespaces";
const PRIMARY: &str = "primary";
const SECONDARY: &str = "secondary";
const POLICY_TYPE: &str = "auto-failover-policy-type";
const POLICY_PARAMS: &str = "auto-failover-policy-params";

const SAMPLE_POLICY: &str = "{
  \"namespaces\" : [ \"default\" ],
  \"primary\" : [ \"aaa\" ],
  \"secondary\" : [ ],
  \"auto_failover_policy\" : {
    \"policy_type\" : \"min_available\",
    \"parameters\" : {
      \"min_limit\" : \"3\",
      \"usage_threshold\" : \"100\"
    }
  }
}";

/// Namespace isolation policy resource group.
#[must_use]
pub fn group() -> ResourceGroup {
    ResourceGroup::new(
        "ns-isolation-policy",
        "Operations about namespace isolation policies of a cluster",
    )
    .alias("nsip")
    .verb(get())
    .verb(list())
    .verb(set())
    .verb(delete())
    .verb(brokers())
    .verb(broker())
}

/// Parse `key=value` failover parameters.
///
/// # Errors
///
/// Returns [`CliError::InvalidValue`] naming the first entry without a key or
/// an `=` separator.
pub fn parse_failover_params(entries: &[String]) -> CliResult<BTreeMap<String, String>> {
    let mut parameters = BTreeMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .map(|(key, value)| (key.trim(), value.trim()))
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                CliError::invalid_value(format!("invalid auto failover policy parameter {entry}"))
            })?;
        parameters.insert(key.to_string(), value.to_string());
    }
    Ok(parameters)
}

fn get() -> Verb {
    Verb::new(
        "get",
        "Get namespace isolation policy of a cluster",
        Description::new("Get namespace isolation policy of a cluster.", PERMISSION)
            .example(
                "Get namespace isolation policy of a cluster",
                "pulsarctl ns-isolation-policy get (cluster-name) (policy-name)",
            )
            .output("normal output", SAMPLE_POLICY)
            .output(
                "NamespaceIsolationPolicies for cluster standalone does not exist, please check policy name.",
                "NamespaceIsolationPolicies for cluster standalone does not exist",
            )
            .output(
                "Reason: Cluster name does not exist, please check cluster name.",
                "Reason: Cluster name does not exist.",
            )
            .output(
                "need to specified the cluster name and the policy name, please add cluster name and policy name",
                "need to specified the cluster name and the policy name",
            ),
        ArgumentPolicy::names(CLUSTER_AND_POLICY),
        GetPolicy,
    )
}

struct GetPolicy;

#[async_trait]
impl VerbHandler for GetPolicy {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let policy = ctx
            .admin()
            .get_ns_isolation_policy(ctx.name(0)?, ctx.name(1)?)
            .await?;
        Ok(Payload::Json(policy))
    }
}

fn list() -> Verb {
    Verb::new(
        "list",
        "List all namespace isolation policies of a cluster",
        Description::new(
            "List all namespace isolation policies of a cluster.",
            PERMISSION,
        )
        .example(
            "List all namespace isolation policies of a cluster",
            "pulsarctl ns-isolation-policy list (cluster-name)",
        )
        .output("normal output", "{\n  \"policy-1\" : { ... }\n}")
        .output(
            "the cluster name is not specified or the cluster name is specified more than one",
            "error: the cluster name is not specified or the cluster name is specified more than one",
        ),
        ArgumentPolicy::exactly(1, CLUSTER_MESSAGE),
        ListPolicies,
    )
}

struct ListPolicies;

#[async_trait]
impl VerbHandler for ListPolicies {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let policies = ctx.admin().list_ns_isolation_policies(ctx.name(0)?).await?;
        Ok(Payload::Json(policies))
    }
}

fn set() -> Verb {
    Verb::new(
        "set",
        "Create or update a namespace isolation policy of a cluster",
        Description::new(
            "Create or update a namespace isolation policy of a cluster.",
            PERMISSION,
        )
        .example(
            "Create a namespace isolation policy",
            "pulsarctl ns-isolation-policy set (cluster-name) (policy-name) \
             --namespaces default --primary broker-1.* \
             --auto-failover-policy-type min_available \
             --auto-failover-policy-params min_limit=1,usage_threshold=80",
        )
        .output(
            "normal output",
            "Create/Update namespace isolation policy (policy-name) successfully",
        )
        .output(
            "need to specified the cluster name and the policy name",
            "error: need to specified the cluster name and the policy name",
        ),
        ArgumentPolicy::names(CLUSTER_AND_POLICY),
        SetPolicy,
    )
    .flag(list_flag(NAMESPACES, "Namespace regexes the policy applies to"))
    .flag(list_flag(PRIMARY, "Primary broker regexes"))
    .flag(list_flag(SECONDARY, "Secondary broker regexes"))
    .flag(
        Arg::new(POLICY_TYPE)
            .long(POLICY_TYPE)
            .value_name("TYPE")
            .help("Auto failover policy type, e.g. min_available"),
    )
    .flag(list_flag(
        POLICY_PARAMS,
        "Auto failover policy parameters as comma separated key=value pairs",
    ))
}

fn list_flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .action(ArgAction::Append)
        .value_delimiter(',')
        .help(help)
}

struct SetPolicy;

impl SetPolicy {
    fn policy_data(ctx: &VerbContext<'_>) -> CliResult<NamespaceIsolationData> {
        let namespaces = required_list(ctx, NAMESPACES)?;
        let primary = required_list(ctx, PRIMARY)?;
        let policy_type = ctx
            .flag(POLICY_TYPE)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| missing(POLICY_TYPE))?;
        let parameters = parse_failover_params(&ctx.flag_values(POLICY_PARAMS))?;

        Ok(NamespaceIsolationData {
            namespaces,
            primary,
            secondary: ctx.flag_values(SECONDARY),
            auto_failover_policy: AutoFailoverPolicy {
                policy_type: policy_type.to_string(),
                parameters,
            },
        })
    }
}

fn required_list(ctx: &VerbContext<'_>, id: &str) -> CliResult<Vec<String>> {
    let values = ctx.flag_values(id);
    if values.is_empty() {
        Err(missing(id))
    } else {
        Ok(values)
    }
}

fn missing(id: &str) -> CliError {
    CliError::invalid_value(format!("--{id} is required"))
}

#[async_trait]
impl VerbHandler for SetPolicy {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let cluster = ctx.name(0)?;
        let policy = ctx.name(1)?;
        let data = Self::policy_data(ctx)?;
        ctx.admin()
            .set_ns_isolation_policy(cluster, policy, &data)
            .await?;
        Ok(Payload::Message(format!(
            "Create/Update namespace isolation policy {policy} successfully"
        )))
    }
}

fn delete() -> Verb {
    Verb::new(
        "delete",
        "Delete namespace isolation policy of a cluster",
        Description::new("Delete namespace isolation policy of a cluster.", PERMISSION)
            .example(
                "Delete namespace isolation policy of a cluster",
                "pulsarctl ns-isolation-policy delete (cluster-name) (policy-name)",
            )
            .output(
                "normal output",
                "Delete namespace isolation policy (policy-name) successfully",
            ),
        ArgumentPolicy::names(CLUSTER_AND_POLICY),
        DeletePolicy,
    )
}

struct DeletePolicy;

#[async_trait]
impl VerbHandler for DeletePolicy {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let policy = ctx.name(1)?;
        ctx.admin()
            .delete_ns_isolation_policy(ctx.name(0)?, policy)
            .await?;
        Ok(Payload::Message(format!(
            "Delete namespace isolation policy {policy} successfully"
        )))
    }
}

fn brokers() -> Verb {
    Verb::new(
        "brokers",
        "List all brokers with namespace isolation policies attached",
        Description::new(
            "List all brokers with namespace isolation policies attached to them.",
            PERMISSION,
        )
        .example(
            "List all brokers with namespace isolation policies of a cluster",
            "pulsarctl ns-isolation-policy brokers (cluster-name)",
        )
        .output(
            "normal output",
            "[ {\n  \"brokerName\" : \"127.0.0.1:8080\",\n  \"policyName\" : \"policy-1\",\n  \"isPrimary\" : true\n} ]",
        ),
        ArgumentPolicy::exactly(1, CLUSTER_MESSAGE),
        ListBrokers,
    )
}

struct ListBrokers;

#[async_trait]
impl VerbHandler for ListBrokers {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let brokers = ctx
            .admin()
            .list_brokers_with_ns_isolation_policy(ctx.name(0)?)
            .await?;
        Ok(Payload::Json(brokers))
    }
}

fn broker() -> Verb {
    Verb::new(
        "broker",
        "Get a broker with namespace isolation policies attached",
        Description::new(
            "Get a broker with the namespace isolation policies attached to it.",
            PERMISSION,
        )
        .example(
            "Get a broker with namespace isolation policies of a cluster",
            "pulsarctl ns-isolation-policy broker (cluster-name) (broker-address)",
        )
        .output(
            "need to specified the cluster name and the broker name",
            "error: need to specified the cluster name and the broker name",
        ),
        ArgumentPolicy::names(CLUSTER_AND_BROKER),
        GetBroker,
    )
}

struct GetBroker;

#[async_trait]
impl VerbHandler for GetBroker {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let broker = ctx
            .admin()
            .get_broker_with_ns_isolation_policy(ctx.name(0)?, ctx.name(1)?)
            .await?;
        Ok(Payload::Json(broker))
    }
}
