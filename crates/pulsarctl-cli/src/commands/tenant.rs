//! Tenant commands.

use async_trait::async_trait;
use clap::{Arg, ArgAction};
use pulsarctl_admin::TenantInfo;

use crate::args::ArgumentPolicy;
use crate::registry::ResourceGroup;
use crate::verb::{Description, InvocationResult, Payload, Verb, VerbContext, VerbHandler};

const TENANT_MESSAGE: &str =
    "the tenant name is not specified or the tenant name is specified more than one";
const PERMISSION: &str = "This command requires super-user permissions.";

const ADMIN_ROLE: &str = "admin-role";
const ALLOWED_CLUSTER: &str = "allowed-cluster";

/// Tenant resource group.
#[must_use]
pub fn group() -> ResourceGroup {
    ResourceGroup::new("tenant", "Operations about tenants")
        .alias("tenants")
        .verb(list())
        .verb(get())
        .verb(create())
        .verb(delete())
}

fn list() -> Verb {
    Verb::new(
        "list",
        "List all tenants",
        Description::new("List all exist tenants.", PERMISSION)
            .example("List all tenants", "pulsarctl tenant list")
            .output("normal output", "[ \"public\", \"sample\" ]"),
        ArgumentPolicy::none(),
        ListTenants,
    )
}

struct ListTenants;

#[async_trait]
impl VerbHandler for ListTenants {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        Ok(Payload::Json(ctx.admin().list_tenants().await?))
    }
}

fn get() -> Verb {
    Verb::new(
        "get",
        "Get the configuration of a tenant",
        Description::new("Get the configuration of a tenant.", PERMISSION)
            .example(
                "Get the configuration of a tenant",
                "pulsarctl tenant get (tenant-name)",
            )
            .output(
                "normal output",
                "{\n  \"adminRoles\" : [ ],\n  \"allowedClusters\" : [ \"standalone\" ]\n}",
            )
            .output("the tenant does not exist", "error: Tenant does not exist"),
        ArgumentPolicy::exactly(1, TENANT_MESSAGE),
        GetTenant,
    )
}

struct GetTenant;

#[async_trait]
impl VerbHandler for GetTenant {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        Ok(Payload::Json(ctx.admin().get_tenant(ctx.name(0)?).await?))
    }
}

fn create() -> Verb {
    Verb::new(
        "create",
        "Create a tenant",
        Description::new(
            "This command is used for creating a new tenant.",
            PERMISSION,
        )
        .example(
            "Create a tenant allowed on one cluster",
            "pulsarctl tenant create (tenant-name) --allowed-cluster standalone",
        )
        .output("normal output", "Create tenant (tenant-name) successfully"),
        ArgumentPolicy::exactly(1, TENANT_MESSAGE),
        CreateTenant,
    )
    .flag(list_flag(ADMIN_ROLE, "Roles allowed to administer the tenant"))
    .flag(list_flag(ALLOWED_CLUSTER, "Clusters the tenant may use"))
}

fn list_flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .action(ArgAction::Append)
        .value_delimiter(',')
        .help(help)
}

struct CreateTenant;

#[async_trait]
impl VerbHandler for CreateTenant {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let name = ctx.name(0)?;
        let info = TenantInfo {
            admin_roles: ctx.flag_values(ADMIN_ROLE),
            allowed_clusters: ctx.flag_values(ALLOWED_CLUSTER),
        };
        ctx.admin().create_tenant(name, &info).await?;
        Ok(Payload::Message(format!("Create tenant {name} successfully")))
    }
}

fn delete() -> Verb {
    Verb::new(
        "delete",
        "Delete a tenant",
        Description::new("This command is used for deleting a tenant.", PERMISSION)
            .example("Delete a tenant", "pulsarctl tenant delete (tenant-name)")
            .output("normal output", "Delete tenant (tenant-name) successfully")
            .output(
                "the tenant still has namespaces",
                "error: The tenant still has active namespaces",
            ),
        ArgumentPolicy::exactly(1, TENANT_MESSAGE),
        DeleteTenant,
    )
}

struct DeleteTenant;

#[async_trait]
impl VerbHandler for DeleteTenant {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let name = ctx.name(0)?;
        ctx.admin().delete_tenant(name).await?;
        Ok(Payload::Message(format!("Delete tenant {name} successfully")))
    }
}
