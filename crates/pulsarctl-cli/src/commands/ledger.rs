//! Bookie ledger commands.

use async_trait::async_trait;
use clap::{Arg, ArgAction};

use crate::args::ArgumentPolicy;
use crate::client::{CliError, CliResult};
use crate::registry::ResourceGroup;
use crate::verb::{Description, InvocationResult, Payload, Verb, VerbContext, VerbHandler};

const LEDGER_ID_MESSAGE: &str =
    "the ledger id is not specified or the ledger id is specified more than one";
const PRINT_METADATA: &str = "print-metadata";

/// Ledger resource group.
#[must_use]
pub fn group() -> ResourceGroup {
    ResourceGroup::new("ledger", "Operations about ledgers stored in bookies")
        .verb(delete())
        .verb(get())
        .verb(list())
}

/// Parse a ledger id typed by the operator.
///
/// # Errors
///
/// Returns [`CliError::InvalidValue`] when `raw` is not a non-negative integer.
pub fn parse_ledger_id(raw: &str) -> CliResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(CliError::invalid_value(format!("invalid ledger id {raw}"))),
    }
}

fn delete() -> Verb {
    Verb::new(
        "delete",
        "Delete a ledger",
        Description::new(
            "This command is used for deleting a ledger.",
            "This command does not need any permission.",
        )
        .example("Delete the specified ledger", "pulsarctl ledger delete (ledger-id)")
        .output("normal output", "Deleted ledger (ledger-id)")
        .output(
            "the ledger id is not specified or the ledger id is specified more than one",
            "error: the ledger id is not specified or the ledger id is specified more than one",
        )
        .output(
            "the specified ledger id is invalid",
            "error: invalid ledger id (ledger-id)",
        ),
        ArgumentPolicy::exactly(1, LEDGER_ID_MESSAGE),
        DeleteLedger,
    )
}

struct DeleteLedger;

#[async_trait]
impl VerbHandler for DeleteLedger {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let id = parse_ledger_id(ctx.name(0)?)?;
        ctx.admin().delete_ledger(id).await?;
        tracing::info!(ledger_id = id, "ledger deleted");
        Ok(Payload::Message(format!("Deleted ledger {id}")))
    }
}

fn get() -> Verb {
    Verb::new(
        "get",
        "Get the metadata of a ledger",
        Description::new(
            "This command is used for getting the metadata of a ledger.",
            "This command does not need any permission.",
        )
        .example(
            "Get the metadata of the specified ledger",
            "pulsarctl ledger get (ledger-id)",
        )
        .output(
            "normal output",
            "{\n  \"storeSystemtimeAsLedgerCreationTime\" : false,\n  \"metadataFormatVersion\" : 3,\n  \"state\" : \"CLOSED\"\n}",
        )
        .output(
            "the ledger id is not specified or the ledger id is specified more than one",
            "error: the ledger id is not specified or the ledger id is specified more than one",
        ),
        ArgumentPolicy::exactly(1, LEDGER_ID_MESSAGE),
        GetLedger,
    )
}

struct GetLedger;

#[async_trait]
impl VerbHandler for GetLedger {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let id = parse_ledger_id(ctx.name(0)?)?;
        let metadata = ctx.admin().get_ledger_metadata(id).await?;
        Ok(Payload::Json(metadata))
    }
}

fn list() -> Verb {
    Verb::new(
        "list",
        "List all the ledgers",
        Description::new(
            "This command is used for listing all the ledgers.",
            "This command does not need any permission.",
        )
        .example("List all the ledgers", "pulsarctl ledger list")
        .example(
            "List all the ledgers and their metadata",
            "pulsarctl ledger list --print-metadata",
        )
        .output("normal output", "{\n  \"1\" : null,\n  \"2\" : null\n}"),
        ArgumentPolicy::none(),
        ListLedgers,
    )
    .flag(
        Arg::new(PRINT_METADATA)
            .long(PRINT_METADATA)
            .action(ArgAction::SetTrue)
            .help("Include the metadata of every ledger"),
    )
}

struct ListLedgers;

#[async_trait]
impl VerbHandler for ListLedgers {
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult {
        let ledgers = ctx.admin().list_ledgers(ctx.switch(PRINT_METADATA)).await?;
        Ok(Payload::Json(ledgers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsarctl_admin::AdminError;
    use serde_json::json;

    use crate::classify::ClassifiedError;
    use crate::commands::registry;
    use crate::commands::test_support::{StubAdmin, invoke};

    fn message(result: &InvocationResult) -> String {
        match result {
            Ok(payload) => panic!("expected failure, got {payload:?}"),
            Err(err) => err.display_message(),
        }
    }

    #[tokio::test]
    async fn delete_requires_exactly_one_id() {
        let registry = registry();
        let admin = StubAdmin::returning(json!(null));

        let result = invoke(&registry, "ledger", &["delete"], &admin).await;
        assert!(matches!(result, Err(CliError::Arguments(_))));
        assert_eq!(message(&result), LEDGER_ID_MESSAGE);

        let result = invoke(&registry, "ledger", &["delete", "1", "2"], &admin).await;
        assert_eq!(message(&result), LEDGER_ID_MESSAGE);

        assert!(admin.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_rejects_invalid_ids_before_calling() {
        let registry = registry();
        let admin = StubAdmin::returning(json!(null));

        let result = invoke(&registry, "ledger", &["delete", "a"], &admin).await;
        assert!(matches!(result, Err(CliError::InvalidValue(_))));
        assert_eq!(message(&result), "invalid ledger id a");

        let result = invoke(&registry, "ledger", &["delete", "--", "-1"], &admin).await;
        assert_eq!(message(&result), "invalid ledger id -1");

        assert!(admin.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_confirms_with_a_message() {
        let registry = registry();
        let admin = StubAdmin::returning(json!(null));
        let result = invoke(&registry, "ledger", &["delete", "42"], &admin).await;
        assert_eq!(
            result.expect("deleted"),
            Payload::Message("Deleted ledger 42".into())
        );
        assert_eq!(admin.calls(), ["delete_ledger 42"]);
    }

    #[tokio::test]
    async fn get_passes_metadata_through() {
        let registry = registry();
        let metadata = json!({"state": "CLOSED", "ensembleSize": 3});
        let admin = StubAdmin::returning(metadata.clone());
        let result = invoke(&registry, "ledger", &["get", "0"], &admin).await;
        assert_eq!(result.expect("metadata"), Payload::Json(metadata));
        assert_eq!(admin.calls(), ["get_ledger_metadata 0"]);
    }

    #[tokio::test]
    async fn list_forwards_the_metadata_switch() {
        let registry = registry();
        let admin = StubAdmin::returning(json!({"1": null}));
        invoke(&registry, "ledger", &["list"], &admin)
            .await
            .expect("listed");
        invoke(&registry, "ledger", &["list", "--print-metadata"], &admin)
            .await
            .expect("listed");
        assert_eq!(admin.calls(), ["list_ledgers false", "list_ledgers true"]);

        let result = invoke(&registry, "ledger", &["list", "7"], &admin).await;
        assert!(matches!(result, Err(CliError::Arguments(_))));
    }

    #[tokio::test]
    async fn remote_failures_keep_the_server_message() {
        let registry = registry();
        let admin = StubAdmin::failing(AdminError::status(404, "ledger not found"));
        let result = invoke(&registry, "ledger", &["get", "9"], &admin).await;
        match result {
            Err(CliError::Remote(ClassifiedError::NotFound { message })) => {
                assert_eq!(message, "ledger not found");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn ledger_ids_are_non_negative_integers() {
        assert_eq!(parse_ledger_id("0").ok(), Some(0));
        assert_eq!(parse_ledger_id("9223372036854775807").ok(), Some(i64::MAX));
        assert!(parse_ledger_id("9223372036854775808").is_err());
        assert!(parse_ledger_id("1.5").is_err());
        assert!(parse_ledger_id("").is_err());
    }
}
