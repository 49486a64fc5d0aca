//! Resource groups exposed by the CLI.

pub mod cluster;
pub mod ledger;
pub mod ns_isolation_policy;
pub mod tenant;

use crate::registry::CommandRegistry;

/// Registry holding every resource group, in help order.
#[must_use]
pub fn registry() -> CommandRegistry {
    CommandRegistry::new()
        .group(cluster::group())
        .group(tenant::group())
        .group(ns_isolation_policy::group())
        .group(ledger::group())
}
