#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Administrative REST client for a Pulsar cluster and its `BookKeeper` tier.
//!
//! Layout: `api.rs` (the [`PulsarAdmin`] trait the CLI programs against),
//! `http.rs` (the `reqwest` implementation), `models.rs` (request bodies),
//! `error.rs` ([`AdminError`] carrying the status signal used for
//! classification).

pub mod api;
pub mod error;
pub mod http;
pub mod models;

pub use api::PulsarAdmin;
pub use error::{AdminError, AdminResult};
pub use http::{HttpAdmin, HttpAdminConfig};
pub use models::{AutoFailoverPolicy, ClusterData, NamespaceIsolationData, TenantInfo};
