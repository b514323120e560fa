//! Remote collaborators: the presence registry and the metadata schema source
//!
//! The registry is a GraphQL endpoint. The language list and the schema are
//! fetched once per run, published metadata once per entry.

mod client;
mod error;
mod types;

pub use client::RegistryClient;
pub use error::RegistryError;
pub use types::{LatestSchema, PublishedMetadata, PublishedPresence};

/// Lookup of previously published presences, the baseline for version checks.
#[allow(async_fn_in_trait)]
pub trait Registry {
    /// Published metadata for `service`, or `None` if it was never released.
    async fn published(&self, service: &str) -> Result<Option<PublishedMetadata>, RegistryError>;
}
