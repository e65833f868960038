//! MongoDB adapters for the company and service ports.

mod embedded;
mod normalized;
pub mod query;

pub use embedded::MongoEmbeddedStore;
pub use normalized::MongoNormalizedStore;

use futures::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::de::DeserializeOwned;

use crate::domain::{CompanySummary, DomainError, PageRequest};
use crate::infrastructure::config::StoreConfig;

/// Collection names.
pub(crate) const COMPANIES_COLLECTION: &str = "companies";
pub(crate) const DESCRIPTIONS_COLLECTION: &str = "descriptions";
pub(crate) const SERVICES_COLLECTION: &str = "services";

pub async fn connect_client(config: &StoreConfig) -> Result<Client, DomainError> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(|e| DomainError::store(e.to_string()))?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.connect_timeout = Some(config.operation_timeout());
    options.server_selection_timeout = Some(config.operation_timeout());

    Client::with_options(options).map_err(|e| DomainError::store(e.to_string()))
}

/// One page of company summaries under `base`, newest first. Both layouts
/// keep the summary fields in the `companies` collection.
pub(crate) async fn find_summaries(
    companies: &Collection<Document>,
    base: Document,
    page: &PageRequest,
) -> Result<Vec<CompanySummary>, DomainError> {
    let filter = query::keyset_filter(base, "_id", &page.cursor);
    tracing::debug!(%filter, limit = page.limit(), "finding companies");

    let cursor = companies
        .find(filter)
        .sort(query::newest_first("_id"))
        .limit(page.limit())
        .projection(query::summary_projection())
        .await
        .map_err(store_error)?;

    let documents: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;
    documents.into_iter().map(decode::<CompanySummary>).collect()
}

pub(crate) fn store_error(e: mongodb::error::Error) -> DomainError {
    DomainError::store(e.to_string())
}

pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, DomainError> {
    bson::from_document(doc)
        .map_err(|e| DomainError::internal(format!("failed to decode document: {e}")))
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Document, DomainError> {
    bson::to_document(value)
        .map_err(|e| DomainError::internal(format!("failed to encode document: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, Service};
    use mongodb::bson::doc;

    #[test]
    fn test_collection_names() {
        assert_eq!(COMPANIES_COLLECTION, "companies");
        assert_eq!(DESCRIPTIONS_COLLECTION, "descriptions");
        assert_eq!(SERVICES_COLLECTION, "services");
    }

    #[test]
    fn test_decode_failure_is_internal() {
        let err = decode::<Service>(doc! { "service_id": 42, "name": "cut" }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
