//! Three-collection layout: `companies`, `descriptions` keyed by the company
//! id, and `services` carrying a `company_id` foreign key.
//!
//! Composite writes run as independent single-document steps with no
//! rollback. A failure part-way leaves the earlier steps applied; the
//! cascade delete therefore sweeps children even when the company itself is
//! already gone.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::UpdateOptions;
use mongodb::{Client, Collection};

use super::{
    decode, encode, find_summaries, query, store_error, COMPANIES_COLLECTION,
    DESCRIPTIONS_COLLECTION, SERVICES_COLLECTION,
};
use crate::domain::ports::{CompanyStore, ServiceStore};
use crate::domain::{
    Company, CompanyDetail, CompanySummary, DomainError, NewCompany, PageRequest, RecordId,
    Service, WriteOutcome,
};

const COMPANY_KEY: &str = "company_id";
const DESCRIPTION_FIELD: &str = "description";
const LONG_DESCRIPTION_FIELD: &str = "long_description";

pub struct MongoNormalizedStore {
    companies: Collection<Document>,
    descriptions: Collection<Document>,
    services: Collection<Document>,
    preview_len: i64,
}

impl MongoNormalizedStore {
    pub fn new(client: &Client, database_name: &str, preview_len: usize) -> Self {
        let database = client.database(database_name);
        Self {
            companies: database.collection(COMPANIES_COLLECTION),
            descriptions: database.collection(DESCRIPTIONS_COLLECTION),
            services: database.collection(SERVICES_COLLECTION),
            preview_len: i64::try_from(preview_len).unwrap_or(i64::MAX),
        }
    }

    async fn company_exists(&self, id: RecordId) -> Result<bool, DomainError> {
        let count = self
            .companies
            .count_documents(doc! { "_id": id })
            .await
            .map_err(store_error)?;
        Ok(count > 0)
    }

    async fn find_description(&self, id: RecordId) -> Result<Option<String>, DomainError> {
        let found = self
            .descriptions
            .find_one(doc! { "_id": id })
            .await
            .map_err(store_error)?;

        Ok(found.and_then(|d| d.get_str(DESCRIPTION_FIELD).ok().map(str::to_owned)))
    }

    async fn set_description(&self, id: RecordId, text: Bson) -> Result<WriteOutcome, DomainError> {
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .descriptions
            .update_one(doc! { "_id": id }, doc! { "$set": { DESCRIPTION_FIELD: text } })
            .with_options(options)
            .await
            .map_err(store_error)?;

        let upserted = u64::from(result.upserted_id.is_some());
        Ok(WriteOutcome::new(
            result.matched_count + upserted,
            result.modified_count + upserted,
        ))
    }

    /// The first `preview_len` services in storage order. A zero-length
    /// preview never reaches the driver, where `limit(0)` means unlimited.
    async fn preview_services(&self, company_id: RecordId) -> Result<Vec<Service>, DomainError> {
        if !has_preview(self.preview_len) {
            return Ok(Vec::new());
        }

        let cursor = self
            .services
            .find(doc! { COMPANY_KEY: company_id })
            .sort(doc! { "_id": 1 })
            .limit(self.preview_len)
            .await
            .map_err(store_error)?;
        let rows: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;
        rows.into_iter().map(row_service).collect()
    }
}

fn has_preview(preview_len: i64) -> bool {
    preview_len > 0
}

/// Converts between the domain `Service` and a row of the `services`
/// collection, where the service id is the document `_id`.
fn service_row(company_id: RecordId, service: &Service) -> Result<Document, DomainError> {
    let mut row = encode(service)?;
    row.remove("service_id");
    row.insert("_id", service.id);
    row.insert(COMPANY_KEY, company_id);
    Ok(row)
}

fn row_service(mut row: Document) -> Result<Service, DomainError> {
    if let Some(id) = row.remove("_id") {
        row.insert("service_id", id);
    }
    row.remove(COMPANY_KEY);
    decode(row)
}

#[async_trait]
impl CompanyStore for MongoNormalizedStore {
    async fn insert_company(&self, id: RecordId, company: &NewCompany) -> Result<(), DomainError> {
        let mut document = encode(&Company::new(id, company.clone()))?;
        document.remove("services");
        let long_description = document.remove(LONG_DESCRIPTION_FIELD);

        self.companies
            .insert_one(document)
            .await
            .map_err(store_error)?;

        let mut description = doc! { "_id": id };
        if let Some(text) = long_description {
            description.insert(DESCRIPTION_FIELD, text);
        }

        if let Err(e) = self.descriptions.insert_one(description).await {
            tracing::warn!(company_id = %id, error = %e, "company stored without description");
            return Err(store_error(e));
        }

        Ok(())
    }

    async fn find_company(&self, id: RecordId) -> Result<Option<CompanyDetail>, DomainError> {
        let found = self
            .companies
            .find_one(doc! { "_id": id })
            .projection(doc! { "short_description": 0 })
            .await
            .map_err(store_error)?;

        let Some(document) = found else {
            return Ok(None);
        };
        let mut detail: CompanyDetail = decode(document)?;
        detail.long_description = self.find_description(id).await?;
        detail.services = self.preview_services(id).await?;

        Ok(Some(detail))
    }

    async fn find_companies(
        &self,
        page: &PageRequest,
    ) -> Result<Vec<CompanySummary>, DomainError> {
        find_summaries(&self.companies, Document::new(), page).await
    }

    async fn find_companies_by_ids(
        &self,
        ids: &[RecordId],
        page: &PageRequest,
    ) -> Result<Vec<CompanySummary>, DomainError> {
        find_summaries(&self.companies, query::id_in(ids), page).await
    }

    async fn update_company(
        &self,
        id: RecordId,
        mut fields: Document,
    ) -> Result<WriteOutcome, DomainError> {
        let long_description = fields.remove(LONG_DESCRIPTION_FIELD);

        let mut outcome = if fields.is_empty() {
            if !self.company_exists(id).await? {
                return Ok(WriteOutcome::default());
            }
            WriteOutcome::new(1, 0)
        } else {
            let result = self
                .companies
                .update_one(doc! { "_id": id }, doc! { "$set": fields })
                .await
                .map_err(store_error)?;
            WriteOutcome::new(result.matched_count, result.modified_count)
        };

        if let Some(text) = long_description.filter(|_| outcome.is_match()) {
            let described = self.set_description(id, text).await?;
            outcome.modified += described.modified;
        }

        Ok(outcome)
    }

    async fn delete_company(&self, id: RecordId) -> Result<WriteOutcome, DomainError> {
        let result = self
            .companies
            .delete_one(doc! { "_id": id })
            .await
            .map_err(store_error)?;

        self.descriptions
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                tracing::warn!(company_id = %id, error = %e, "description left behind");
                store_error(e)
            })?;

        let swept = self
            .services
            .delete_many(doc! { COMPANY_KEY: id })
            .await
            .map_err(|e| {
                tracing::warn!(company_id = %id, error = %e, "services left behind");
                store_error(e)
            })?;
        tracing::debug!(company_id = %id, services = swept.deleted_count, "cascade complete");

        Ok(WriteOutcome::deleted(result.deleted_count))
    }
}

#[async_trait]
impl ServiceStore for MongoNormalizedStore {
    /// The existence check and the insert are separate steps; a company
    /// deleted in between leaves an orphaned row for the next cascade.
    async fn append_service(
        &self,
        company_id: RecordId,
        service: &Service,
    ) -> Result<WriteOutcome, DomainError> {
        if !self.company_exists(company_id).await? {
            return Ok(WriteOutcome::default());
        }

        self.services
            .insert_one(service_row(company_id, service)?)
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::new(1, 1))
    }

    async fn update_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
        fields: Document,
    ) -> Result<WriteOutcome, DomainError> {
        let result = self
            .services
            .update_one(
                doc! { "_id": service_id, COMPANY_KEY: company_id },
                doc! { "$set": fields },
            )
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::new(result.matched_count, result.modified_count))
    }

    async fn remove_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
    ) -> Result<WriteOutcome, DomainError> {
        let result = self
            .services
            .delete_one(doc! { "_id": service_id, COMPANY_KEY: company_id })
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::deleted(result.deleted_count))
    }

    async fn find_services(
        &self,
        company_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<Service>, DomainError> {
        let filter = query::keyset_filter(doc! { COMPANY_KEY: company_id }, "_id", &page.cursor);
        tracing::debug!(%filter, limit = page.limit(), "finding services");

        let cursor = self
            .services
            .find(filter)
            .sort(query::newest_first("_id"))
            .limit(page.limit())
            .await
            .map_err(store_error)?;

        let rows: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;
        rows.into_iter().map(row_service).collect()
    }
}
