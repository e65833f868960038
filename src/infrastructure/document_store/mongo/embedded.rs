//! Single-collection layout: each company document embeds its services.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};

use super::{decode, encode, find_summaries, query, store_error, COMPANIES_COLLECTION};
use crate::domain::ports::{CompanyStore, ServiceStore};
use crate::domain::{
    Company, CompanyDetail, CompanySummary, DomainError, NewCompany, PageRequest, RecordId,
    Service, WriteOutcome,
};

const SERVICES_FIELD: &str = "services";
const SERVICE_ID_FIELD: &str = "service_id";
const SERVICE_ID_PATH: &str = "services.service_id";

/// Every service mutation is one atomic update on the owning company
/// document, and deleting the company drops its services with it.
pub struct MongoEmbeddedStore {
    companies: Collection<Document>,
    preview_len: i64,
}

impl MongoEmbeddedStore {
    pub fn new(client: &Client, database_name: &str, preview_len: usize) -> Self {
        let companies = client.database(database_name).collection(COMPANIES_COLLECTION);
        Self {
            companies,
            preview_len: i64::try_from(preview_len).unwrap_or(i64::MAX),
        }
    }

    fn service_filter(company_id: RecordId, service_id: RecordId) -> Document {
        doc! { "_id": company_id, SERVICE_ID_PATH: service_id }
    }
}

#[async_trait]
impl CompanyStore for MongoEmbeddedStore {
    async fn insert_company(&self, id: RecordId, company: &NewCompany) -> Result<(), DomainError> {
        let document = encode(&Company::new(id, company.clone()))?;

        self.companies
            .insert_one(document)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn find_company(&self, id: RecordId) -> Result<Option<CompanyDetail>, DomainError> {
        let found = self
            .companies
            .find_one(doc! { "_id": id })
            .projection(query::detail_projection(self.preview_len))
            .await
            .map_err(store_error)?;

        found.map(decode::<CompanyDetail>).transpose()
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
        fields: Document,
    ) -> Result<WriteOutcome, DomainError> {
        let result = self
            .companies
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::new(result.matched_count, result.modified_count))
    }

    async fn delete_company(&self, id: RecordId) -> Result<WriteOutcome, DomainError> {
        let result = self
            .companies
            .delete_one(doc! { "_id": id })
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::deleted(result.deleted_count))
    }
}

#[async_trait]
impl ServiceStore for MongoEmbeddedStore {
    async fn append_service(
        &self,
        company_id: RecordId,
        service: &Service,
    ) -> Result<WriteOutcome, DomainError> {
        let element = encode(service)?;

        let result = self
            .companies
            .update_one(
                doc! { "_id": company_id },
                doc! { "$push": { SERVICES_FIELD: element } },
            )
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::new(result.matched_count, result.modified_count))
    }

    async fn update_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
        fields: Document,
    ) -> Result<WriteOutcome, DomainError> {
        let update = doc! { "$set": query::positional_set(SERVICES_FIELD, fields) };

        let result = self
            .companies
            .update_one(Self::service_filter(company_id, service_id), update)
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::new(result.matched_count, result.modified_count))
    }

    async fn remove_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
    ) -> Result<WriteOutcome, DomainError> {
        let update = doc! { "$pull": { SERVICES_FIELD: { SERVICE_ID_FIELD: service_id } } };

        let result = self
            .companies
            .update_one(Self::service_filter(company_id, service_id), update)
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::new(result.matched_count, result.modified_count))
    }

    async fn find_services(
        &self,
        company_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<Service>, DomainError> {
        let pipeline =
            query::nested_page_pipeline(company_id, SERVICES_FIELD, SERVICE_ID_FIELD, page);
        tracing::debug!(%company_id, stages = pipeline.len(), "aggregating services");

        let cursor = self
            .companies
            .aggregate(pipeline)
            .await
            .map_err(store_error)?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;
        documents.into_iter().map(decode::<Service>).collect()
    }
}
