use async_trait::async_trait;
use mongodb::bson::Document;

use crate::domain::{
    errors::DomainError, CompanyDetail, CompanySummary, NewCompany, PageRequest, RecordId,
    WriteOutcome,
};

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Persists a company with an empty service list under `id`.
    async fn insert_company(&self, id: RecordId, company: &NewCompany) -> Result<(), DomainError>;
    async fn find_company(&self, id: RecordId) -> Result<Option<CompanyDetail>, DomainError>;
    async fn find_companies(&self, page: &PageRequest)
        -> Result<Vec<CompanySummary>, DomainError>;
    /// Same ordering and cursor as `find_companies`, restricted to `ids`.
    async fn find_companies_by_ids(
        &self,
        ids: &[RecordId],
        page: &PageRequest,
    ) -> Result<Vec<CompanySummary>, DomainError>;
    /// `fields` is a non-empty sparse update document.
    async fn update_company(
        &self,
        id: RecordId,
        fields: Document,
    ) -> Result<WriteOutcome, DomainError>;
    /// Removes the company together with every service it owns.
    async fn delete_company(&self, id: RecordId) -> Result<WriteOutcome, DomainError>;
}
