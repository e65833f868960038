use async_trait::async_trait;
use mongodb::bson::Document;

use crate::domain::{errors::DomainError, PageRequest, RecordId, Service, WriteOutcome};

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn append_service(
        &self,
        company_id: RecordId,
        service: &Service,
    ) -> Result<WriteOutcome, DomainError>;
    /// Matches on both ids; only the fields in `fields` change.
    async fn update_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
        fields: Document,
    ) -> Result<WriteOutcome, DomainError>;
    async fn remove_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
    ) -> Result<WriteOutcome, DomainError>;
    async fn find_services(
        &self,
        company_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<Service>, DomainError>;
}
