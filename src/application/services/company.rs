use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::deadline::{bounded, DEFAULT_OPERATION_TIMEOUT};
use crate::domain::{
    ports::CompanyStore, CompanyDetail, CompanySummary, CompanyUpdate, DomainError, NewCompany,
    Page, PageRequest, Patch, RecordId, UpdateOutcome, WriteOutcome,
};

const COMPANY_NOT_FOUND: &str = "Company with that id was not found";

pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    timeout: Duration,
}

impl CompanyService {
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(store: Arc<dyn CompanyStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    #[instrument(skip(self, company), fields(name = %company.name))]
    pub async fn create(&self, company: NewCompany) -> Result<RecordId, DomainError> {
        if company.name.trim().is_empty() {
            return Err(DomainError::invalid_argument("name should be set"));
        }

        let id = RecordId::generate();
        bounded(self.timeout, self.store.insert_company(id, &company)).await?;

        tracing::debug!(company_id = %id, "company created");
        Ok(id)
    }

    /// Detail view with the services preview ordered newest first.
    #[instrument(skip(self))]
    pub async fn get(&self, id: RecordId) -> Result<CompanyDetail, DomainError> {
        let mut detail = bounded(self.timeout, self.store.find_company(id))
            .await?
            .ok_or_else(|| DomainError::not_found(COMPANY_NOT_FOUND))?;

        detail.services.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(detail)
    }

    /// An empty page is a valid result, not an error.
    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<CompanySummary>, DomainError> {
        let items = bounded(self.timeout, self.store.find_companies(&page)).await?;
        Ok(Page::from_items(items, &page))
    }

    /// Pages through the given companies only, in the same order as `list`.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn list_by_ids(
        &self,
        ids: &[RecordId],
        page: PageRequest,
    ) -> Result<Page<CompanySummary>, DomainError> {
        if ids.is_empty() {
            return Err(DomainError::invalid_argument(
                "At least one id should be provided in the request",
            ));
        }

        let items = bounded(self.timeout, self.store.find_companies_by_ids(ids, &page)).await?;
        Ok(Page::from_items(items, &page))
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: RecordId,
        update: &CompanyUpdate,
    ) -> Result<UpdateOutcome, DomainError> {
        let Some(fields) = update.set_fields()? else {
            tracing::debug!(company_id = %id, "empty company update skipped");
            return Ok(UpdateOutcome::NoOp);
        };

        let outcome = bounded(self.timeout, self.store.update_company(id, fields))
            .await?
            .require_match(COMPANY_NOT_FOUND)?;
        Ok(UpdateOutcome::Applied(outcome))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<WriteOutcome, DomainError> {
        bounded(self.timeout, self.store.delete_company(id))
            .await?
            .require_match(COMPANY_NOT_FOUND)
    }
}
