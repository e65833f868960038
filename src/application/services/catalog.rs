use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::deadline::{bounded, DEFAULT_OPERATION_TIMEOUT};
use crate::domain::{
    ports::ServiceStore, DomainError, NewService, Page, PageRequest, Patch, RecordId, Service,
    ServiceUpdate, UpdateOutcome, WriteOutcome,
};

const COMPANY_NOT_FOUND: &str = "Company with that id was not found";
const SERVICE_NOT_FOUND: &str = "Service with that company id and service id was not found";

/// Operations on the services embedded in a company.
pub struct ServiceCatalog {
    store: Arc<dyn ServiceStore>,
    timeout: Duration,
}

impl ServiceCatalog {
    pub fn new(store: Arc<dyn ServiceStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(store: Arc<dyn ServiceStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    #[instrument(skip(self, service), fields(name = %service.name))]
    pub async fn add(
        &self,
        company_id: RecordId,
        service: NewService,
    ) -> Result<RecordId, DomainError> {
        let service = Service::new(RecordId::generate(), service);

        bounded(self.timeout, self.store.append_service(company_id, &service))
            .await?
            .require_match(COMPANY_NOT_FOUND)?;

        tracing::debug!(service_id = %service.id, "service appended");
        Ok(service.id)
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        company_id: RecordId,
        service_id: RecordId,
        update: &ServiceUpdate,
    ) -> Result<UpdateOutcome, DomainError> {
        let Some(fields) = update.set_fields()? else {
            tracing::debug!(%service_id, "empty service update skipped");
            return Ok(UpdateOutcome::NoOp);
        };

        let outcome = bounded(
            self.timeout,
            self.store.update_service(company_id, service_id, fields),
        )
        .await?
        .require_match(SERVICE_NOT_FOUND)?;
        Ok(UpdateOutcome::Applied(outcome))
    }

    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        company_id: RecordId,
        service_id: RecordId,
    ) -> Result<WriteOutcome, DomainError> {
        bounded(
            self.timeout,
            self.store.remove_service(company_id, service_id),
        )
        .await?
        .require_match(SERVICE_NOT_FOUND)
    }

    /// Pages through a company's services newest first. A missing company and
    /// a company without services both yield an empty page.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        company_id: RecordId,
        page: PageRequest,
    ) -> Result<Page<Service>, DomainError> {
        let items = bounded(self.timeout, self.store.find_services(company_id, &page)).await?;
        Ok(Page::from_items(items, &page))
    }
}
