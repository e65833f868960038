pub mod in_memory;
pub mod mongo;

pub use in_memory::InMemoryDocumentStore;
pub use mongo::{MongoEmbeddedStore, MongoNormalizedStore};

use std::sync::Arc;

use crate::domain::ports::{CompanyStore, ServiceStore};
use crate::domain::DomainError;
use crate::infrastructure::config::{StoreConfig, StoreLayout};

/// Both ports backed by one adapter instance.
#[derive(Clone)]
pub struct Stores {
    pub companies: Arc<dyn CompanyStore>,
    pub services: Arc<dyn ServiceStore>,
}

impl Stores {
    pub fn from_adapter<S>(store: S) -> Self
    where
        S: CompanyStore + ServiceStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            companies: store.clone(),
            services: store,
        }
    }
}

/// Connects to MongoDB and builds the adapter for the configured layout.
pub async fn connect(config: &StoreConfig) -> Result<Stores, DomainError> {
    let client = mongo::connect_client(config).await?;
    tracing::info!(
        database = %config.database,
        layout = ?config.layout,
        "document store connected"
    );

    let stores = match config.layout {
        StoreLayout::Embedded => Stores::from_adapter(MongoEmbeddedStore::new(
            &client,
            &config.database,
            config.preview_len,
        )),
        StoreLayout::Normalized => Stores::from_adapter(MongoNormalizedStore::new(
            &client,
            &config.database,
            config.preview_len,
        )),
    };
    Ok(stores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCompany, NewService, PageRequest, RecordId, Service};

    #[tokio::test]
    async fn test_ports_share_one_adapter() {
        let stores = Stores::from_adapter(InMemoryDocumentStore::new());
        let company = RecordId::generate();
        stores
            .companies
            .insert_company(company, &NewCompany::new("Barber"))
            .await
            .unwrap();

        let service = Service::new(RecordId::generate(), NewService::new("cut", 100, 30));
        let outcome = stores.services.append_service(company, &service).await.unwrap();
        assert!(outcome.is_match());

        let detail = stores.companies.find_company(company).await.unwrap().unwrap();
        assert_eq!(detail.services, vec![service.clone()]);
        let listed = stores
            .services
            .find_services(company, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listed, vec![service]);
    }
}
