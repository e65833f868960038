use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;

use mongodb::bson::Document;

use super::mongo::{decode, encode};
use crate::domain::patch::merge_fields;
use crate::domain::ports::{CompanyStore, ServiceStore};
use crate::domain::{
    keyset_page, Company, CompanyDetail, CompanySummary, DomainError, NewCompany, PageRequest,
    RecordId, Service, WriteOutcome, DEFAULT_PREVIEW_LEN,
};

/// Process-local store with embedded-layout semantics: services live inside
/// their company and every mutation happens under one write lock.
pub struct InMemoryDocumentStore {
    companies: RwLock<Vec<Company>>,
    preview_len: usize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_preview_len(DEFAULT_PREVIEW_LEN)
    }

    pub fn with_preview_len(preview_len: usize) -> Self {
        Self {
            companies: RwLock::new(Vec::new()),
            preview_len,
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a sparse update to a typed record through its stored form.
fn apply_fields<T>(target: &mut T, fields: &Document) -> Result<bool, DomainError>
where
    T: Serialize + DeserializeOwned,
{
    let mut stored = encode(target)?;
    if !merge_fields(&mut stored, fields) {
        return Ok(false);
    }
    *target = decode(stored)?;
    Ok(true)
}

fn modified(changed: bool) -> WriteOutcome {
    WriteOutcome::new(1, u64::from(changed))
}

#[async_trait]
impl CompanyStore for InMemoryDocumentStore {
    async fn insert_company(&self, id: RecordId, company: &NewCompany) -> Result<(), DomainError> {
        let mut store = self
            .companies
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        if store.iter().any(|c| c.id == id) {
            return Err(DomainError::store(format!("duplicate key: {id}")));
        }
        store.push(Company::new(id, company.clone()));
        Ok(())
    }

    async fn find_company(&self, id: RecordId) -> Result<Option<CompanyDetail>, DomainError> {
        let store = self
            .companies
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(store
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.detail(self.preview_len)))
    }

    async fn find_companies(
        &self,
        page: &PageRequest,
    ) -> Result<Vec<CompanySummary>, DomainError> {
        let store = self
            .companies
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(keyset_page(store.iter().map(Company::summary), page))
    }

    async fn find_companies_by_ids(
        &self,
        ids: &[RecordId],
        page: &PageRequest,
    ) -> Result<Vec<CompanySummary>, DomainError> {
        let store = self
            .companies
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let wanted = store
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(Company::summary);
        Ok(keyset_page(wanted, page))
    }

    async fn update_company(
        &self,
        id: RecordId,
        fields: Document,
    ) -> Result<WriteOutcome, DomainError> {
        let mut store = self
            .companies
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        match store.iter_mut().find(|c| c.id == id) {
            Some(company) => apply_fields(company, &fields).map(modified),
            None => Ok(WriteOutcome::default()),
        }
    }

    async fn delete_company(&self, id: RecordId) -> Result<WriteOutcome, DomainError> {
        let mut store = self
            .companies
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let before = store.len();
        store.retain(|c| c.id != id);
        Ok(WriteOutcome::deleted((before - store.len()) as u64))
    }
}

#[async_trait]
impl ServiceStore for InMemoryDocumentStore {
    async fn append_service(
        &self,
        company_id: RecordId,
        service: &Service,
    ) -> Result<WriteOutcome, DomainError> {
        let mut store = self
            .companies
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        match store.iter_mut().find(|c| c.id == company_id) {
            Some(company) => {
                company.services.push(service.clone());
                Ok(WriteOutcome::new(1, 1))
            }
            None => Ok(WriteOutcome::default()),
        }
    }

    async fn update_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
        fields: Document,
    ) -> Result<WriteOutcome, DomainError> {
        let mut store = self
            .companies
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let target = store
            .iter_mut()
            .filter(|c| c.id == company_id)
            .flat_map(|c| c.services.iter_mut())
            .find(|s| s.id == service_id);

        match target {
            Some(service) => apply_fields(service, &fields).map(modified),
            None => Ok(WriteOutcome::default()),
        }
    }

    async fn remove_service(
        &self,
        company_id: RecordId,
        service_id: RecordId,
    ) -> Result<WriteOutcome, DomainError> {
        let mut store = self
            .companies
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let Some(company) = store.iter_mut().find(|c| c.id == company_id) else {
            return Ok(WriteOutcome::default());
        };

        let before = company.services.len();
        company.services.retain(|s| s.id != service_id);
        Ok(WriteOutcome::deleted((before - company.services.len()) as u64))
    }

    async fn find_services(
        &self,
        company_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<Service>, DomainError> {
        let store = self
            .companies
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let services = store
            .iter()
            .filter(|c| c.id == company_id)
            .flat_map(|c| c.services.iter().cloned());

        Ok(keyset_page(services, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cursor, NewService, PageSize};
    use mongodb::bson::doc;

    fn service(name: &str) -> Service {
        Service::new(RecordId::generate(), NewService::new(name, 100, 30))
    }

    #[tokio::test]
    async fn test_insert_and_find_company() {
        let store = InMemoryDocumentStore::new();
        let id = RecordId::generate();

        store
            .insert_company(id, &NewCompany::new("Barber").with_descriptions("s", "l"))
            .await
            .unwrap();

        let detail = store.find_company(id).await.unwrap().unwrap();
        assert_eq!(detail.name, "Barber");
        assert_eq!(detail.long_description.as_deref(), Some("l"));
        assert!(detail.services.is_empty());

        assert!(store
            .find_company(RecordId::generate())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let store = InMemoryDocumentStore::new();
        let id = RecordId::generate();
        store.insert_company(id, &NewCompany::new("A")).await.unwrap();

        assert!(store.insert_company(id, &NewCompany::new("B")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_reports_match_and_modification() {
        let store = InMemoryDocumentStore::new();
        let id = RecordId::generate();
        store.insert_company(id, &NewCompany::new("A")).await.unwrap();

        let changed = store
            .update_company(id, doc! { "name": "B" })
            .await
            .unwrap();
        assert_eq!(changed, WriteOutcome::new(1, 1));

        let unchanged = store
            .update_company(id, doc! { "name": "B" })
            .await
            .unwrap();
        assert_eq!(unchanged, WriteOutcome::new(1, 0));

        let missing = store
            .update_company(RecordId::generate(), doc! { "name": "B" })
            .await
            .unwrap();
        assert!(!missing.is_match());
    }

    #[tokio::test]
    async fn test_find_by_ids_stays_inside_the_set() {
        let store = InMemoryDocumentStore::new();
        let mut ids = Vec::new();
        for i in 0..6 {
            let id = RecordId::generate();
            store
                .insert_company(id, &NewCompany::new(format!("c{i}")))
                .await
                .unwrap();
            ids.push(id);
        }
        let wanted = [ids[0], ids[2], ids[5]];

        let size = PageSize::new(2).unwrap();
        let first = store
            .find_companies_by_ids(&wanted, &PageRequest::first(size))
            .await
            .unwrap();
        assert_eq!(
            first.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![ids[5], ids[2]]
        );

        // Below ids[4] sit ids[0..4]; only ids[2] and ids[0] belong to the set.
        let next = PageRequest::new(Cursor::after(ids[4]), size);
        let second = store.find_companies_by_ids(&wanted, &next).await.unwrap();
        assert_eq!(
            second.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![ids[2], ids[0]]
        );

        let none = store
            .find_companies_by_ids(&[RecordId::generate()], &PageRequest::default())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_same_number_of_other_width_is_not_a_modification() {
        let store = InMemoryDocumentStore::new();
        let company = RecordId::generate();
        store.insert_company(company, &NewCompany::new("A")).await.unwrap();
        let cut = service("cut");
        store.append_service(company, &cut).await.unwrap();

        let outcome = store
            .update_service(company, cut.id, doc! { "price": 100_i32 })
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::new(1, 0));

        let outcome = store
            .update_service(company, cut.id, doc! { "price": 100_i64 })
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::new(1, 0));
    }

    #[tokio::test]
    async fn test_update_service_leaves_other_fields() {
        let store = InMemoryDocumentStore::new();
        let company = RecordId::generate();
        store.insert_company(company, &NewCompany::new("A")).await.unwrap();

        let cut = service("cut");
        store.append_service(company, &cut).await.unwrap();

        let outcome = store
            .update_service(company, cut.id, doc! { "price": 250_i64 })
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::new(1, 1));

        let detail = store.find_company(company).await.unwrap().unwrap();
        assert_eq!(detail.services[0].price, 250);
        assert_eq!(detail.services[0].name, "cut");
        assert_eq!(detail.services[0].duration, 30);
    }

    #[tokio::test]
    async fn test_service_writes_require_matching_company() {
        let store = InMemoryDocumentStore::new();
        let company = RecordId::generate();
        let other = RecordId::generate();
        store.insert_company(company, &NewCompany::new("A")).await.unwrap();
        store.insert_company(other, &NewCompany::new("B")).await.unwrap();

        let cut = service("cut");
        store.append_service(company, &cut).await.unwrap();

        let wrong = store
            .update_service(other, cut.id, doc! { "name": "x" })
            .await
            .unwrap();
        assert!(!wrong.is_match());

        let removed = store.remove_service(other, cut.id).await.unwrap();
        assert!(!removed.is_match());

        let orphan = store
            .append_service(RecordId::generate(), &service("shave"))
            .await
            .unwrap();
        assert!(!orphan.is_match());
    }

    #[tokio::test]
    async fn test_find_services_pages_newest_first() {
        let store = InMemoryDocumentStore::new();
        let company = RecordId::generate();
        store.insert_company(company, &NewCompany::new("A")).await.unwrap();

        let services: Vec<Service> = (0..5).map(|i| service(&format!("s{i}"))).collect();
        for s in &services {
            store.append_service(company, s).await.unwrap();
        }

        let first = PageRequest::first(PageSize::new(2).unwrap());
        let page = store.find_services(company, &first).await.unwrap();
        assert_eq!(page, vec![services[4].clone(), services[3].clone()]);

        let next = PageRequest::new(Cursor::after(services[3].id), PageSize::new(2).unwrap());
        let page = store.find_services(company, &next).await.unwrap();
        assert_eq!(page, vec![services[2].clone(), services[1].clone()]);

        let unknown = store
            .find_services(RecordId::generate(), &first)
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_delete_company_drops_services() {
        let store = InMemoryDocumentStore::with_preview_len(3);
        let company = RecordId::generate();
        store.insert_company(company, &NewCompany::new("A")).await.unwrap();
        store.append_service(company, &service("cut")).await.unwrap();

        let outcome = store.delete_company(company).await.unwrap();
        assert_eq!(outcome, WriteOutcome::deleted(1));

        let services = store
            .find_services(company, &PageRequest::default())
            .await
            .unwrap();
        assert!(services.is_empty());

        let again = store.delete_company(company).await.unwrap();
        assert!(!again.is_match());
    }
}
