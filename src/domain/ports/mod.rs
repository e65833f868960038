mod company_store;
mod service_store;

pub use company_store::CompanyStore;
pub use service_store::ServiceStore;
