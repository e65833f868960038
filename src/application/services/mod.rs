mod catalog;
mod company;
mod deadline;

pub use catalog::ServiceCatalog;
pub use company::CompanyService;
pub use deadline::DEFAULT_OPERATION_TIMEOUT;
