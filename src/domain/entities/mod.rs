mod company;
mod id;
mod service;

pub use company::{
    Company, CompanyDetail, CompanySummary, CompanyUpdate, NewCompany,
    DEFAULT_PREVIEW_LEN,
};
pub use id::{Cursor, RecordId};
pub use service::{NewService, Service, ServiceUpdate};
