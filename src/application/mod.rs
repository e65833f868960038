//! Application layer - Use cases and orchestration.
//!
//! Services here sit between the routing layer and the document store ports.
//! They take already-parsed domain values, bound every store call with a
//! timeout, and classify store outcomes into not-found, empty or internal.

pub mod services;

pub use services::{CompanyService, ServiceCatalog, DEFAULT_OPERATION_TIMEOUT};
