pub mod entities;
pub mod errors;
pub mod outcome;
pub mod pagination;
pub mod patch;
pub mod ports;

pub use entities::*;
pub use errors::{DomainError, ErrorKind, Result};
pub use outcome::{UpdateOutcome, WriteOutcome};
pub use pagination::{keyset_page, Keyed, Page, PageRequest, PageSize};
pub use patch::Patch;
