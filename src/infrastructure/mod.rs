pub mod config;
pub mod document_store;

pub use config::{AppConfig, SeedConfig, StoreConfig, StoreLayout};
pub use document_store::{
    connect, InMemoryDocumentStore, MongoEmbeddedStore, MongoNormalizedStore, Stores,
};
