use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::domain::pagination::Keyed;
use crate::domain::patch::Patch;

/// An offering embedded in exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "service_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub description: String,
}

impl Service {
    pub fn new(id: RecordId, new: NewService) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            duration: new.duration,
            description: new.description,
        }
    }
}

impl Keyed for Service {
    fn key(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub price: u32,
    pub duration: u32,
    pub description: String,
}

impl NewService {
    pub fn new(name: impl Into<String>, price: u32, duration: u32) -> Self {
        Self {
            name: name.into(),
            price,
            duration,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Patch for ServiceUpdate {
    const IDENTITY_FIELD: &'static str = "service_id";
}
