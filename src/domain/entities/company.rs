use serde::{Deserialize, Serialize};

use super::{RecordId, Service};
use crate::domain::pagination::Keyed;
use crate::domain::patch::Patch;

/// Number of services shown in a company's detail view unless configured.
pub const DEFAULT_PREVIEW_LEN: usize = 10;

/// Full company document as persisted in the embedded layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Company {
    /// Companies are always created without services.
    pub fn new(id: RecordId, new: NewCompany) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            location: new.location,
            short_description: new.short_description,
            long_description: new.long_description,
            services: Vec::new(),
        }
    }

    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            short_description: self.short_description.clone(),
        }
    }

    /// Detail view: long fields kept, services capped to the first
    /// `preview_len` stored elements.
    pub fn detail(&self, preview_len: usize) -> CompanyDetail {
        CompanyDetail {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            long_description: self.long_description.clone(),
            services: self.services.iter().take(preview_len).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl NewCompany {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_descriptions(
        mut self,
        short_description: impl Into<String>,
        long_description: impl Into<String>,
    ) -> Self {
        self.short_description = Some(short_description.into());
        self.long_description = Some(long_description.into());
        self
    }
}

/// List-view projection: no long description, no services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    #[serde(rename = "localisation", default)]
    pub location: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
}

impl Keyed for CompanySummary {
    fn key(&self) -> RecordId {
        self.id
    }
}

/// Detail-view projection: no short description, services preview only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    #[serde(rename = "localisation", default)]
    pub location: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "localisation", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl CompanyUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Patch for CompanyUpdate {
    const IDENTITY_FIELD: &'static str = "_id";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewService;

    #[test]
    fn test_detail_caps_services_preview() {
        let mut company = Company::new(RecordId::generate(), NewCompany::new("Barber"));
        for i in 0..15 {
            company.services.push(Service::new(
                RecordId::generate(),
                NewService::new(format!("cut {i}"), 100, 30),
            ));
        }

        let detail = company.detail(10);
        assert_eq!(detail.services.len(), 10);
        assert_eq!(detail.services[0].name, "cut 0");
    }

    #[test]
    fn test_summary_drops_long_fields() {
        let company = Company::new(
            RecordId::generate(),
            NewCompany::new("Barber").with_descriptions("short", "long"),
        );
        let summary = company.summary();
        assert_eq!(summary.short_description.as_deref(), Some("short"));
        assert_eq!(summary.id, company.id);
    }
}
