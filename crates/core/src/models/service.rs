//! Service model - one entry of the catalog

use serde::{Deserialize, Serialize};

fn default_quantity() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

/// A sellable service as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: u32,
    pub name: String,
    /// Whole pesos
    pub price: u64,
    #[serde(default)]
    pub description: String,
    /// Image path or URL
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Inactive services are hidden from the public listing
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Service {
    /// Build a record from new fields and an assigned id
    pub fn from_new(id: u32, fields: NewService) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            description: fields.description,
            image: fields.image,
            quantity: fields.quantity,
            active: true,
        }
    }

    /// Copy of this record with the patch applied
    pub fn patched(&self, patch: &ServicePatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(image) = &patch.image {
            next.image = image.clone();
        }
        if let Some(quantity) = patch.quantity {
            next.quantity = quantity;
        }
        if let Some(active) = patch.active {
            next.active = active;
        }
        next
    }

    /// Case-insensitive match on name or description
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Fields supplied when adding a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl NewService {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
            description: String::new(),
            image: String::new(),
            quantity: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: Option<u32>,
    pub active: Option<bool>,
}

impl ServicePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
