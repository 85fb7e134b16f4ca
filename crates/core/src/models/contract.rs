//! Contract request model - a "hire this service" submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Service;

/// Contact details typed into the hire form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Stored submission; service name and price are copied at submit time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequest {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub service_id: Option<u32>,
    pub service_name: String,
    pub service_price: u64,
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub client_message: String,
    pub timestamp: DateTime<Utc>,
}

impl ContractRequest {
    pub fn new(service: &Service, details: ContactDetails, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id: Some(service.id),
            service_name: service.name.clone(),
            service_price: service.price,
            client_name: details.name.trim().to_string(),
            client_email: details.email.trim().to_string(),
            client_phone: details.phone.trim().to_string(),
            client_message: details.message,
            timestamp,
        }
    }
}
