//! Append-only log of contract requests

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::catalog::ServiceCatalog;
use crate::error::{Error, Result};
use crate::models::{ContactDetails, ContractRequest};
use crate::storage::{keys, KeyValueStore, Scope};

pub struct ContractLog<'a, S: KeyValueStore + ?Sized> {
    storage: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ContractLog<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Every submission, oldest first
    pub fn list(&self) -> Result<Vec<ContractRequest>> {
        match self.storage.get(Scope::Durable, keys::SERVICE_CONTRACTS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Record interest in an active service
    #[instrument(skip(self, catalog, details, now))]
    pub fn submit<C: KeyValueStore + ?Sized>(
        &self,
        catalog: &ServiceCatalog<'_, C>,
        service_id: u32,
        details: ContactDetails,
        now: DateTime<Utc>,
    ) -> Result<ContractRequest> {
        let service = catalog.get(service_id)?;
        if !service.active {
            return Err(Error::NotFound(format!("service {service_id} is not offered")));
        }
        validate(&details)?;

        let request = ContractRequest::new(service, details, now);
        let mut requests = self.list()?;
        requests.push(request.clone());
        self.storage.set(
            Scope::Durable,
            keys::SERVICE_CONTRACTS,
            &serde_json::to_string(&requests)?,
        )?;

        info!(request_id = %request.id, total = requests.len(), "Contract request saved");
        Ok(request)
    }
}

fn validate(details: &ContactDetails) -> Result<()> {
    if details.name.trim().is_empty() {
        return Err(Error::InvalidInput("client name is required".to_string()));
    }
    let email = details.email.trim();
    if email.is_empty() {
        return Err(Error::InvalidInput("client email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(Error::InvalidInput(format!("{email} is not an email address")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn details() -> ContactDetails {
        ContactDetails {
            name: "Ana Gómez".to_string(),
            email: "ana@example.com".to_string(),
            phone: "300 000 0000".to_string(),
            message: "Need a store".to_string(),
        }
    }

    #[test]
    fn test_submissions_append_in_order() {
        let store = MemoryStore::new();
        let catalog = ServiceCatalog::load(&store).unwrap();
        let log = ContractLog::new(&store);
        let now = Utc::now();

        let first = log.submit(&catalog, 3, details(), now).unwrap();
        let second = log.submit(&catalog, 1, details(), now).unwrap();

        assert_eq!(first.service_name, "E-commerce");
        assert_eq!(first.service_price, 1000);
        let ids: Vec<_> = log.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_legacy_entries_still_load() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Durable,
                keys::SERVICE_CONTRACTS,
                r#"[{"serviceName":"E-commerce","servicePrice":1000,"clientName":"Ana","clientEmail":"ana@example.com","clientPhone":"","clientMessage":"","timestamp":"2024-06-01T10:00:00.000Z"}]"#,
            )
            .unwrap();

        let requests = ContractLog::new(&store).list().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].service_id.is_none());
    }

    #[test]
    fn test_rejects_bad_details_and_inactive_services() {
        let store = MemoryStore::new();
        let mut catalog = ServiceCatalog::load(&store).unwrap();
        let log = ContractLog::new(&store);
        let now = Utc::now();

        let no_email = ContactDetails {
            email: "ana.example.com".to_string(),
            ..details()
        };
        assert!(matches!(
            log.submit(&catalog, 1, no_email, now),
            Err(Error::InvalidInput(_))
        ));

        catalog.set_active(1, false).unwrap();
        assert!(matches!(
            log.submit(&catalog, 1, details(), now),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            log.submit(&catalog, 99, details(), now),
            Err(Error::NotFound(_))
        ));
        assert!(log.list().unwrap().is_empty());
    }
}
