//! Service catalog store
//!
//! Holds the ordered service list in memory and mirrors the whole list to
//! durable storage on every change. Changes are built on a copy and only
//! adopted after the write succeeds, so memory and storage never diverge.

mod seed;

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::invariants::assert_catalog_invariants;
use crate::models::{NewService, Service, ServicePatch};
use crate::storage::{keys, KeyValueStore, Scope};

pub use seed::default_services;

/// How many related services the detail page shows
pub const RELATED_LIMIT: usize = 3;

pub struct ServiceCatalog<'a, S: KeyValueStore + ?Sized> {
    storage: &'a S,
    services: Vec<Service>,
}

impl<'a, S: KeyValueStore + ?Sized> ServiceCatalog<'a, S> {
    /// Load the stored catalog, seeding and persisting the defaults if none exists
    #[instrument(skip_all)]
    pub fn load(storage: &'a S) -> Result<Self> {
        let services = match storage.get(Scope::Durable, keys::SERVICES)? {
            Some(raw) => {
                let services: Vec<Service> = serde_json::from_str(&raw)?;
                check_stored(&services)?;
                debug!(count = services.len(), "Catalog loaded");
                services
            }
            None => {
                let services = default_services();
                storage.set(
                    Scope::Durable,
                    keys::SERVICES,
                    &serde_json::to_string(&services)?,
                )?;
                info!(count = services.len(), "Catalog seeded");
                services
            }
        };
        Ok(Self { storage, services })
    }

    /// Every service in catalog order
    pub fn list_all(&self) -> &[Service] {
        &self.services
    }

    /// Active services in catalog order
    pub fn list_active(&self) -> Vec<&Service> {
        self.services.iter().filter(|s| s.active).collect()
    }

    pub fn get(&self, id: u32) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Services whose name or description contains `query`, any case.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Service> {
        let query = query.trim();
        self.services
            .iter()
            .filter(|s| query.is_empty() || s.matches(query))
            .collect()
    }

    /// Up to `limit` other active services, in catalog order
    pub fn related(&self, id: u32, limit: usize) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|s| s.active && s.id != id)
            .take(limit)
            .collect()
    }

    /// Id the next added service will get
    pub fn next_id(&self) -> Result<u32> {
        self.services
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| Error::InvalidInput("no service ids left".to_string()))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn add(&mut self, input: NewService) -> Result<Service> {
        validate(&input.name, input.quantity)?;

        let service = Service::from_new(self.next_id()?, input);
        let mut next = self.services.clone();
        next.push(service.clone());
        self.commit(next)?;

        info!(id = service.id, "Service added");
        Ok(service)
    }

    #[instrument(skip(self, patch))]
    pub fn update(&mut self, id: u32, patch: &ServicePatch) -> Result<Service> {
        let index = self.position(id)?;
        let updated = self.services[index].patched(patch);
        validate(&updated.name, updated.quantity)?;

        let mut next = self.services.clone();
        next[index] = updated.clone();
        self.commit(next)?;

        info!("Service updated");
        Ok(updated)
    }

    /// Soft delete (`false`) or restore (`true`)
    pub fn set_active(&mut self, id: u32, active: bool) -> Result<Service> {
        self.update(
            id,
            &ServicePatch {
                active: Some(active),
                ..Default::default()
            },
        )
    }

    pub fn toggle_active(&mut self, id: u32) -> Result<Service> {
        let active = self.get(id)?.active;
        self.set_active(id, !active)
    }

    /// Remove the record entirely; `false` if no such id
    #[instrument(skip(self))]
    pub fn remove_permanently(&mut self, id: u32) -> Result<bool> {
        let Some(index) = self.services.iter().position(|s| s.id == id) else {
            return Ok(false);
        };

        let mut next = self.services.clone();
        next.remove(index);
        self.commit(next)?;

        info!("Service removed permanently");
        Ok(true)
    }

    fn position(&self, id: u32) -> Result<usize> {
        self.services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn commit(&mut self, next: Vec<Service>) -> Result<()> {
        assert_catalog_invariants(&next);
        let json = serde_json::to_string(&next)?;
        self.storage.set(Scope::Durable, keys::SERVICES, &json)?;
        self.services = next;
        Ok(())
    }
}

fn not_found(id: u32) -> Error {
    Error::NotFound(format!("service {id}"))
}

/// Reject stored lists that break id or quantity rules
fn check_stored(services: &[Service]) -> Result<()> {
    let mut seen = HashSet::with_capacity(services.len());
    for service in services {
        if service.id == 0 {
            return Err(Error::InvalidInput(format!(
                "stored service {:?} has id 0",
                service.name
            )));
        }
        if !seen.insert(service.id) {
            return Err(Error::InvalidInput(format!(
                "stored service id {} appears more than once",
                service.id
            )));
        }
        if service.quantity == 0 {
            return Err(Error::InvalidInput(format!(
                "stored service {} has quantity 0",
                service.id
            )));
        }
    }
    Ok(())
}

fn validate(name: &str, quantity: u32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("service name is required".to_string()));
    }
    if quantity == 0 {
        return Err(Error::InvalidInput("quantity must be at least 1".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Database, MemoryStore};

    fn store_with(services: &[Service]) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Durable,
                keys::SERVICES,
                &serde_json::to_string(services).unwrap(),
            )
            .unwrap();
        store
    }

    fn three_services() -> MemoryStore {
        store_with(&[
            Service::from_new(1, NewService::new("Desarrollo de sitios Web", 300)),
            Service::from_new(2, NewService::new("Aplicaciones Móviles", 600)),
            Service::from_new(3, NewService::new("E-commerce", 1000)),
        ])
    }

    fn ids(services: &[Service]) -> Vec<u32> {
        services.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_empty_storage_is_seeded_and_persisted() {
        let store = MemoryStore::new();
        let catalog = ServiceCatalog::load(&store).unwrap();

        assert_eq!(ids(catalog.list_all()), (1..=8).collect::<Vec<_>>());
        let stored = store.get(Scope::Durable, keys::SERVICES).unwrap().unwrap();
        let parsed: Vec<Service> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, catalog.list_all());
    }

    #[test]
    fn test_add_then_get() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        let fields = NewService::new("X", 10)
            .with_description("Something new")
            .with_image("assets/img/x.jpg")
            .with_quantity(2);
        let added = catalog.add(fields.clone()).unwrap();

        let fetched = catalog.get(added.id).unwrap();
        assert_eq!(fetched.id, 4);
        assert_eq!(fetched.name, fields.name);
        assert_eq!(fetched.price, fields.price);
        assert_eq!(fetched.description, fields.description);
        assert_eq!(fetched.image, fields.image);
        assert_eq!(fetched.quantity, 2);
        assert!(fetched.active);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        assert_eq!(catalog.add(NewService::new("X", 10)).unwrap().id, 4);
        assert!(catalog.remove_permanently(2).unwrap());
        assert_eq!(ids(catalog.list_all()), vec![1, 3, 4]);
        assert_eq!(catalog.add(NewService::new("Y", 20)).unwrap().id, 5);
    }

    #[test]
    fn test_first_id_is_one() {
        let store = store_with(&[]);
        let mut catalog = ServiceCatalog::load(&store).unwrap();
        assert_eq!(catalog.add(NewService::new("Only", 1)).unwrap().id, 1);
    }

    #[test]
    fn test_soft_delete_hides_from_active_listing() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        let once = catalog.set_active(2, false).unwrap();
        let after_once = catalog.list_all().to_vec();
        let twice = catalog.set_active(2, false).unwrap();

        assert_eq!(once, twice);
        assert_eq!(after_once, catalog.list_all());
        assert!(catalog.list_active().iter().all(|s| s.id != 2));
        assert_eq!(ids(catalog.list_all()), vec![1, 2, 3]);

        let restored = catalog.toggle_active(2).unwrap();
        assert!(restored.active);
        assert_eq!(catalog.list_active().len(), 3);
    }

    #[test]
    fn test_update_merges_fields() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        let patch = ServicePatch {
            name: Some("E-commerce Pro".to_string()),
            price: Some(1500),
            ..Default::default()
        };
        let updated = catalog.update(3, &patch).unwrap();
        assert_eq!(updated.name, "E-commerce Pro");
        assert_eq!(updated.price, 1500);
        assert_eq!(updated.quantity, 1);

        let reloaded = ServiceCatalog::load(&store).unwrap();
        assert_eq!(reloaded.get(3).unwrap(), &updated);
    }

    #[test]
    fn test_missing_ids() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        assert!(matches!(catalog.get(42), Err(Error::NotFound(_))));
        assert!(matches!(
            catalog.update(42, &ServicePatch::default()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(catalog.set_active(42, false), Err(Error::NotFound(_))));
        assert!(!catalog.remove_permanently(42).unwrap());
        assert_eq!(catalog.list_all().len(), 3);
    }

    #[test]
    fn test_hard_delete() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        assert!(catalog.remove_permanently(1).unwrap());
        assert!(matches!(catalog.get(1), Err(Error::NotFound(_))));
        assert_eq!(catalog.list_all().len(), 2);
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        assert!(matches!(
            catalog.add(NewService::new("  ", 10)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.add(NewService::new("Zero", 10).with_quantity(0)),
            Err(Error::InvalidInput(_))
        ));
        let blank_name = ServicePatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(catalog.update(1, &blank_name), Err(Error::InvalidInput(_))));
        assert_eq!(catalog.list_all().len(), 3);
    }

    #[test]
    fn test_failed_persist_leaves_memory_unchanged() {
        let store = three_services();
        let mut catalog = ServiceCatalog::load(&store).unwrap();
        let before = catalog.list_all().to_vec();

        store.set_fail_writes(true);
        assert!(matches!(
            catalog.add(NewService::new("X", 10)),
            Err(Error::StorageUnavailable(_))
        ));
        assert!(catalog.set_active(1, false).is_err());
        assert!(catalog.remove_permanently(2).is_err());
        assert_eq!(catalog.list_all(), before.as_slice());

        store.set_fail_writes(false);
        assert_eq!(catalog.add(NewService::new("X", 10)).unwrap().id, 4);
    }

    #[test]
    fn test_search_and_related() {
        let store = MemoryStore::new();
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        let hits: Vec<u32> = catalog.search("DESARROLLO").iter().map(|s| s.id).collect();
        assert_eq!(hits, vec![1]);
        assert_eq!(catalog.search("  ").len(), 8);

        catalog.set_active(2, false).unwrap();
        let related: Vec<u32> = catalog
            .related(1, RELATED_LIMIT)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(related, vec![3, 4, 5]);
    }

    #[test]
    fn test_catalog_on_sqlite() {
        let db = Database::open_in_memory().unwrap();
        {
            let mut catalog = ServiceCatalog::load(&db).unwrap();
            catalog.remove_permanently(8).unwrap();
        }
        let catalog = ServiceCatalog::load(&db).unwrap();
        assert_eq!(catalog.list_all().len(), 7);
        assert_eq!(catalog.next_id().unwrap(), 8);
    }

    #[test]
    fn test_corrupt_catalog_is_an_error() {
        let store = MemoryStore::new();
        store.set(Scope::Durable, keys::SERVICES, "[{").unwrap();
        assert!(matches!(
            ServiceCatalog::load(&store),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_stored_duplicates_rejected() {
        let store = store_with(&[
            Service::from_new(1, NewService::new("Web", 300)),
            Service::from_new(1, NewService::new("Mobile", 600)),
        ]);
        assert!(matches!(
            ServiceCatalog::load(&store),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_stored_zero_id_or_quantity_rejected() {
        let zero_id = store_with(&[Service::from_new(0, NewService::new("Web", 300))]);
        assert!(matches!(
            ServiceCatalog::load(&zero_id),
            Err(Error::InvalidInput(_))
        ));

        let zero_quantity = MemoryStore::new();
        zero_quantity
            .set(
                Scope::Durable,
                keys::SERVICES,
                r#"[{"id":1,"name":"Web","price":300,"description":"","image":"","quantity":0,"active":true}]"#,
            )
            .unwrap();
        assert!(matches!(
            ServiceCatalog::load(&zero_quantity),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_exhausted_id_space() {
        let store = store_with(&[Service::from_new(u32::MAX, NewService::new("Last", 1))]);
        let mut catalog = ServiceCatalog::load(&store).unwrap();

        assert!(matches!(catalog.next_id(), Err(Error::InvalidInput(_))));
        assert!(matches!(
            catalog.add(NewService::new("Overflow", 1)),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(catalog.list_all().len(), 1);
    }
}
