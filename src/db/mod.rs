mod catalog;
mod device_types;
mod interface_templates;
mod manufacturers;
pub(crate) mod row_helpers;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::*;

pub use catalog::SqliteCatalog;

/// Typed error for "resource not found", downcast by the API layer
/// so handlers never match on message text.
#[derive(Debug, thiserror::Error)]
#[error("{resource} not found: {id}")]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: impl ToString) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

/// Store handles all catalog database operations, delegating to per-entity repo modules.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new catalog store with a specific pool size
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory catalog. A single long-lived connection keeps the
    /// database alive for the lifetime of the store.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")
    }

    /// Open a transactional catalog for one import run
    pub async fn begin_catalog(&self) -> Result<SqliteCatalog> {
        SqliteCatalog::begin(&self.pool).await
    }

    // ========== Manufacturer Operations ==========

    pub async fn list_manufacturers(&self) -> Result<Vec<Manufacturer>> {
        manufacturers::ManufacturerRepo::list(&self.pool).await
    }

    // ========== Device Type Operations ==========

    pub async fn list_device_types(&self) -> Result<Vec<DeviceType>> {
        device_types::DeviceTypeRepo::list(&self.pool).await
    }

    pub async fn get_device_type(&self, id: i64) -> Result<Option<DeviceType>> {
        device_types::DeviceTypeRepo::get(&self.pool, id).await
    }

    /// Device type with all of its interface templates
    pub async fn get_device_type_detail(&self, id: i64) -> Result<DeviceTypeDetail> {
        let device_type = self
            .get_device_type(id)
            .await?
            .ok_or_else(|| NotFoundError::new("Device type", id))?;
        let interfaces = self.list_interface_templates(id).await?;
        Ok(DeviceTypeDetail { device_type, interfaces })
    }

    // ========== Interface Template Operations ==========

    pub async fn list_interface_templates(&self, device_type_id: i64) -> Result<Vec<InterfaceTemplate>> {
        interface_templates::InterfaceTemplateRepo::list_for_device_type(&self.pool, device_type_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::{Catalog, Outcome};

    fn defaults() -> DeviceTypeDefaults {
        DeviceTypeDefaults {
            part_number: "DCS-7150S-24".to_string(),
            ..DeviceTypeDefaults::default()
        }
    }

    fn templates(names: &[&str]) -> Vec<NewInterfaceTemplate> {
        names
            .iter()
            .map(|name| NewInterfaceTemplate {
                name: name.to_string(),
                iface_type: "10gbase-x-sfpp".to_string(),
                mgmt_only: false,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let store = Store::in_memory().await.unwrap();
        let mut catalog = store.begin_catalog().await.unwrap();

        let (arista, created) = catalog.find_or_create_manufacturer("Arista").await.unwrap();
        assert!(created);
        let (again, created) = catalog.find_or_create_manufacturer("Arista").await.unwrap();
        assert!(!created);
        assert_eq!(arista.id, again.id);

        let (dt, created) = catalog
            .find_or_create_device_type(&arista, "DCS-7150S-24", &defaults())
            .await
            .unwrap();
        assert!(created);
        assert_eq!(dt.manufacturer_name, "Arista");
        assert_eq!(dt.part_number.as_deref(), Some("DCS-7150S-24"));

        let changed = DeviceTypeDefaults {
            part_number: "changed".to_string(),
            u_height: 2,
            ..DeviceTypeDefaults::default()
        };
        let (same, created) = catalog
            .find_or_create_device_type(&arista, "DCS-7150S-24", &changed)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(same.id, dt.id);
        assert_eq!(same.part_number.as_deref(), Some("DCS-7150S-24"));
        assert_eq!(same.u_height, 1);

        catalog.finish(Outcome::Commit).await.unwrap();
        assert_eq!(store.list_device_types().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_insert_skips_existing_names() {
        let store = Store::in_memory().await.unwrap();
        let mut catalog = store.begin_catalog().await.unwrap();
        let (cisco, _) = catalog.find_or_create_manufacturer("Cisco").await.unwrap();
        let (dt, _) = catalog
            .find_or_create_device_type(&cisco, "Nexus N9K-C9236C", &DeviceTypeDefaults::default())
            .await
            .unwrap();

        let first = catalog
            .bulk_insert_interface_templates(dt.id, &templates(&["Ethernet1/1", "Ethernet1/2"]))
            .await
            .unwrap();
        assert_eq!(first, 2);

        // Overlapping batch, with a duplicate inside the batch itself
        let second = catalog
            .bulk_insert_interface_templates(dt.id, &templates(&["Ethernet1/2", "Ethernet1/3", "Ethernet1/3"]))
            .await
            .unwrap();
        assert_eq!(second, 1);
        catalog.finish(Outcome::Commit).await.unwrap();

        let names: Vec<String> = store
            .list_interface_templates(dt.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Ethernet1/1", "Ethernet1/2", "Ethernet1/3"]);
    }

    #[tokio::test]
    async fn test_bulk_insert_spans_multiple_statements() {
        let store = Store::in_memory().await.unwrap();
        let mut catalog = store.begin_catalog().await.unwrap();
        let (arista, _) = catalog.find_or_create_manufacturer("Arista").await.unwrap();
        let (dt, _) = catalog
            .find_or_create_device_type(&arista, "DCS-7280CR2-60", &DeviceTypeDefaults::default())
            .await
            .unwrap();

        let names: Vec<String> = (1..=400).map(|i| format!("Ethernet{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let created = catalog
            .bulk_insert_interface_templates(dt.id, &templates(&refs))
            .await
            .unwrap();
        assert_eq!(created, 400);
        catalog.finish(Outcome::Commit).await.unwrap();

        let detail = store.get_device_type_detail(dt.id).await.unwrap();
        assert_eq!(detail.interfaces.len(), 400);
        assert_eq!(detail.device_type.interface_count, Some(400));
    }

    #[tokio::test]
    async fn test_rollback_discards_changes() {
        let store = Store::in_memory().await.unwrap();
        let mut catalog = store.begin_catalog().await.unwrap();
        catalog.find_or_create_manufacturer("Arista").await.unwrap();
        catalog.finish(Outcome::Rollback).await.unwrap();

        assert!(store.list_manufacturers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_device_type_is_not_found() {
        let store = Store::in_memory().await.unwrap();
        let err = store.get_device_type_detail(42).await.unwrap_err();
        assert!(err.downcast_ref::<NotFoundError>().is_some());
        assert_eq!(err.to_string(), "Device type not found: 42");
    }
}
