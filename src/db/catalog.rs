use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Pool, Sqlite, Transaction};

use crate::importer::{Catalog, Outcome};
use crate::models::*;

use super::device_types::DeviceTypeRepo;
use super::interface_templates::InterfaceTemplateRepo;
use super::manufacturers::ManufacturerRepo;

/// Catalog backed by one SQLite transaction. Every mutation made through it
/// becomes visible only when finished with `Outcome::Commit`; dropping it
/// unfinished rolls back.
pub struct SqliteCatalog {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteCatalog {
    pub(super) async fn begin(pool: &Pool<Sqlite>) -> Result<Self> {
        let tx = pool.begin().await.context("Failed to begin catalog transaction")?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn find_manufacturer(&mut self, name: &str) -> Result<Option<Manufacturer>> {
        ManufacturerRepo::get_by_name(&mut self.tx, name).await
    }

    async fn find_or_create_manufacturer(&mut self, name: &str) -> Result<(Manufacturer, bool)> {
        ManufacturerRepo::find_or_create(&mut self.tx, name).await
    }

    async fn find_or_create_device_type(
        &mut self,
        manufacturer: &Manufacturer,
        model: &str,
        defaults: &DeviceTypeDefaults,
    ) -> Result<(DeviceType, bool)> {
        DeviceTypeRepo::find_or_create(&mut self.tx, manufacturer, model, defaults).await
    }

    async fn bulk_insert_interface_templates(
        &mut self,
        device_type_id: i64,
        templates: &[NewInterfaceTemplate],
    ) -> Result<u64> {
        InterfaceTemplateRepo::bulk_insert_ignoring_conflicts(&mut self.tx, device_type_id, templates).await
    }

    async fn finish(self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Commit => self.tx.commit().await.context("Failed to commit catalog transaction"),
            Outcome::Rollback => self.tx.rollback().await.context("Failed to roll back catalog transaction"),
        }
    }
}
