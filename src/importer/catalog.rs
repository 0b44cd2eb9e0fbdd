use anyhow::Result;
use async_trait::async_trait;

use crate::models::*;

/// How an import run's transaction ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Commit,
    Rollback,
}

/// Catalog store the importer reconciles against.
///
/// One value spans one transactional scope: every call participates in it
/// and `finish` closes it.
#[async_trait]
pub trait Catalog: Send {
    /// Look up a manufacturer by exact name
    async fn find_manufacturer(&mut self, name: &str) -> Result<Option<Manufacturer>>;

    /// Look up a manufacturer by exact name, creating it when missing.
    /// The flag is true when this call created it.
    async fn find_or_create_manufacturer(&mut self, name: &str) -> Result<(Manufacturer, bool)>;

    /// Look up the device type for (manufacturer, model), creating it with
    /// `defaults` when missing. Existing device types are returned unchanged.
    async fn find_or_create_device_type(
        &mut self,
        manufacturer: &Manufacturer,
        model: &str,
        defaults: &DeviceTypeDefaults,
    ) -> Result<(DeviceType, bool)>;

    /// Insert interface templates, skipping names the device type already
    /// has. Returns how many rows were created.
    async fn bulk_insert_interface_templates(
        &mut self,
        device_type_id: i64,
        templates: &[NewInterfaceTemplate],
    ) -> Result<u64>;

    async fn finish(self, outcome: Outcome) -> Result<()>
    where
        Self: Sized;
}
