//! Idempotent device type import.
//!
//! Each definition resolves (or creates) its manufacturer and device type,
//! expands its interface patterns into candidate templates and bulk inserts
//! them, skipping names the device type already has. A run shares one
//! transaction; a dry run rolls it back after the summary is computed.

mod catalog;
mod error;
mod summary;

use std::str::FromStr;

use anyhow::Result;
use tracing::Instrument;

use crate::db::Store;
use crate::definitions::DefinitionSet;
use crate::expand::expand;
use crate::models::*;

pub use catalog::{Catalog, Outcome};
pub use error::{DefinitionError, ImportError};
pub use summary::{DeviceTypeReport, ImportSummary};

/// What to do when a definition names a manufacturer the catalog lacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManufacturerPolicy {
    #[default]
    CreateOnDemand,
    RequireExisting,
}

impl FromStr for ManufacturerPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" | "create-on-demand" => Ok(Self::CreateOnDemand),
            "require" | "require-existing" => Ok(Self::RequireExisting),
            other => anyhow::bail!("unknown manufacturer policy '{}'", other),
        }
    }
}

/// Runs imports against the catalog store
#[derive(Clone)]
pub struct Importer {
    store: Store,
    policy: ManufacturerPolicy,
}

impl Importer {
    pub fn new(store: Store, policy: ManufacturerPolicy) -> Self {
        Self { store, policy }
    }

    /// Import definitions in one transaction, discarding it when `dry_run` is set
    pub async fn import_definitions(
        &self,
        definitions: &[DeviceTypeDefinition],
        dry_run: bool,
    ) -> Result<ImportSummary, ImportError> {
        let catalog = self.store.begin_catalog().await?;
        run(catalog, definitions, &[], dry_run, self.policy).await
    }

    /// Import a parsed definition set; its rejected blocks are reported as errors
    pub async fn import_set(&self, set: &DefinitionSet, dry_run: bool) -> Result<ImportSummary, ImportError> {
        let catalog = self.store.begin_catalog().await?;
        run(catalog, &set.definitions, &set.rejected, dry_run, self.policy).await
    }
}

/// Reconcile `definitions` against `catalog` and close its transaction:
/// committed on success, rolled back for a dry run or on failure.
pub async fn run<C: Catalog>(
    catalog: C,
    definitions: &[DeviceTypeDefinition],
    rejected: &[DefinitionError],
    dry_run: bool,
    policy: ManufacturerPolicy,
) -> Result<ImportSummary, ImportError> {
    let summary = ImportSummary::new(dry_run);
    let span = tracing::info_span!("import", run_id = %summary.run_id, dry_run);

    execute(catalog, definitions, rejected, dry_run, policy, summary)
        .instrument(span)
        .await
}

async fn execute<C: Catalog>(
    mut catalog: C,
    definitions: &[DeviceTypeDefinition],
    rejected: &[DefinitionError],
    dry_run: bool,
    policy: ManufacturerPolicy,
    mut summary: ImportSummary,
) -> Result<ImportSummary, ImportError> {
    tracing::info!("Starting device type import (dry run: {})", dry_run);
    for err in rejected {
        summary.record_error(err);
    }

    if let Err(e) = reconcile(&mut catalog, definitions, policy, &mut summary).await {
        tracing::error!("Import aborted, rolling back: {:#}", e);
        if let Err(rollback_err) = catalog.finish(Outcome::Rollback).await {
            tracing::error!("Rollback failed: {:#}", rollback_err);
        }
        return Err(ImportError::Transaction(e));
    }

    summary.finalize();
    let outcome = if dry_run { Outcome::Rollback } else { Outcome::Commit };
    catalog.finish(outcome).await?;

    tracing::info!("{}", summary.message);
    Ok(summary)
}

/// Apply every definition in order. Definition-level problems are recorded
/// in `summary` and skipped; only catalog failures return `Err`.
pub async fn reconcile<C: Catalog>(
    catalog: &mut C,
    definitions: &[DeviceTypeDefinition],
    policy: ManufacturerPolicy,
    summary: &mut ImportSummary,
) -> Result<()> {
    for def in definitions {
        let manufacturer_name = def.manufacturer.trim();
        let model = def.model.trim();

        if manufacturer_name.is_empty() {
            summary.record_error(DefinitionError::MissingManufacturer {
                model: model.to_string(),
            });
            continue;
        }
        if model.is_empty() {
            summary.record_error(DefinitionError::MissingModel {
                manufacturer: manufacturer_name.to_string(),
            });
            continue;
        }

        let (manufacturer, manufacturer_created) = match policy {
            ManufacturerPolicy::CreateOnDemand => catalog.find_or_create_manufacturer(manufacturer_name).await?,
            ManufacturerPolicy::RequireExisting => match catalog.find_manufacturer(manufacturer_name).await? {
                Some(m) => (m, false),
                None => {
                    summary.record_error(DefinitionError::UnknownManufacturer {
                        name: manufacturer_name.to_string(),
                    });
                    continue;
                }
            },
        };
        if manufacturer_created {
            tracing::info!("Created new Manufacturer: {}", manufacturer.name);
        } else {
            tracing::info!("Using existing Manufacturer: {}", manufacturer.name);
        }

        let (device_type, device_type_created) = catalog
            .find_or_create_device_type(&manufacturer, model, &def.defaults())
            .await?;
        if device_type_created {
            tracing::info!("Created new DeviceType: {} {}", manufacturer.name, model);
        } else {
            tracing::info!("Using existing DeviceType: {} {}", manufacturer.name, model);
        }

        let (candidates, skipped_interfaces) = build_candidates(def, model, summary);
        let interfaces_created = if candidates.is_empty() {
            0
        } else {
            catalog
                .bulk_insert_interface_templates(device_type.id, &candidates)
                .await?
        };
        tracing::info!(
            "Processed {} interfaces for {} ({} new)",
            candidates.len(),
            model,
            interfaces_created
        );

        summary.device_types.push(DeviceTypeReport {
            manufacturer: manufacturer.name,
            model: model.to_string(),
            manufacturer_created,
            device_type_created,
            interfaces_processed: candidates.len(),
            interfaces_created,
            skipped_interfaces,
        });
    }
    Ok(())
}

/// Expand every interface definition into candidate templates. Returns the
/// batch and how many interface entries were skipped.
fn build_candidates(
    def: &DeviceTypeDefinition,
    model: &str,
    summary: &mut ImportSummary,
) -> (Vec<NewInterfaceTemplate>, usize) {
    let mut candidates = Vec::new();
    let mut skipped = 0;

    for iface in &def.interfaces {
        let pattern = iface.pattern.trim();
        let iface_type = iface.iface_type.trim();
        if pattern.is_empty() || iface_type.is_empty() {
            summary.record_error(DefinitionError::InvalidInterface {
                model: model.to_string(),
                pattern: iface.pattern.clone(),
                iface_type: iface.iface_type.clone(),
            });
            skipped += 1;
            continue;
        }

        let names = match expand(pattern) {
            Ok(names) => names,
            Err(e) => {
                summary.record_error(format!("Interface pattern error in {}: {}", model, e));
                skipped += 1;
                continue;
            }
        };

        candidates.extend(names.into_iter().map(|name| NewInterfaceTemplate {
            name,
            iface_type: iface_type.to_string(),
            mgmt_only: iface.mgmt_only,
        }));
    }

    (candidates, skipped)
}
