use serde::Serialize;
use uuid::Uuid;

/// Outcome of importing one device type definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceTypeReport {
    pub manufacturer: String,
    pub model: String,
    pub manufacturer_created: bool,
    pub device_type_created: bool,
    /// Candidate interface templates built from the definition's patterns
    pub interfaces_processed: usize,
    /// Candidates that did not already exist
    pub interfaces_created: u64,
    pub skipped_interfaces: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportTotals {
    pub manufacturers_created: usize,
    pub device_types_created: usize,
    pub device_types_reused: usize,
    pub interfaces_processed: usize,
    pub interfaces_created: u64,
    pub errors: usize,
}

/// Result of an import run. For a dry run every count describes what the
/// run would have written.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub message: String,
    pub totals: ImportTotals,
    pub device_types: Vec<DeviceTypeReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            dry_run,
            message: String::new(),
            totals: ImportTotals::default(),
            device_types: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record a recoverable error and log it
    pub fn record_error(&mut self, err: impl std::fmt::Display) {
        let message = err.to_string();
        tracing::error!("{}", message);
        self.errors.push(message);
    }

    /// Compute totals and the summary message once the run is done
    pub fn finalize(&mut self) {
        let reports = &self.device_types;
        self.totals = ImportTotals {
            manufacturers_created: reports.iter().filter(|r| r.manufacturer_created).count(),
            device_types_created: reports.iter().filter(|r| r.device_type_created).count(),
            device_types_reused: reports.iter().filter(|r| !r.device_type_created).count(),
            interfaces_processed: reports.iter().map(|r| r.interfaces_processed).sum(),
            interfaces_created: reports.iter().map(|r| r.interfaces_created).sum(),
            errors: self.errors.len(),
        };

        self.message = format!(
            "Imported {} device types ({} created, {} existing): {} interfaces processed ({} new), {} errors{}",
            reports.len(),
            self.totals.device_types_created,
            self.totals.device_types_reused,
            self.totals.interfaces_processed,
            self.totals.interfaces_created,
            self.totals.errors,
            if self.dry_run { " (dry run)" } else { "" },
        );
    }

    #[cfg(test)]
    pub fn report(&self, manufacturer: &str, model: &str) -> Option<&DeviceTypeReport> {
        self.device_types
            .iter()
            .find(|r| r.manufacturer == manufacturer && r.model == model)
    }
}
