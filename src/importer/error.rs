use thiserror::Error;

/// A definition or interface entry that cannot be imported. Recoverable:
/// the entry is logged and skipped, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Definition block {index} could not be parsed: {message}")]
    Unparseable { index: usize, message: String },
    #[error("Manufacturer not specified for model '{model}'")]
    MissingManufacturer { model: String },
    #[error("Missing model name for manufacturer {manufacturer}")]
    MissingModel { manufacturer: String },
    #[error("Manufacturer '{name}' not found. Create it first.")]
    UnknownManufacturer { name: String },
    #[error("Invalid interface definition in {model}: pattern={pattern:?} type={iface_type:?}")]
    InvalidInterface {
        model: String,
        pattern: String,
        iface_type: String,
    },
}

/// Failure that aborts a whole import run
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Catalog transaction failed: {0:#}")]
    Transaction(#[from] anyhow::Error),
}
