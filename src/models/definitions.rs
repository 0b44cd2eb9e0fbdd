use serde::{Deserialize, Deserializer, Serialize};

use super::{default_full_depth, default_u_height, DeviceTypeDefaults};

/// DeviceTypeDefinition describes one device type to load into the catalog.
///
/// Required strings default to empty when absent so that the importer can
/// reject them with context instead of the whole block failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u_height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_full_depth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interfaces: Vec<InterfaceDefinition>,
}

impl DeviceTypeDefinition {
    /// Attributes applied only when the device type does not exist yet
    pub fn defaults(&self) -> DeviceTypeDefaults {
        DeviceTypeDefaults {
            part_number: self.part_number.clone().unwrap_or_default(),
            u_height: self.u_height.unwrap_or_else(default_u_height),
            is_full_depth: self.is_full_depth.unwrap_or_else(default_full_depth),
            comments: self.comments.clone().unwrap_or_default(),
        }
    }
}

/// InterfaceDefinition is a naming pattern plus the type of every interface it yields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pattern: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub iface_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mgmt_only: bool,
}

/// A key present with no value (`type:`) reads the same as an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// ImportRequest triggers an import run. At most one of `definitions` and
/// `yaml` may be set; with neither, the configured definitions are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub definitions: Option<Vec<DeviceTypeDefinition>>,
    #[serde(default)]
    pub yaml: Option<String>,
}
