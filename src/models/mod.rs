use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod definitions;

pub use definitions::*;

/// Manufacturer owns a set of device types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DeviceType is a hardware model identified by (manufacturer, model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: i64,
    pub manufacturer_id: i64,
    pub manufacturer_name: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    pub u_height: i32,
    pub is_full_depth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_count: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes written when a device type is first created
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTypeDefaults {
    pub part_number: String,
    pub u_height: i32,
    pub is_full_depth: bool,
    pub comments: String,
}

impl Default for DeviceTypeDefaults {
    fn default() -> Self {
        Self {
            part_number: String::new(),
            u_height: default_u_height(),
            is_full_depth: default_full_depth(),
            comments: String::new(),
        }
    }
}

pub(crate) fn default_u_height() -> i32 {
    1
}

pub(crate) fn default_full_depth() -> bool {
    true
}

/// InterfaceTemplate is one named, typed interface slot on a device type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceTemplate {
    pub id: i64,
    pub device_type_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub iface_type: String,
    pub mgmt_only: bool,
    pub created_at: DateTime<Utc>,
}

/// Candidate interface template produced by pattern expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterfaceTemplate {
    pub name: String,
    pub iface_type: String,
    pub mgmt_only: bool,
}

/// DeviceTypeDetail bundles a device type with its interface templates
#[derive(Debug, Clone, Serialize)]
pub struct DeviceTypeDetail {
    #[serde(flatten)]
    pub device_type: DeviceType,
    pub interfaces: Vec<InterfaceTemplate>,
}
