use sqlx::{Row, sqlite::SqliteRow};

use crate::models::*;

/// Filter empty strings to None; the catalog stores '' instead of NULL
pub fn none_if_empty(opt: Option<String>) -> Option<String> {
    opt.filter(|s| !s.is_empty())
}

/// Map a SQLite row to a Manufacturer struct
pub fn map_manufacturer_row(row: &SqliteRow) -> Manufacturer {
    Manufacturer {
        id: row.get("id"),
        name: row.get("name"),
        device_type_count: Some(row.get("device_type_count")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Map a SQLite row to a DeviceType struct
pub fn map_device_type_row(row: &SqliteRow) -> DeviceType {
    DeviceType {
        id: row.get("id"),
        manufacturer_id: row.get("manufacturer_id"),
        manufacturer_name: row.get("manufacturer_name"),
        model: row.get("model"),
        part_number: none_if_empty(row.get("part_number")),
        u_height: row.get("u_height"),
        is_full_depth: row.get("is_full_depth"),
        comments: none_if_empty(row.get("comments")),
        interface_count: Some(row.get("interface_count")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Map a SQLite row to an InterfaceTemplate struct
pub fn map_interface_template_row(row: &SqliteRow) -> InterfaceTemplate {
    InterfaceTemplate {
        id: row.get("id"),
        device_type_id: row.get("device_type_id"),
        name: row.get("name"),
        iface_type: row.get("type"),
        mgmt_only: row.get("mgmt_only"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_if_empty() {
        assert_eq!(none_if_empty(None), None);
        assert_eq!(none_if_empty(Some(String::new())), None);
        assert_eq!(none_if_empty(Some("N9K-C9236C".to_string())), Some("N9K-C9236C".to_string()));
    }
}
