use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::models::*;

use super::row_helpers::map_device_type_row;

const SELECT_DEVICE_TYPE: &str = r#"
    SELECT dt.id, dt.manufacturer_id, m.name AS manufacturer_name, dt.model,
           dt.part_number, dt.u_height, dt.is_full_depth, dt.comments,
           dt.created_at, dt.updated_at,
           (SELECT COUNT(*) FROM interface_templates it WHERE it.device_type_id = dt.id) AS interface_count
    FROM device_types dt
    JOIN manufacturers m ON m.id = dt.manufacturer_id
"#;

pub struct DeviceTypeRepo;

impl DeviceTypeRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<DeviceType>> {
        let rows = sqlx::query(&format!("{} ORDER BY m.name, dt.model", SELECT_DEVICE_TYPE))
            .fetch_all(pool)
            .await?;

        Ok(rows.iter().map(map_device_type_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<DeviceType>> {
        let row = sqlx::query(&format!("{} WHERE dt.id = ?", SELECT_DEVICE_TYPE))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.as_ref().map(map_device_type_row))
    }

    pub async fn get_by_key(
        conn: &mut SqliteConnection,
        manufacturer_id: i64,
        model: &str,
    ) -> Result<Option<DeviceType>> {
        let row = sqlx::query(&format!(
            "{} WHERE dt.manufacturer_id = ? AND dt.model = ?",
            SELECT_DEVICE_TYPE
        ))
        .bind(manufacturer_id)
        .bind(model)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.as_ref().map(map_device_type_row))
    }

    /// Fetch the device type for (manufacturer, model), creating it with
    /// `defaults` when missing. Existing rows are never modified.
    pub async fn find_or_create(
        conn: &mut SqliteConnection,
        manufacturer: &Manufacturer,
        model: &str,
        defaults: &DeviceTypeDefaults,
    ) -> Result<(DeviceType, bool)> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO device_types (manufacturer_id, model, part_number, u_height, is_full_depth, comments, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(manufacturer_id, model) DO NOTHING
            "#,
        )
        .bind(manufacturer.id)
        .bind(model)
        .bind(&defaults.part_number)
        .bind(defaults.u_height)
        .bind(defaults.is_full_depth)
        .bind(&defaults.comments)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create device type {} {}", manufacturer.name, model))?;

        let device_type = Self::get_by_key(conn, manufacturer.id, model)
            .await?
            .context("Device type not found after creation")?;
        Ok((device_type, result.rows_affected() > 0))
    }
}
