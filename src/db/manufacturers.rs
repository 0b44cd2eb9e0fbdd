use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::models::*;

use super::row_helpers::map_manufacturer_row;

const SELECT_MANUFACTURER: &str = r#"
    SELECT m.id, m.name, m.created_at, m.updated_at,
           COALESCE(COUNT(dt.id), 0) as device_type_count
    FROM manufacturers m
    LEFT JOIN device_types dt ON dt.manufacturer_id = m.id
"#;

/// Manufacturer database operations
pub struct ManufacturerRepo;

impl ManufacturerRepo {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Manufacturer>> {
        let rows = sqlx::query(&format!("{} GROUP BY m.id ORDER BY m.name", SELECT_MANUFACTURER))
            .fetch_all(pool)
            .await?;

        Ok(rows.iter().map(map_manufacturer_row).collect())
    }

    pub async fn get_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Manufacturer>> {
        let row = sqlx::query(&format!("{} WHERE m.name = ? GROUP BY m.id", SELECT_MANUFACTURER))
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.as_ref().map(map_manufacturer_row))
    }

    /// Fetch a manufacturer by exact name, creating it when missing.
    /// Returns the record and whether it was created by this call.
    pub async fn find_or_create(conn: &mut SqliteConnection, name: &str) -> Result<(Manufacturer, bool)> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO manufacturers (name, created_at, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create manufacturer '{}'", name))?;

        let manufacturer = Self::get_by_name(conn, name)
            .await?
            .context("Manufacturer not found after creation")?;
        Ok((manufacturer, result.rows_affected() > 0))
    }
}
