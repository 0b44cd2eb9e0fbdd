use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};

use crate::models::*;

use super::row_helpers::map_interface_template_row;

/// Rows per INSERT statement; five binds per row keeps each statement
/// well under SQLite's host parameter limit.
const INSERT_CHUNK: usize = 150;

pub struct InterfaceTemplateRepo;

impl InterfaceTemplateRepo {
    /// List interface templates for a device type, in creation order
    pub async fn list_for_device_type(pool: &Pool<Sqlite>, device_type_id: i64) -> Result<Vec<InterfaceTemplate>> {
        let rows = sqlx::query(
            r#"
            SELECT id, device_type_id, name, type, mgmt_only, created_at
            FROM interface_templates
            WHERE device_type_id = ?
            ORDER BY id
            "#,
        )
        .bind(device_type_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(map_interface_template_row).collect())
    }

    /// Insert templates for a device type, leaving any existing
    /// (device_type_id, name) pair untouched. Returns the number of rows created.
    pub async fn bulk_insert_ignoring_conflicts(
        conn: &mut SqliteConnection,
        device_type_id: i64,
        templates: &[NewInterfaceTemplate],
    ) -> Result<u64> {
        let now = Utc::now();
        let mut created = 0;

        for chunk in templates.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO interface_templates (device_type_id, name, type, mgmt_only, created_at) ",
            );
            builder.push_values(chunk, |mut row, template| {
                row.push_bind(device_type_id)
                    .push_bind(&template.name)
                    .push_bind(&template.iface_type)
                    .push_bind(template.mgmt_only)
                    .push_bind(now);
            });
            builder.push(" ON CONFLICT(device_type_id, name) DO NOTHING");

            let result = builder
                .build()
                .execute(&mut *conn)
                .await
                .with_context(|| format!("Failed to insert interface templates for device type {}", device_type_id))?;
            created += result.rows_affected();
        }

        Ok(created)
    }
}
