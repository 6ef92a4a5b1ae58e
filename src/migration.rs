//! DDL for the markers table. Every statement is idempotent so startup can run it unconditionally.

use crate::error::StoreError;
use crate::sql::{quoted, TableRef};
use sqlx::PgPool;

/// CREATE SCHEMA, CREATE TABLE and the title index, each `IF NOT EXISTS`.
pub async fn ensure_markers_table(pool: &PgPool, table: &TableRef) -> Result<(), StoreError> {
    for ddl in markers_ddl(table) {
        tracing::debug!(sql = %ddl, "migration");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(table = %table.qualified(), "markers table ready");
    Ok(())
}

fn markers_ddl(table: &TableRef) -> Vec<String> {
    let full_name = table.qualified();
    let index_name = quoted(&format!("{}_title_idx", table.table));
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&table.schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                "id" TEXT PRIMARY KEY CHECK ("id" ~ '^[0-9a-f]{{24}}$'),
                "title" VARCHAR(128) NOT NULL,
                "description" TEXT,
                "latitude" DOUBLE PRECISION NOT NULL,
                "longitude" DOUBLE PRECISION NOT NULL,
                "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            full_name
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (\"title\")",
            index_name, full_name
        ),
    ]
}
