//! SQLite identity trait repository implementation.
//!
//! One row per trait name; writes are upserts on the unique `trait_name`.

use chrono::Utc;
use prism_core::repository::identity::IdentityRepository;
use prism_types::error::RepositoryError;
use prism_types::identity::{IdentityTrait, TraitUpdate};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{db_err, format_datetime, parse_datetime, parse_json, to_json};

/// SQLite-backed implementation of `IdentityRepository`.
pub struct SqliteIdentityRepository {
    pool: DatabasePool,
}

impl SqliteIdentityRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct TraitRow {
    trait_name: String,
    trait_value: String,
    confidence_level: f64,
    last_updated: String,
}

impl TraitRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            trait_name: row.try_get("trait_name")?,
            trait_value: row.try_get("trait_value")?,
            confidence_level: row.try_get("confidence_level")?,
            last_updated: row.try_get("last_updated")?,
        })
    }

    fn into_trait(self) -> Result<IdentityTrait, RepositoryError> {
        Ok(IdentityTrait {
            name: self.trait_name,
            value: parse_json(&self.trait_value)?,
            confidence: self.confidence_level,
            last_updated: parse_datetime(&self.last_updated)?,
        })
    }
}

impl IdentityRepository for SqliteIdentityRepository {
    async fn snapshot(&self) -> Result<Vec<IdentityTrait>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT trait_name, trait_value, confidence_level, last_updated FROM identity_traits ORDER BY trait_name",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                TraitRow::from_row(row)
                    .map_err(db_err)?
                    .into_trait()
            })
            .collect()
    }

    async fn upsert_trait(&self, update: &TraitUpdate) -> Result<(), RepositoryError> {
        let value = to_json(&update.value)?;
        let now = format_datetime(&Utc::now());

        sqlx::query(
            r#"INSERT INTO identity_traits (trait_name, trait_value, confidence_level, last_updated)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (trait_name) DO UPDATE SET
                   trait_value = excluded.trait_value,
                   confidence_level = excluded.confidence_level,
                   last_updated = excluded.last_updated"#,
        )
        .bind(&update.name)
        .bind(&value)
        .bind(update.confidence)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
