//! # Address Repository
//!
//! The per-user address store.
//!
//! ## Default Address Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For every user_id, at most ONE row has is_default = 1                  │
//! │                                                                         │
//! │  save(default) / set_default(id)                                       │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  UPDATE ... SET is_default = 0  WHERE user_id = ? AND id != ?          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write the chosen row with is_default = 1                              │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │                                                                         │
//! │  Backstop: UNIQUE INDEX (user_id) WHERE is_default = 1                 │
//! │  A racing writer fails with UniqueViolation instead of leaving two     │
//! │  defaults behind.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clearing runs before setting because the partial index is checked per
//! statement.
//!
//! ## Ownership
//! [`AddressRepository::delete`] removes by id with no owner check. Callers
//! that act for a user check ownership first.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use innoprint_core::Address;

const ADDRESS_COLUMNS: &str =
    "id, user_id, name, line1, line2, city, state, zip_code, country, is_default";

/// Repository for saved delivery addresses.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.addresses();
///
/// let id = repo.save(&address).await?;
/// repo.set_default(&id, "uid-1").await?;
/// let default = repo.get_default("uid-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    /// Creates a new AddressRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Inserts or updates an address and returns its id.
    ///
    /// ## Behavior
    /// - `address.id == None`: inserts with a fresh UUID
    /// - `address.id == Some(id)`: updates that row, or inserts it under
    ///   `id` if absent
    /// - `address.is_default`: every other address of the same user loses
    ///   its default flag in the same transaction
    ///
    /// ## Errors
    /// - `DbError::NotFound` if `id` exists but belongs to another user.
    ///   Nothing is changed.
    /// - Any store failure, unmodified
    pub async fn save(&self, address: &Address) -> DbResult<String> {
        let id = address.id.clone().unwrap_or_else(generate_address_id);
        let now = Utc::now();

        debug!(
            id = %id,
            user_id = %address.user_id,
            is_default = address.is_default,
            "Saving address"
        );

        let mut tx = self.pool.begin().await?;

        if address.is_default {
            let cleared = sqlx::query(
                r#"
                UPDATE user_addresses
                SET is_default = 0, updated_at = ?3
                WHERE user_id = ?1 AND id != ?2 AND is_default = 1
                "#,
            )
            .bind(&address.user_id)
            .bind(&id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(log_store_error("clear default"))?;

            debug!(cleared = cleared.rows_affected(), "Cleared previous default");
        }

        // The upsert leaves rows owned by another user untouched.
        let written = sqlx::query(
            r#"
            INSERT INTO user_addresses (
                id, user_id, name, line1, line2, city, state, zip_code, country,
                is_default, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                line1 = excluded.line1,
                line2 = excluded.line2,
                city = excluded.city,
                state = excluded.state,
                zip_code = excluded.zip_code,
                country = excluded.country,
                is_default = excluded.is_default,
                updated_at = excluded.updated_at
            WHERE user_addresses.user_id = excluded.user_id
            "#,
        )
        .bind(&id)
        .bind(&address.user_id)
        .bind(&address.name)
        .bind(&address.line1)
        .bind(&address.line2)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .bind(address.is_default)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(log_store_error("write address"))?;

        if written.rows_affected() == 0 {
            return Err(DbError::not_found("Address", id));
        }

        tx.commit().await?;

        info!(id = %id, user_id = %address.user_id, "Address saved");
        Ok(id)
    }

    /// Returns every address owned by `user_id`, oldest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Address>> {
        debug!(user_id = %user_id, "Listing addresses");

        let sql = format!(
            "SELECT {} FROM user_addresses WHERE user_id = ?1 ORDER BY created_at, rowid",
            ADDRESS_COLUMNS
        );

        let addresses = sqlx::query_as::<_, Address>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(log_store_error("list addresses"))?;

        Ok(addresses)
    }

    /// Returns the user's default address, if one is set.
    pub async fn get_default(&self, user_id: &str) -> DbResult<Option<Address>> {
        let sql = format!(
            "SELECT {} FROM user_addresses WHERE user_id = ?1 AND is_default = 1 LIMIT 1",
            ADDRESS_COLUMNS
        );

        let address = sqlx::query_as::<_, Address>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_store_error("get default address"))?;

        Ok(address)
    }

    /// Gets an address by id, whoever owns it.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Address>> {
        let sql = format!("SELECT {} FROM user_addresses WHERE id = ?1", ADDRESS_COLUMNS);

        let address = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_store_error("get address"))?;

        Ok(address)
    }

    /// Number of addresses `user_id` has saved.
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_addresses WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(log_store_error("count addresses"))?;

        Ok(count)
    }

    /// Removes an address by id. No ownership check.
    ///
    /// Deleting the default address leaves the user with no default.
    ///
    /// ## Returns
    /// * `Ok(true)` - A row was removed
    /// * `Ok(false)` - No address had that id
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting address");

        let result = sqlx::query("DELETE FROM user_addresses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_store_error("delete address"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Makes `address_id` the user's only default address.
    ///
    /// Opens with a write so the transaction holds SQLite's write lock from
    /// its first statement; a concurrent caller waits for it rather than
    /// failing on a stale read snapshot.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if `address_id` is not one of `user_id`'s
    ///   addresses. The transaction is rolled back and nothing changes.
    pub async fn set_default(&self, address_id: &str, user_id: &str) -> DbResult<()> {
        debug!(id = %address_id, user_id = %user_id, "Setting default address");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE user_addresses
            SET is_default = 0, updated_at = ?3
            WHERE user_id = ?1 AND id != ?2 AND is_default = 1
            "#,
        )
        .bind(user_id)
        .bind(address_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(log_store_error("clear default"))?;

        let set = sqlx::query(
            r#"
            UPDATE user_addresses
            SET is_default = 1, updated_at = ?3
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(address_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(log_store_error("set default"))?;

        if set.rows_affected() == 0 {
            return Err(DbError::not_found("Address", address_id));
        }

        tx.commit().await?;

        info!(id = %address_id, user_id = %user_id, "Default address updated");
        Ok(())
    }
}

/// Logs a store failure and converts it, leaving the message intact.
fn log_store_error(operation: &'static str) -> impl Fn(sqlx::Error) -> DbError {
    move |err| {
        error!(operation, error = %err, "Address store operation failed");
        DbError::from(err)
    }
}

/// Helper to generate a new address ID.
pub fn generate_address_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tests
// =============================================================================
