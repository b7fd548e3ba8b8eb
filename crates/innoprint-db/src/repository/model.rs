//! # Model Repository
//!
//! Database operations for printable model records.
//!
//! Listed models make up the catalogue. Quick-print uploads are stored
//! unlisted so they can be priced and ordered without showing up in
//! browsing.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use innoprint_core::{Category, Model, ModelDraft};

const MODEL_COLUMNS: &str = r#"
    id, title, description, creator, owner_id, category, file_url, thumbnail_url,
    download_count, print_count, base_price, base_print_time, license, tags,
    allow_derivatives, allow_commercial_use, is_listed, created_at
"#;

/// Repository for model records.
#[derive(Debug, Clone)]
pub struct ModelRepository {
    pool: SqlitePool,
}

impl ModelRepository {
    /// Creates a new ModelRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ModelRepository { pool }
    }

    /// Gets a model by its ID, listed or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Model>> {
        let sql = format!("SELECT {} FROM models WHERE id = ?1", MODEL_COLUMNS);

        let model = sqlx::query_as::<_, Model>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(model)
    }

    /// Lists catalogue models, newest first, optionally in one category.
    ///
    /// Search and other orderings are applied by
    /// `innoprint_core::catalogue::CatalogueQuery`.
    pub async fn list_listed(&self, category: Option<Category>) -> DbResult<Vec<Model>> {
        debug!(category = ?category, "Listing catalogue models");

        let sql = format!(
            r#"
            SELECT {} FROM models
            WHERE is_listed = 1 AND (?1 IS NULL OR category = ?1)
            ORDER BY created_at DESC
            "#,
            MODEL_COLUMNS
        );

        let models = sqlx::query_as::<_, Model>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(models)
    }

    /// Lists the models a user uploaded, listed or not.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Model>> {
        let sql = format!(
            "SELECT {} FROM models WHERE owner_id = ?1 ORDER BY created_at DESC",
            MODEL_COLUMNS
        );

        let models = sqlx::query_as::<_, Model>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(models)
    }

    /// Stores a draft, assigning id and creation time.
    pub async fn create(&self, draft: &ModelDraft) -> DbResult<Model> {
        let model = Model {
            id: generate_model_id(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            creator: draft.creator.clone(),
            owner_id: draft.owner_id.clone(),
            category: draft.category,
            file_url: draft.file_url.clone(),
            thumbnail_url: draft.thumbnail_url.clone(),
            download_count: 0,
            print_count: 0,
            base_price: draft.base_price,
            base_print_time: draft.base_print_time,
            license: draft.license.clone(),
            tags: draft.tags.clone(),
            allow_derivatives: draft.allow_derivatives,
            allow_commercial_use: draft.allow_commercial_use,
            is_listed: draft.is_listed,
            created_at: Utc::now(),
        };

        self.insert(&model).await?;

        info!(id = %model.id, listed = model.is_listed, "Model created");
        Ok(model)
    }

    /// Inserts a fully-formed model record.
    pub async fn insert(&self, model: &Model) -> DbResult<()> {
        debug!(id = %model.id, title = %model.title, "Inserting model");

        sqlx::query(
            r#"
            INSERT INTO models (
                id, title, description, creator, owner_id, category, file_url, thumbnail_url,
                download_count, print_count, base_price, base_print_time, license, tags,
                allow_derivatives, allow_commercial_use, is_listed, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18
            )
            "#,
        )
        .bind(&model.id)
        .bind(&model.title)
        .bind(&model.description)
        .bind(&model.creator)
        .bind(&model.owner_id)
        .bind(model.category)
        .bind(&model.file_url)
        .bind(&model.thumbnail_url)
        .bind(model.download_count)
        .bind(model.print_count)
        .bind(model.base_price)
        .bind(model.base_print_time)
        .bind(&model.license)
        .bind(&model.tags)
        .bind(model.allow_derivatives)
        .bind(model.allow_commercial_use)
        .bind(model.is_listed)
        .bind(model.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Increments the download counter.
    pub async fn record_download(&self, id: &str) -> DbResult<()> {
        self.increment(id, "download_count").await
    }

    /// Increments the print counter after a confirmed order.
    pub async fn record_print(&self, id: &str) -> DbResult<()> {
        self.increment(id, "print_count").await
    }

    async fn increment(&self, id: &str, column: &'static str) -> DbResult<()> {
        debug!(id = %id, column, "Incrementing counter");

        let sql = format!("UPDATE models SET {0} = {0} + 1 WHERE id = ?1", column);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Model", id));
        }

        Ok(())
    }

    /// Counts all models (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM models")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new model ID.
pub fn generate_model_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn draft(title: &str, category: Category, listed: bool) -> ModelDraft {
        ModelDraft {
            title: title.to_string(),
            description: "Test model".to_string(),
            creator: "Maker".to_string(),
            owner_id: Some("u1".to_string()),
            category,
            file_url: format!("/uploads/{}.stl", title),
            thumbnail_url: None,
            base_price: 500.0,
            base_print_time: 5.0,
            license: Some("cc-by".to_string()),
            tags: Some("desk,office".to_string()),
            allow_derivatives: true,
            allow_commercial_use: false,
            is_listed: listed,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.models();

        let created = repo.create(&draft("Vase", Category::Home, true)).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, "Vase");
        assert_eq!(fetched.category, Category::Home);
        assert_eq!(fetched.print_count, 0);
        assert_eq!(fetched.base_price, 500.0);
        assert_eq!(fetched.tag_list(), vec!["desk", "office"]);
        assert!(fetched.allow_derivatives);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_listed_hides_unlisted_and_filters_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.models();

        repo.create(&draft("Vase", Category::Home, true)).await.unwrap();
        repo.create(&draft("Wrench", Category::Tool, true)).await.unwrap();
        repo.create(&draft("Private", Category::Home, false)).await.unwrap();

        assert_eq!(repo.list_listed(None).await.unwrap().len(), 2);

        let home = repo.list_listed(Some(Category::Home)).await.unwrap();
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].title, "Vase");

        assert_eq!(repo.list_by_owner("u1").await.unwrap().len(), 3);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_counters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.models();

        let model = repo.create(&draft("Vase", Category::Home, true)).await.unwrap();
        repo.record_print(&model.id).await.unwrap();
        repo.record_print(&model.id).await.unwrap();
        repo.record_download(&model.id).await.unwrap();

        let fetched = repo.get_by_id(&model.id).await.unwrap().unwrap();
        assert_eq!(fetched.print_count, 2);
        assert_eq!(fetched.download_count, 1);

        let err = repo.record_print("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
