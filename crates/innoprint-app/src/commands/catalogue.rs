//! # Catalogue Commands
//!
//! Browsing listed models and opening a model's detail page.
//!
//! ## Browse Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_catalogue({ category: "art", search: "skull", sort: "popular" })  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ModelRepository::list_listed(Some(Art))   ◄── SQL: listed + category   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogueQuery::apply                     ◄── search + sort            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ModelCard>                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use innoprint_core::catalogue::CatalogueQuery;
use innoprint_core::{Category, CoreError, Model};
use innoprint_db::Database;

use crate::error::ApiResult;

/// Catalogue grid entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub creator: String,
    pub category: Category,
    pub thumbnail_url: Option<String>,
    pub download_count: i64,
    pub print_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for ModelCard {
    fn from(m: Model) -> Self {
        ModelCard {
            id: m.id,
            title: m.title,
            description: m.description,
            creator: m.creator,
            category: m.category,
            thumbnail_url: m.thumbnail_url,
            download_count: m.download_count,
            print_count: m.print_count,
            created_at: m.created_at,
        }
    }
}

/// Lists catalogue models matching `query`.
///
/// ## Returns
/// Listed models in the requested order. Unlisted (quick print) uploads
/// never appear.
pub async fn list_catalogue(db: &Database, query: &CatalogueQuery) -> ApiResult<Vec<ModelCard>> {
    debug!(
        category = ?query.category,
        search = %query.search,
        sort = ?query.sort,
        "list_catalogue command"
    );
    let start = Instant::now();

    let listed = db.models().list_listed(query.category).await?;
    let models = query.apply(listed)?;

    info!(
        count = models.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Catalogue listed"
    );

    Ok(models.into_iter().map(ModelCard::from).collect())
}

/// Gets one model for its detail page. Unlisted models are reachable by id.
pub async fn get_model(db: &Database, id: &str) -> ApiResult<Model> {
    debug!(id = %id, "get_model command");

    let model = db
        .models()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::ModelNotFound(id.to_string()))?;

    Ok(model)
}

/// Counts a download of the model file.
pub async fn record_download(db: &Database, id: &str) -> ApiResult<()> {
    debug!(id = %id, "record_download command");
    db.models().record_download(id).await?;
    Ok(())
}
