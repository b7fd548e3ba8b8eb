//! # Catalogue Browsing
//!
//! Filtering and ordering of catalogue listings. The database returns listed
//! models; this module decides which of them a query shows and in what order.
//!
//! ```text
//! listed models ──► category filter ──► search filter ──► sort ──► page
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Category, Model};
use crate::validation::validate_search_query;

/// Catalogue sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Most downloads first.
    Popular,
    /// Most prints first.
    Prints,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "popular" => Ok(SortOrder::Popular),
            "prints" | "printed" => Ok(SortOrder::Prints),
            _ => Err(ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: vec![
                    "newest".to_string(),
                    "oldest".to_string(),
                    "popular".to_string(),
                    "prints".to_string(),
                ],
            }),
        }
    }
}

/// A catalogue page request. `None` category means all categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CatalogueQuery {
    pub category: Option<Category>,
    pub search: String,
    pub sort: SortOrder,
}

impl CatalogueQuery {
    /// Whether `model` passes this query's filters. Unlisted models never do.
    pub fn matches(&self, model: &Model, search: &str) -> bool {
        if !model.is_listed {
            return false;
        }

        if let Some(category) = self.category {
            if model.category != category {
                return false;
            }
        }

        if search.is_empty() {
            return true;
        }

        [&model.title, &model.description, &model.creator]
            .iter()
            .any(|field| field.to_lowercase().contains(search))
    }

    /// Filters and sorts `models`.
    ///
    /// Search is case-insensitive over title, description and creator.
    /// Ties keep the input order.
    ///
    /// ## Errors
    /// Returns a validation error if the search text is too long.
    pub fn apply(&self, models: Vec<Model>) -> Result<Vec<Model>, ValidationError> {
        let search = validate_search_query(&self.search)?.to_lowercase();

        let mut result: Vec<Model> = models
            .into_iter()
            .filter(|m| self.matches(m, &search))
            .collect();

        match self.sort {
            SortOrder::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Popular => result.sort_by(|a, b| b.download_count.cmp(&a.download_count)),
            SortOrder::Prints => result.sort_by(|a, b| b.print_count.cmp(&a.print_count)),
        }

        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn model(
        id: &str,
        title: &str,
        creator: &str,
        category: Category,
        day: u32,
        downloads: i64,
        prints: i64,
    ) -> Model {
        Model {
            id: id.to_string(),
            title: title.to_string(),
            description: "A detailed model".to_string(),
            creator: creator.to_string(),
            owner_id: None,
            category,
            file_url: format!("/models/{}.glb", id),
            thumbnail_url: None,
            download_count: downloads,
            print_count: prints,
            base_price: 800.0,
            base_print_time: 8.0,
            license: None,
            tags: None,
            allow_derivatives: true,
            allow_commercial_use: false,
            is_listed: true,
            created_at: Utc.with_ymd_and_hms(2023, 6, day, 0, 0, 0).unwrap(),
        }
    }

    fn models() -> Vec<Model> {
        vec![
            model("1", "Bubble Sphere", "John Doe", Category::Decoration, 1, 120, 45),
            model("2", "Skull", "Jane Smith", Category::Art, 15, 85, 32),
            model("3", "Figurine", "Alex Johnson", Category::Figurine, 22, 65, 28),
            model("4", "Phone Stand", "Jane Smith", Category::Gadget, 10, 112, 50),
        ]
    }

    fn ids(models: &[Model]) -> Vec<&str> {
        models.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let result = CatalogueQuery::default().apply(models()).unwrap();
        assert_eq!(ids(&result), vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn test_sort_orders() {
        let q = |sort| CatalogueQuery { sort, ..Default::default() };
        assert_eq!(ids(&q(SortOrder::Oldest).apply(models()).unwrap()), vec!["1", "4", "2", "3"]);
        assert_eq!(ids(&q(SortOrder::Popular).apply(models()).unwrap()), vec!["1", "4", "2", "3"]);
        assert_eq!(ids(&q(SortOrder::Prints).apply(models()).unwrap()), vec!["4", "1", "2", "3"]);
    }

    #[test]
    fn test_category_filter() {
        let query = CatalogueQuery {
            category: Some(Category::Art),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(models()).unwrap()), vec!["2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let query = CatalogueQuery {
            search: "JANE".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(models()).unwrap()), vec!["2", "4"]);

        let query = CatalogueQuery {
            search: "detailed".to_string(),
            ..Default::default()
        };
        assert_eq!(query.apply(models()).unwrap().len(), 4);
    }

    #[test]
    fn test_unlisted_models_hidden() {
        let mut all = models();
        all[0].is_listed = false;
        let result = CatalogueQuery::default().apply(all).unwrap();
        assert!(!ids(&result).contains(&"1"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("Popular".parse::<SortOrder>().unwrap(), SortOrder::Popular);
        assert_eq!("prints".parse::<SortOrder>().unwrap(), SortOrder::Prints);
        assert!("random".parse::<SortOrder>().is_err());
    }
}
