//! # Starter Catalogue
//!
//! Populates an empty database with the storefront's launch models.
//!
//! Seeding is skipped when any model already exists, so it is safe to
//! call on every startup.

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::model::generate_model_id;
use innoprint_core::{Category, Model};

/// One row of the starter catalogue.
struct SeedModel {
    title: &'static str,
    description: &'static str,
    creator: &'static str,
    category: Category,
    created: (i32, u32, u32),
    download_count: i64,
    print_count: i64,
    base_price: f64,
    base_print_time: f64,
}

const FILLER: &str = "It is a long established fact that a reader will be distracted by the readable content of a page when looking at its layout.";

const STARTER_MODELS: &[SeedModel] = &[
    SeedModel {
        title: "Model 01",
        description: "This is a detailed 3D model of a spherical object with bubbles. Perfect for decorative purposes or educational displays.",
        creator: "John Doe",
        category: Category::Decoration,
        created: (2023, 12, 1),
        download_count: 120,
        print_count: 45,
        base_price: 800.0,
        base_print_time: 8.0,
    },
    SeedModel {
        title: "Model 02",
        description: "A detailed skull model with intricate patterns. Great for artistic projects or Halloween decorations.",
        creator: "Jane Smith",
        category: Category::Art,
        created: (2023, 11, 15),
        download_count: 85,
        print_count: 32,
        base_price: 1200.0,
        base_print_time: 12.0,
    },
    SeedModel {
        title: "Model 03",
        description: "A minimalist figurine model with smooth surfaces. Perfect for modern home decor or collectibles.",
        creator: "Alex Johnson",
        category: Category::Figurine,
        created: (2023, 10, 22),
        download_count: 65,
        print_count: 28,
        base_price: 600.0,
        base_print_time: 6.0,
    },
    SeedModel {
        title: "Model 04",
        description: FILLER,
        creator: "Sarah Williams",
        category: Category::Decoration,
        created: (2023, 9, 18),
        download_count: 42,
        print_count: 15,
        base_price: 950.0,
        base_print_time: 9.0,
    },
    SeedModel {
        title: "Model 05",
        description: FILLER,
        creator: "Michael Brown",
        category: Category::Art,
        created: (2023, 8, 30),
        download_count: 98,
        print_count: 37,
        base_price: 700.0,
        base_print_time: 7.0,
    },
    SeedModel {
        title: "Model 06",
        description: FILLER,
        creator: "Emily Davis",
        category: Category::Figurine,
        created: (2023, 7, 25),
        download_count: 76,
        print_count: 29,
        base_price: 1100.0,
        base_print_time: 11.0,
    },
    SeedModel {
        title: "Model 07",
        description: FILLER,
        creator: "David Wilson",
        category: Category::Gadget,
        created: (2023, 6, 20),
        download_count: 54,
        print_count: 21,
        base_price: 500.0,
        base_print_time: 5.0,
    },
    SeedModel {
        title: "Model 08",
        description: FILLER,
        creator: "Olivia Martinez",
        category: Category::Gadget,
        created: (2023, 5, 15),
        download_count: 112,
        print_count: 43,
        base_price: 650.0,
        base_print_time: 6.5,
    },
    SeedModel {
        title: "Model 09",
        description: FILLER,
        creator: "James Taylor",
        category: Category::Decoration,
        created: (2023, 4, 10),
        download_count: 89,
        print_count: 34,
        base_price: 900.0,
        base_print_time: 9.0,
    },
];

/// Number of models in the starter catalogue.
pub const STARTER_MODEL_COUNT: usize = STARTER_MODELS.len();

fn created_at((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn to_model(index: usize, seed: &SeedModel) -> Model {
    let n = index + 1;
    Model {
        id: generate_model_id(),
        title: seed.title.to_string(),
        description: seed.description.to_string(),
        creator: seed.creator.to_string(),
        owner_id: None,
        category: seed.category,
        file_url: format!("/models/model{:02}.glb", n),
        thumbnail_url: Some(format!("/images/model{:02}.jpg", n)),
        download_count: seed.download_count,
        print_count: seed.print_count,
        base_price: seed.base_price,
        base_print_time: seed.base_print_time,
        license: Some("cc-by".to_string()),
        tags: None,
        allow_derivatives: true,
        allow_commercial_use: false,
        is_listed: true,
        created_at: created_at(seed.created),
    }
}

/// Inserts the starter catalogue if the models table is empty.
///
/// Returns the number of models inserted (zero when skipped).
pub async fn seed_catalogue(db: &Database) -> DbResult<usize> {
    let repo = db.models();

    let existing = repo.count().await?;
    if existing > 0 {
        info!(existing, "Catalogue already populated, skipping seed");
        return Ok(0);
    }

    for (index, seed) in STARTER_MODELS.iter().enumerate() {
        repo.insert(&to_model(index, seed)).await?;
    }

    info!(count = STARTER_MODEL_COUNT, "Starter catalogue seeded");
    Ok(STARTER_MODEL_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    #[tokio::test]
    async fn test_seed_populates_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed_catalogue(&db).await.unwrap(), STARTER_MODEL_COUNT);
        assert_eq!(seed_catalogue(&db).await.unwrap(), 0);
        assert_eq!(db.models().count().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_seeded_models_are_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalogue(&db).await.unwrap();

        let listed = db.models().list_listed(None).await.unwrap();
        assert_eq!(listed.first().unwrap().title, "Model 01");
        assert_eq!(listed.last().unwrap().title, "Model 09");

        let gadgets = db.models().list_listed(Some(Category::Gadget)).await.unwrap();
        assert_eq!(gadgets.len(), 2);
    }

    #[test]
    fn test_seed_row_urls() {
        let model = to_model(1, &STARTER_MODELS[1]);
        assert_eq!(model.file_url, "/models/model02.glb");
        assert_eq!(model.thumbnail_url.as_deref(), Some("/images/model02.jpg"));
        assert_eq!(model.base_price, 1200.0);
    }
}
