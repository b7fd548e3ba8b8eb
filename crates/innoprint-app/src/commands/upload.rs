//! # Upload Commands
//!
//! Quick-print uploads and catalogue publishing. Both paths store a model
//! owned by the signed-in user; only published models are listed.

use std::time::Instant;
use tracing::{debug, info};

use innoprint_core::upload::{quick_print_draft, validate_model_file, ModelFile, PublishForm};
use innoprint_core::Model;
use innoprint_db::Database;

use crate::error::ApiResult;
use crate::state::{AppConfig, Session};

/// Stores an uploaded file as an unlisted model ready to quote.
///
/// ## Errors
/// - `UNAUTHENTICATED` when signed out
/// - `UPLOAD_ERROR` for an unsupported format or an oversized file
pub async fn quick_print_upload(
    db: &Database,
    config: &AppConfig,
    session: &Session,
    file: ModelFile,
) -> ApiResult<Model> {
    let identity = session.require_identity()?;
    debug!(file_name = %file.file_name, size_bytes = file.size_bytes, "quick_print_upload command");

    validate_model_file(&file, config.max_upload_bytes())?;
    let draft = quick_print_draft(&file, &identity, config.uploads.defaults())?;
    let model = db.models().create(&draft).await?;

    info!(model_id = %model.id, "Quick print model stored");
    Ok(model)
}

/// Publishes an uploaded file to the catalogue.
pub async fn publish_model(
    db: &Database,
    config: &AppConfig,
    session: &Session,
    file: ModelFile,
    form: PublishForm,
) -> ApiResult<Model> {
    let identity = session.require_identity()?;
    debug!(file_name = %file.file_name, title = %form.title, "publish_model command");

    let start = Instant::now();
    validate_model_file(&file, config.max_upload_bytes())?;
    let draft = form.into_draft(&file, &identity, config.uploads.defaults())?;
    let model = db.models().create(&draft).await?;

    info!(
        model_id = %model.id,
        category = %model.category,
        duration_ms = start.elapsed().as_millis(),
        "Model published"
    );
    Ok(model)
}

/// Models uploaded by the signed-in user, listed or not.
pub async fn my_uploads(db: &Database, session: &Session) -> ApiResult<Vec<Model>> {
    let identity = session.require_identity()?;
    Ok(db.models().list_by_owner(&identity.uid).await?)
}
