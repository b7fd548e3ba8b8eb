//! # Upload Rules
//!
//! Checks for model uploads and the drafts they turn into.
//!
//! ## Two Flows
//! ```text
//! ┌───────────────────────────────┐     ┌───────────────────────────────┐
//! │  Quick print                  │     │  Full publish                 │
//! │  ───────────                  │     │  ────────────                 │
//! │  file ──► validate_model_file │     │  file ──► validate_model_file │
//! │       ──► unlisted ModelDraft │     │  form ──► into_draft          │
//! │       ──► print options       │     │       ──► listed ModelDraft   │
//! └───────────────────────────────┘     └───────────────────────────────┘
//! ```
//!
//! File bytes never pass through here. The storefront stores the file and
//! reports its name, size and location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Category, Identity, ModelDraft};
use crate::validation::{validate_description, validate_title};
use crate::MAX_UPLOAD_BYTES;

/// File extensions the slicers accept, lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["stl", "obj", "stp", "step", "igs", "iges"];

/// An uploaded model file as reported by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelFile {
    pub file_name: String,
    pub size_bytes: u64,
    /// Where the storefront put the file.
    pub url: String,
}

impl ModelFile {
    /// File name without its extension, for a default title.
    pub fn stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

/// Checks extension and size, returning the lowercase extension.
///
/// ## Example
/// ```rust
/// use innoprint_core::upload::{validate_model_file, ModelFile};
///
/// let file = ModelFile { file_name: "Bracket.STL".into(), size_bytes: 2048, url: "/u/b.stl".into() };
/// assert_eq!(validate_model_file(&file, 50 * 1024 * 1024).unwrap(), "stl");
/// ```
pub fn validate_model_file(file: &ModelFile, max_bytes: u64) -> CoreResult<String> {
    let extension = file
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CoreError::UnsupportedFileFormat {
            extension,
            supported: SUPPORTED_EXTENSIONS.join(", "),
        });
    }

    let max_bytes = max_bytes.min(MAX_UPLOAD_BYTES);
    if file.size_bytes > max_bytes {
        return Err(CoreError::FileTooLarge {
            size_bytes: file.size_bytes,
            max_bytes,
        });
    }

    Ok(extension)
}

// =============================================================================
// License
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum License {
    #[default]
    #[serde(rename = "cc-by")]
    CcBy,
    #[serde(rename = "cc-by-sa")]
    CcBySa,
    #[serde(rename = "cc-by-nd")]
    CcByNd,
    #[serde(rename = "cc-by-nc")]
    CcByNc,
    #[serde(rename = "cc-by-nc-sa")]
    CcByNcSa,
    #[serde(rename = "cc-by-nc-nd")]
    CcByNcNd,
    #[serde(rename = "cc0")]
    Cc0,
    #[serde(rename = "custom")]
    Custom,
}

impl License {
    pub const ALL: [License; 8] = [
        License::CcBy,
        License::CcBySa,
        License::CcByNd,
        License::CcByNc,
        License::CcByNcSa,
        License::CcByNcNd,
        License::Cc0,
        License::Custom,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            License::CcBy => "cc-by",
            License::CcBySa => "cc-by-sa",
            License::CcByNd => "cc-by-nd",
            License::CcByNc => "cc-by-nc",
            License::CcByNcSa => "cc-by-nc-sa",
            License::CcByNcNd => "cc-by-nc-nd",
            License::Cc0 => "cc0",
            License::Custom => "custom",
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for License {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        License::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "license".to_string(),
                allowed: License::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Drafts
// =============================================================================

/// Base values given to uploaded models, which have no curated price yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadDefaults {
    pub base_price: f64,
    pub base_print_time: f64,
}

/// Builds the unlisted draft for a quick-print upload.
pub fn quick_print_draft(
    file: &ModelFile,
    uploader: &Identity,
    defaults: UploadDefaults,
) -> CoreResult<ModelDraft> {
    validate_model_file(file, MAX_UPLOAD_BYTES)?;

    Ok(ModelDraft {
        title: file.stem().to_string(),
        description: format!("Quick print upload: {}", file.file_name),
        creator: uploader.label().to_string(),
        owner_id: Some(uploader.uid.clone()),
        category: Category::Other,
        file_url: file.url.clone(),
        thumbnail_url: None,
        base_price: defaults.base_price,
        base_print_time: defaults.base_print_time,
        license: None,
        tags: None,
        allow_derivatives: false,
        allow_commercial_use: false,
        is_listed: false,
    })
}

/// The catalogue publish form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PublishForm {
    pub title: String,
    pub description: String,
    /// Category id as picked in the form; empty when nothing was picked.
    pub category: String,
    /// Comma-separated.
    pub tags: String,
    pub license: License,
    pub allow_derivatives: bool,
    pub allow_commercial_use: bool,
}

impl PublishForm {
    /// Validates the form and builds the listed draft for `file`.
    ///
    /// ## Errors
    /// - File problems as in [`validate_model_file`]
    /// - Missing title, description or category
    pub fn into_draft(
        self,
        file: &ModelFile,
        uploader: &Identity,
        defaults: UploadDefaults,
    ) -> CoreResult<ModelDraft> {
        validate_model_file(file, MAX_UPLOAD_BYTES)?;
        validate_title(&self.title)?;
        validate_description(&self.description)?;

        if self.category.trim().is_empty() {
            return Err(ValidationError::required("category").into());
        }
        let category: Category = self.category.parse()?;

        let tags = normalize_tags(&self.tags);

        Ok(ModelDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            creator: uploader.label().to_string(),
            owner_id: Some(uploader.uid.clone()),
            category,
            file_url: file.url.clone(),
            thumbnail_url: None,
            base_price: defaults.base_price,
            base_print_time: defaults.base_print_time,
            license: Some(self.license.as_str().to_string()),
            tags: (!tags.is_empty()).then_some(tags),
            allow_derivatives: self.allow_derivatives,
            allow_commercial_use: self.allow_commercial_use,
            is_listed: true,
        })
    }
}

/// Lowercases, trims and dedupes a comma-separated tag list.
fn normalize_tags(raw: &str) -> String {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(|t| t.trim().to_lowercase()) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.join(",")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> ModelFile {
        ModelFile {
            file_name: name.to_string(),
            size_bytes: size,
            url: format!("/uploads/{}", name),
        }
    }

    fn uploader() -> Identity {
        Identity {
            uid: "user-7".to_string(),
            email: "maker@example.com".to_string(),
            display_name: Some("Maker".to_string()),
        }
    }

    const DEFAULTS: UploadDefaults = UploadDefaults {
        base_price: 500.0,
        base_print_time: 5.0,
    };

    #[test]
    fn test_supported_formats_case_insensitive() {
        for name in ["a.stl", "b.OBJ", "c.Step", "d.stp", "e.igs", "f.IGES"] {
            assert!(validate_model_file(&file(name, 10), MAX_UPLOAD_BYTES).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_unsupported_format() {
        let err = validate_model_file(&file("model.glb", 10), MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedFileFormat { ref extension, .. } if extension == "glb"
        ));

        let err = validate_model_file(&file("noextension", 10), MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFileFormat { .. }));
    }

    #[test]
    fn test_size_limit() {
        assert!(validate_model_file(&file("a.stl", MAX_UPLOAD_BYTES), MAX_UPLOAD_BYTES).is_ok());
        let err =
            validate_model_file(&file("a.stl", MAX_UPLOAD_BYTES + 1), MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, CoreError::FileTooLarge { .. }));

        // A configured limit cannot raise the hard ceiling.
        let err = validate_model_file(&file("a.stl", MAX_UPLOAD_BYTES + 1), u64::MAX).unwrap_err();
        assert!(matches!(
            err,
            CoreError::FileTooLarge { max_bytes, .. } if max_bytes == MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn test_quick_print_draft_is_unlisted() {
        let draft = quick_print_draft(&file("bracket.stl", 1024), &uploader(), DEFAULTS).unwrap();
        assert!(!draft.is_listed);
        assert_eq!(draft.title, "bracket");
        assert_eq!(draft.owner_id.as_deref(), Some("user-7"));
        assert_eq!(draft.base_price, 500.0);
        assert_eq!(draft.file_url, "/uploads/bracket.stl");
    }

    #[test]
    fn test_publish_form_builds_listed_draft() {
        let form = PublishForm {
            title: " Desk Organizer ".to_string(),
            description: "Three compartments".to_string(),
            category: "tools".to_string(),
            tags: "Desk, office, desk,,".to_string(),
            license: License::CcByNc,
            allow_derivatives: true,
            allow_commercial_use: false,
        };

        let draft = form.into_draft(&file("organizer.obj", 4096), &uploader(), DEFAULTS).unwrap();
        assert!(draft.is_listed);
        assert_eq!(draft.title, "Desk Organizer");
        assert_eq!(draft.category, Category::Tool);
        assert_eq!(draft.tags.as_deref(), Some("desk,office"));
        assert_eq!(draft.license.as_deref(), Some("cc-by-nc"));
        assert_eq!(draft.creator, "Maker");
    }

    #[test]
    fn test_publish_form_requires_fields() {
        let base = PublishForm {
            title: "Vase".to_string(),
            description: "Spiral vase".to_string(),
            category: "home".to_string(),
            ..Default::default()
        };
        let f = file("vase.stl", 10);

        let missing_title = PublishForm { title: String::new(), ..base.clone() };
        assert!(matches!(
            missing_title.into_draft(&f, &uploader(), DEFAULTS),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let missing_category = PublishForm { category: "  ".to_string(), ..base.clone() };
        assert!(matches!(
            missing_category.into_draft(&f, &uploader(), DEFAULTS),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let bad_category = PublishForm { category: "weapons".to_string(), ..base.clone() };
        assert!(matches!(
            bad_category.into_draft(&f, &uploader(), DEFAULTS),
            Err(CoreError::Validation(ValidationError::NotAllowed { .. }))
        ));

        assert!(base.into_draft(&f, &uploader(), DEFAULTS).is_ok());
    }

    #[test]
    fn test_license_parse_and_serde() {
        assert_eq!("CC-BY-SA".parse::<License>().unwrap(), License::CcBySa);
        assert!("gpl".parse::<License>().is_err());
        assert_eq!(serde_json::to_string(&License::Cc0).unwrap(), "\"cc0\"");
    }
}
