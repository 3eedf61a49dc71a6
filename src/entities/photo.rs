//! Photo entity type - project gallery and inspiration images

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// File extensions accepted as images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// A photo reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: EntityId,

    /// Owning project; `None` for the inspiration gallery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,

    pub filename: String,

    /// Where the image lives (path or URL)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caption: String,

    pub uploaded_at: NaiveDate,
}

impl Entity for Photo {
    const PREFIX: &'static str = "PHOTO";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        if self.caption.is_empty() {
            &self.filename
        } else {
            &self.caption
        }
    }
}

impl Photo {
    pub fn new(project_id: Option<EntityId>, filename: String, uploaded_at: NaiveDate) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Photo),
            project_id,
            url: filename.clone(),
            filename,
            caption: String::new(),
            uploaded_at,
        }
    }

    pub fn is_inspiration(&self) -> bool {
        self.project_id.is_none()
    }
}

/// Whether a filename carries an image extension
pub fn is_image_filename(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
