//! Project records and the inputs that create or change them.

use std::time::{SystemTime, UNIX_EPOCH};

use builder_core::DesignDocument;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PersistError, PersistResult};

/// Project identifier.
pub type ProjectId = Uuid;

/// Fields supplied when creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    /// Display name.
    pub name: String,
    /// Industry the site targets.
    pub industry: String,
    /// Serialized design document.
    #[serde(default)]
    pub design_data: serde_json::Value,
    /// Generated stylesheet.
    #[serde(default)]
    pub css_code: String,
    /// Generated markup.
    #[serde(default)]
    pub html_code: String,
}

impl NewProject {
    /// Project with an empty design.
    #[must_use]
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            design_data: serde_json::Value::Null,
            css_code: String::new(),
            html_code: String::new(),
        }
    }

    /// Attach a design document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn with_design(mut self, design: &DesignDocument) -> PersistResult<Self> {
        self.design_data = design.to_value()?;
        Ok(self)
    }

    /// Attach generated stylesheet and markup.
    #[must_use]
    pub fn with_code(mut self, css: impl Into<String>, html: impl Into<String>) -> Self {
        self.css_code = css.into();
        self.html_code = html.into();
        self
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Validation`] if the name or industry is blank.
    pub fn validate(&self) -> PersistResult<()> {
        require_text("name", &self.name)?;
        require_text("industry", &self.industry)
    }
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New industry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// New design document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_data: Option<serde_json::Value>,
    /// New stylesheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_code: Option<String>,
    /// New markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_code: Option<String>,
}

impl ProjectPatch {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the design document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn design(mut self, design: &DesignDocument) -> PersistResult<Self> {
        self.design_data = Some(design.to_value()?);
        Ok(self)
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.industry.is_none()
            && self.design_data.is_none()
            && self.css_code.is_none()
            && self.html_code.is_none()
    }

    /// Check the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Validation`] for an empty patch or a blank
    /// name or industry.
    pub fn validate(&self) -> PersistResult<()> {
        if self.is_empty() {
            return Err(PersistError::Validation("update changes nothing".into()));
        }
        if let Some(ref name) = self.name {
            require_text("name", name)?;
        }
        if let Some(ref industry) = self.industry {
            require_text("industry", industry)?;
        }
        Ok(())
    }

    /// Merge into a record, stamping `updated_at`.
    pub fn apply_to(&self, record: &mut ProjectRecord, now_ms: u64) {
        if let Some(ref name) = self.name {
            record.name.clone_from(name);
        }
        if let Some(ref industry) = self.industry {
            record.industry.clone_from(industry);
        }
        if let Some(ref design) = self.design_data {
            record.design_data = design.clone();
        }
        if let Some(ref css) = self.css_code {
            record.css_code.clone_from(css);
        }
        if let Some(ref html) = self.html_code {
            record.html_code.clone_from(html);
        }
        record.updated_at = now_ms;
    }
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Project identifier.
    pub id: ProjectId,
    /// Owning user id.
    pub owner: String,
    /// Display name.
    pub name: String,
    /// Industry the site targets.
    pub industry: String,
    /// Serialized design document.
    #[serde(default)]
    pub design_data: serde_json::Value,
    /// Generated stylesheet.
    #[serde(default)]
    pub css_code: String,
    /// Generated markup.
    #[serde(default)]
    pub html_code: String,
    /// Creation time, Unix milliseconds.
    pub created_at: u64,
    /// Last update time, Unix milliseconds.
    pub updated_at: u64,
}

impl ProjectRecord {
    /// Build a fresh record owned by `owner`.
    #[must_use]
    pub fn create(owner: &str, project: NewProject, now_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            name: project.name,
            industry: project.industry,
            design_data: project.design_data,
            css_code: project.css_code,
            html_code: project.html_code,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Decode the stored design. A null design decodes as an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the design data is not a design document.
    pub fn design(&self) -> PersistResult<DesignDocument> {
        if self.design_data.is_null() {
            return Ok(DesignDocument::default());
        }
        Ok(DesignDocument::from_value(self.design_data.clone())?)
    }
}

fn require_text(field: &str, value: &str) -> PersistResult<()> {
    if value.trim().is_empty() {
        return Err(PersistError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Get the current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
