use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::document::FormType;
use crate::tokenize::normalize_text;

use super::error::{TemplateError, TemplateResult};

/// Token rules that fingerprint one template version.
///
/// Published template versions are immutable; the engine only reads this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Every token must be present.
    #[serde(default)]
    pub required_tokens_all: BTreeSet<String>,
    /// At least one token must be present.
    #[serde(default)]
    pub required_tokens_any: BTreeSet<String>,
    /// Each present token adds a small bonus.
    #[serde(default)]
    pub optional_tokens: BTreeSet<String>,
    /// Regex tested against the normalized token text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_code_regex: Option<String>,
    /// Per-token point overrides for required-all and optional tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_weights: Option<BTreeMap<String, f64>>,
}

impl SelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_all<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tokens_all
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn require_any<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tokens_any
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn optional<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_tokens
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn form_code(mut self, regex: impl Into<String>) -> Self {
        self.form_code_regex = Some(regex.into());
        self
    }

    pub fn token_weight(mut self, token: impl Into<String>, weight: f64) -> Self {
        self.token_weights
            .get_or_insert_with(BTreeMap::new)
            .insert(token.into(), weight);
        self
    }

    /// Configured points for `token`, or `default` when not overridden.
    ///
    /// Keys are compared in normalized form, so `"Job"` and `"job"` name the same
    /// token.
    pub fn weight_for(&self, token: &str, default: f64) -> f64 {
        let Some(weights) = self.token_weights.as_ref() else {
            return default;
        };
        if let Some(points) = weights.get(token) {
            return *points;
        }
        let key = normalize_text(token);
        weights
            .iter()
            .find(|(k, _)| normalize_text(k) == key)
            .map_or(default, |(_, points)| *points)
    }
}

/// Normalized rectangle; all components lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn full_page() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRegion {
    pub name: String,
    /// 1-based page number.
    pub page: u32,
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl RoiRegion {
    pub fn new(name: impl Into<String>, page: u32) -> Self {
        Self {
            name: name.into(),
            page,
            bounds: Bounds::full_page(),
            fields: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> TemplateResult<()> {
        if self.page == 0 {
            return Err(TemplateError::InvalidRoiPage {
                region: self.name.clone(),
            });
        }

        let components = [
            ("x", self.bounds.x),
            ("y", self.bounds.y),
            ("width", self.bounds.width),
            ("height", self.bounds.height),
        ];
        for (component, value) in components {
            if !(0.0..=1.0).contains(&value) {
                return Err(TemplateError::InvalidRoiBounds {
                    region: self.name.clone(),
                    component,
                    value,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiConfig {
    #[serde(default)]
    pub regions: Vec<RoiRegion>,
}

impl RoiConfig {
    pub fn new(regions: Vec<RoiRegion>) -> Self {
        Self { regions }
    }

    pub fn validate(&self) -> TemplateResult<()> {
        self.regions.iter().try_for_each(RoiRegion::validate)
    }
}

/// Page-level shape a template expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutExpectations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_sections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<FormType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Date,
    Pattern,
    Regex,
    String,
    Required,
    /// Any type the engine has no dedicated check for; handled like `String`.
    #[serde(other)]
    Other,
}

/// A critical field the active template expects to find somewhere in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExpectation {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldExpectation {
    pub fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
            pattern: None,
        }
    }

    pub fn with_pattern(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_type: FieldType::Pattern,
            pattern: Some(pattern.into()),
        }
    }
}

/// One active template version as supplied by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCandidate {
    pub template_id: String,
    pub version_id: String,
    pub template_slug: String,
    pub selection_config: SelectionConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi_config: Option<RoiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_expectations: Option<LayoutExpectations>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_expectations: Vec<FieldExpectation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
}

impl TemplateCandidate {
    pub fn new(
        template_id: impl Into<String>,
        version_id: impl Into<String>,
        template_slug: impl Into<String>,
        selection_config: SelectionConfig,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            version_id: version_id.into(),
            template_slug: template_slug.into(),
            selection_config,
            roi_config: None,
            layout_expectations: None,
            field_expectations: Vec::new(),
            client: None,
            asset_type: None,
            work_type: None,
        }
    }

    pub fn with_roi(mut self, roi: RoiConfig) -> Self {
        self.roi_config = Some(roi);
        self
    }

    pub fn with_layout(mut self, layout: LayoutExpectations) -> Self {
        self.layout_expectations = Some(layout);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldExpectation>) -> Self {
        self.field_expectations = fields;
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = Some(asset_type.into());
        self
    }

    pub fn with_work_type(mut self, work_type: impl Into<String>) -> Self {
        self.work_type = Some(work_type.into());
        self
    }

    /// Returns `true` if `id` names this template or this exact version.
    pub fn answers_to(&self, id: &str) -> bool {
        self.template_id == id || self.version_id == id
    }

    /// Structural checks run when a registry snapshot is built.
    pub fn validate(&self) -> TemplateResult<()> {
        let identifiers = [
            ("templateId", &self.template_id),
            ("versionId", &self.version_id),
            ("templateSlug", &self.template_slug),
        ];
        for (field, value) in identifiers {
            if value.trim().is_empty() {
                return Err(TemplateError::EmptyIdentifier { field });
            }
        }

        if let Some(roi) = &self.roi_config {
            roi.validate()?;
        }

        Ok(())
    }
}
