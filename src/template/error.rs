use thiserror::Error;

/// Structural problems in a template snapshot handed to the registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("ROI region '{region}' has page 0 (pages are 1-based)")]
    InvalidRoiPage { region: String },

    #[error("ROI region '{region}' has {component}={value}, outside [0, 1]")]
    InvalidRoiBounds {
        region: String,
        component: &'static str,
        value: f64,
    },

    #[error("template field '{field}' must not be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("duplicate template version '{version_id}' in registry snapshot")]
    DuplicateVersion { version_id: String },
}

pub type TemplateResult<T> = Result<T, TemplateError>;
