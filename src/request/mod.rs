//! JSON selection requests, as read by the CLI and batch callers.
//!
//! ```json
//! {
//!   "document": { "documentText": "JOB SHEET ...", "explicitTemplateId": null },
//!   "templates": [ { "templateId": "...", "versionId": "...", "templateSlug": "...",
//!                    "selectionConfig": { "requiredTokensAll": ["job"] } } ],
//!   "inactiveTemplates": []
//! }
//! ```

pub mod error;

pub use error::{RequestError, RequestResult};

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::DocumentContext;
use crate::template::{InMemoryRegistry, TemplateCandidate};

/// One document plus the registry snapshot to select against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub document: DocumentContext,
    #[serde(default)]
    pub templates: Vec<TemplateCandidate>,
    /// Retired versions, consulted only to explain a stale explicit override.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inactive_templates: Vec<TemplateCandidate>,
}

impl SelectionRequest {
    /// Registry snapshot of the request's templates. Malformed versions are
    /// skipped (see [`InMemoryRegistry::from_snapshot`]).
    pub fn registry(&self) -> InMemoryRegistry {
        InMemoryRegistry::from_snapshot(self.templates.clone(), self.inactive_templates.clone())
    }
}

pub fn parse_request(json: &str) -> RequestResult<SelectionRequest> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_request(path: &Path) -> RequestResult<SelectionRequest> {
    let json = std::fs::read_to_string(path).map_err(|source| RequestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_request(&json)
}

/// Reads a single request from `reader` (stdin in the CLI).
pub fn read_request<R: Read>(mut reader: R) -> RequestResult<SelectionRequest> {
    let mut json = String::new();
    reader
        .read_to_string(&mut json)
        .map_err(RequestError::Stdin)?;
    parse_request(&json)
}
