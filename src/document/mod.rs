//! Per-invocation document context supplied by the caller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Handwritten,
    Printed,
    Hybrid,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Handwritten => "handwritten",
            FormType::Printed => "printed",
            FormType::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimension {
    pub width: f64,
    pub height: f64,
}

/// What the OCR stage learned about the document's physical shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub page_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_dimensions: Option<Vec<PageDimension>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_sections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<FormType>,
}

impl DocumentMetadata {
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count,
            ..Default::default()
        }
    }

    pub fn with_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detected_sections = Some(sections.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_form_type(mut self, form_type: FormType) -> Self {
        self.form_type = Some(form_type);
        self
    }
}

/// Job attributes used to boost templates owned by the same client or work stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
}

/// Everything the caller knows about one document at selection time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContext {
    #[serde(default)]
    pub document_text: String,
    /// OCR text per page, in page order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_texts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_metadata: Option<MatchingMetadata>,
}

impl DocumentContext {
    pub fn new(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            ..Default::default()
        }
    }

    pub fn with_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_texts = Some(pages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_explicit_template(mut self, id: impl Into<String>) -> Self {
        self.explicit_template_id = Some(id.into());
        self
    }

    pub fn with_matching(mut self, matching: MatchingMetadata) -> Self {
        self.matching_metadata = Some(matching);
        self
    }

    /// Page texts, falling back to the whole document as a single page.
    pub fn pages(&self) -> Vec<&str> {
        match &self.page_texts {
            Some(pages) => pages.iter().map(String::as_str).collect(),
            None => vec![self.document_text.as_str()],
        }
    }

    /// Explicit override, ignoring blank strings.
    pub fn explicit_id(&self) -> Option<&str> {
        self.explicit_template_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
