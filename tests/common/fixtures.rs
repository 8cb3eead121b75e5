//! Test fixtures for integration tests.

use chrono::{DateTime, Utc};
use selector::{
    DocumentContext, DocumentMetadata, FieldExpectation, FieldType, FormType, LayoutExpectations,
    MatchingMetadata, RoiConfig, RoiRegion, SelectionConfig, TemplateCandidate,
};

pub const FIXED_TIMESTAMP: i64 = 1_718_000_000;

pub const FIXED_TRACE_ID: &str = "00000000-0000-4000-8000-000000000001";

pub const JOB_SHEET_TEXT: &str = "JOB SHEET\n\
    Job Reference: JOB-123456\n\
    Visit date: 14/06/2024\n\
    Work carried out: boiler repair, replaced pump seal\n\
    Customer Signature: ___";

pub const JOB_APPLICATION_TEXT: &str = "JOB APPLICATION FORM\n\
    Applicant Name: Jane Doe\n\
    Position Applied For: Sheet Metal Worker\n\
    Signature: ___";

pub const AMBIGUOUS_TEXT: &str = "Document with repair and service details";

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(FIXED_TIMESTAMP, 0).unwrap_or_default()
}

#[derive(Default)]
pub struct TemplateBuilder {
    slug: String,
    version: Option<String>,
    all: Vec<String>,
    any: Vec<String>,
    optional: Vec<String>,
    layout: Option<LayoutExpectations>,
    roi: Option<RoiConfig>,
    fields: Vec<FieldExpectation>,
    client: Option<String>,
}

impl TemplateBuilder {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn all(mut self, tokens: &[&str]) -> Self {
        self.all = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn any(mut self, tokens: &[&str]) -> Self {
        self.any = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn optional(mut self, tokens: &[&str]) -> Self {
        self.optional = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn layout(mut self, layout: LayoutExpectations) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn roi(mut self, roi: RoiConfig) -> Self {
        self.roi = Some(roi);
        self
    }

    pub fn fields(mut self, fields: Vec<FieldExpectation>) -> Self {
        self.fields = fields;
        self
    }

    pub fn client(mut self, client: &str) -> Self {
        self.client = Some(client.to_string());
        self
    }

    pub fn build(self) -> TemplateCandidate {
        let config = SelectionConfig::new()
            .require_all(self.all)
            .require_any(self.any)
            .optional(self.optional);
        let version = self.version.unwrap_or_else(|| format!("ver-{}-1", self.slug));

        let mut template =
            TemplateCandidate::new(format!("tpl-{}", self.slug), version, self.slug, config)
                .with_fields(self.fields);
        if let Some(layout) = self.layout {
            template = template.with_layout(layout);
        }
        if let Some(roi) = self.roi {
            template = template.with_roi(roi);
        }
        if let Some(client) = self.client {
            template = template.with_client(client);
        }
        template
    }
}

pub fn job_sheet_template() -> TemplateCandidate {
    TemplateBuilder::new("job-sheet")
        .all(&["job", "sheet"])
        .any(&["repair", "maintenance"])
        .build()
}

/// Job sheet with layout, ROI and field expectations for multi-signal scoring.
pub fn rich_job_sheet_template() -> TemplateCandidate {
    TemplateBuilder::new("job-sheet")
        .all(&["job", "sheet"])
        .any(&["repair", "maintenance"])
        .layout(LayoutExpectations {
            min_pages: Some(1),
            max_pages: Some(2),
            expected_sections: Some(vec!["Work Details".into()]),
            form_type: Some(FormType::Printed),
        })
        .roi(RoiConfig::new(vec![
            RoiRegion::new("signature", 1).with_fields(["customerSignature"]),
        ]))
        .fields(vec![
            FieldExpectation::new("visitDate", FieldType::Date),
            FieldExpectation::with_pattern("jobReference", r"JOB-\d{6}"),
        ])
        .build()
}

pub fn invoice_template() -> TemplateCandidate {
    TemplateBuilder::new("invoice")
        .all(&["invoice", "total"])
        .any(&["vat", "tax"])
        .build()
}

pub fn job_sheet_metadata() -> DocumentMetadata {
    DocumentMetadata::new(1)
        .with_sections(["Work Details"])
        .with_form_type(FormType::Printed)
}

pub fn acme_matching() -> MatchingMetadata {
    MatchingMetadata {
        client: Some("Acme".into()),
        ..Default::default()
    }
}

pub fn context(text: &str) -> DocumentContext {
    DocumentContext::new(text)
}
