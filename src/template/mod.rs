//! Template version configurations and the read-only registry seam.
//!
//! Template CRUD and persistence live outside this crate. Callers hand the engine a
//! [`TemplateRegistry`] snapshot per selection; [`InMemoryRegistry`] is the owned,
//! validated implementation used by the CLI and tests.

pub mod error;
pub mod registry;
pub mod types;


pub use error::{TemplateError, TemplateResult};
pub use registry::{InMemoryRegistry, TemplateRegistry};
pub use types::{
    Bounds, FieldExpectation, FieldType, LayoutExpectations, RoiConfig, RoiRegion,
    SelectionConfig, TemplateCandidate,
};
