//! Engine façade.
//!
//! [`TemplateSelector`] wires the pipeline together: tokenize the document, score
//! every active template, apply the decision policy and record a trace. The
//! [`SelectionResult`] and the [`SelectionTrace`](crate::trace::SelectionTrace)
//! are both derived from the one [`SelectionDecision`](crate::decision::SelectionDecision)
//! returned in the [`SelectionOutcome`].

pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::TemplateSelector;
pub use types::{SelectionOutcome, SelectionResult};
