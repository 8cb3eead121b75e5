use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::error::{TemplateError, TemplateResult};
use super::types::TemplateCandidate;

/// Read-only view of the template versions a selection may consider.
///
/// Implementations hand out owned snapshots; the engine never holds on to a
/// registry between calls and never writes through it.
pub trait TemplateRegistry {
    /// All template versions currently active for selection.
    fn list_active_templates(&self) -> Vec<TemplateCandidate>;

    /// Looks up a single version by version id or template id, active or not.
    fn find_version(&self, id: &str) -> Option<TemplateCandidate>;
}

impl TemplateRegistry for [TemplateCandidate] {
    fn list_active_templates(&self) -> Vec<TemplateCandidate> {
        self.to_vec()
    }

    fn find_version(&self, id: &str) -> Option<TemplateCandidate> {
        find_in(self.iter(), id).cloned()
    }
}

impl TemplateRegistry for Vec<TemplateCandidate> {
    fn list_active_templates(&self) -> Vec<TemplateCandidate> {
        self.as_slice().list_active_templates()
    }

    fn find_version(&self, id: &str) -> Option<TemplateCandidate> {
        self.as_slice().find_version(id)
    }
}

/// Version-id matches win over template-id matches.
fn find_in<'a, I>(candidates: I, id: &str) -> Option<&'a TemplateCandidate>
where
    I: Iterator<Item = &'a TemplateCandidate> + Clone,
{
    candidates
        .clone()
        .find(|c| c.version_id == id)
        .or_else(|| candidates.into_iter().find(|c| c.template_id == id))
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    candidate: TemplateCandidate,
    active: bool,
}

/// Owned, validated snapshot of template versions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entries: Vec<RegistryEntry>,
}

impl InMemoryRegistry {
    /// Builds a snapshot where every supplied version is active.
    pub fn new(active: Vec<TemplateCandidate>) -> TemplateResult<Self> {
        let mut registry = Self::default();
        for candidate in active {
            registry.insert(candidate, true)?;
        }
        Ok(registry)
    }

    /// Adds a version that can be looked up but is never ranked.
    pub fn with_inactive(mut self, candidate: TemplateCandidate) -> TemplateResult<Self> {
        self.insert(candidate, false)?;
        Ok(self)
    }

    /// Builds a snapshot from untrusted input, skipping versions that fail
    /// validation or repeat an earlier version id.
    ///
    /// Skipped versions are logged at `warn` and never ranked; the remaining
    /// versions are scored as usual.
    pub fn from_snapshot(active: Vec<TemplateCandidate>, inactive: Vec<TemplateCandidate>) -> Self {
        let mut registry = Self::default();
        let entries = active
            .into_iter()
            .map(|c| (c, true))
            .chain(inactive.into_iter().map(|c| (c, false)));
        for (candidate, is_active) in entries {
            let template_slug = candidate.template_slug.clone();
            let version_id = candidate.version_id.clone();
            if let Err(error) = registry.insert(candidate, is_active) {
                warn!(
                    %template_slug,
                    %version_id,
                    active = is_active,
                    %error,
                    "Skipping invalid template version"
                );
            }
        }
        registry
    }

    fn insert(&mut self, candidate: TemplateCandidate, active: bool) -> TemplateResult<()> {
        candidate.validate()?;

        if self
            .entries
            .iter()
            .any(|e| e.candidate.version_id == candidate.version_id)
        {
            return Err(TemplateError::DuplicateVersion {
                version_id: candidate.version_id,
            });
        }

        debug!(
            template_slug = %candidate.template_slug,
            version_id = %candidate.version_id,
            active,
            "Registered template version"
        );

        self.entries.push(RegistryEntry { candidate, active });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    /// Distinct slugs of active versions, sorted.
    pub fn active_slugs(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.candidate.template_slug.clone())
            .collect()
    }
}

impl TemplateRegistry for InMemoryRegistry {
    fn list_active_templates(&self) -> Vec<TemplateCandidate> {
        self.entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.candidate.clone())
            .collect()
    }

    fn find_version(&self, id: &str) -> Option<TemplateCandidate> {
        find_in(self.entries.iter().map(|e| &e.candidate), id).cloned()
    }
}
