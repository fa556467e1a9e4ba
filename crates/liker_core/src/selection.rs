use std::collections::HashSet;

use crate::{CollectionId, CompanyId};

/// Checkbox selection. Keeps the order in which ids were first chosen so the
/// resolved sequence is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: Vec<CompanyId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection with the full set emitted by the grid.
    /// Order of first appearance wins; repeats are dropped.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = CompanyId>) {
        let mut seen = HashSet::new();
        self.ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: CompanyId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[CompanyId] {
        &self.ids
    }
}

/// What a bulk action should operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A concrete, ordered id sequence.
    Ids(Vec<CompanyId>),
    /// Every id in the collection; must be fetched before anything is mutated.
    AllInCollection(CollectionId),
}

/// Explicit ids beat the checkbox selection, which beats "everything in the
/// collection". An explicitly passed empty list is still explicit.
pub fn resolve_selection(
    explicit_ids: Option<&[CompanyId]>,
    selection: &Selection,
    collection_id: &str,
) -> Resolution {
    if let Some(ids) = explicit_ids {
        return Resolution::Ids(ids.to_vec());
    }
    if !selection.is_empty() {
        return Resolution::Ids(selection.ids().to_vec());
    }
    Resolution::AllInCollection(collection_id.to_owned())
}
