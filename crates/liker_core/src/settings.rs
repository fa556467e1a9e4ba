use crate::{CollectionId, DEFAULT_BATCH_SIZE};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// When the checkbox selection is dropped after a bulk action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearSelection {
    /// Only after every id was applied. A partial run keeps the selection for a retry.
    #[default]
    OnSuccess,
    /// After success and after a batch run that stopped half-way.
    OnSuccessOrPartial,
    Never,
}

impl ClearSelection {
    pub(crate) fn on_success(self) -> bool {
        !matches!(self, ClearSelection::Never)
    }

    pub(crate) fn on_partial(self) -> bool {
        matches!(self, ClearSelection::OnSuccessOrPartial)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub batch_size: usize,
    pub page_size: usize,
    pub initial_collection: Option<CollectionId>,
    pub clear_selection: ClearSelection,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            initial_collection: None,
            clear_selection: ClearSelection::default(),
        }
    }
}
