use crate::batch::BatchJob;
use crate::{CollectionId, CollectionMeta, Company, CompanyId, Notice};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub collections: Vec<CollectionMeta>,
    pub collection_id: Option<CollectionId>,
    pub collection_name: Option<String>,
    pub offset: usize,
    pub page: usize,
    pub page_size: usize,
    pub total: Option<usize>,
    pub rows: Vec<CompanyRowView>,
    pub selected_ids: Vec<CompanyId>,
    /// "Add selected" needs a selection and no mutation in flight.
    pub like_selected_enabled: bool,
    /// "Add all" is disabled while a batch run is active.
    pub like_all_enabled: bool,
    pub like_all_label: String,
    pub loading: bool,
    pub progress: Option<ProgressView>,
    pub companies: Vec<Company>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRowView {
    pub id: CompanyId,
    pub name: String,
    pub liked: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub items_processed: usize,
    pub total_items: usize,
    pub chunks_sent: usize,
    pub chunk_total: usize,
    /// Rounded percentage, 0..=100.
    pub percent: u8,
    pub label: String,
}

impl ProgressView {
    pub(crate) fn from_job(job: &BatchJob) -> Self {
        let percent = job.percent().round() as u8;
        Self {
            items_processed: job.items_processed,
            total_items: job.total_items,
            chunks_sent: job.chunks_sent(),
            chunk_total: job.chunk_total(),
            percent,
            label: format!("{percent}% complete"),
        }
    }

    pub(crate) fn resolving() -> Self {
        Self {
            items_processed: 0,
            total_items: 0,
            chunks_sent: 0,
            chunk_total: 0,
            percent: 0,
            label: "collecting company ids".to_string(),
        }
    }
}
