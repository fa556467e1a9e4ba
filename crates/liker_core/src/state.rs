use crate::batch::{BatchJob, BatchPhase};
use crate::view_model::{AppViewModel, CompanyRowView, ProgressView};
use crate::{
    CollectionId, CollectionMeta, Company, CompanyId, ControllerSettings, Effect, JobId,
    MutationKind, Notice, PageRequest, PageWindow, Selection,
};

/// Paginated view controller state. Owns the page window and the selection;
/// the engine never touches either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: ControllerSettings,
    collections: Vec<CollectionMeta>,
    collection_id: Option<CollectionId>,
    offset: usize,
    page_size: usize,
    window: Option<PageWindow>,
    in_flight_page: Option<PageRequest>,
    refetch_deferred: bool,
    selection: Selection,
    batch: BatchPhase,
    next_job_id: JobId,
    pending_mutation: Option<MutationKind>,
    companies: Vec<Company>,
    notice: Option<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(ControllerSettings::default())
    }

    pub fn with_settings(mut settings: ControllerSettings) -> Self {
        settings.batch_size = settings.batch_size.max(1);
        settings.page_size = settings.page_size.max(1);
        Self {
            collections: Vec::new(),
            collection_id: None,
            offset: 0,
            page_size: settings.page_size,
            window: None,
            in_flight_page: None,
            refetch_deferred: false,
            selection: Selection::new(),
            batch: BatchPhase::Idle,
            next_job_id: 1,
            pending_mutation: None,
            companies: Vec::new(),
            notice: None,
            dirty: false,
            settings,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .window
            .as_ref()
            .map(|window| {
                window
                    .companies
                    .iter()
                    .map(|company| CompanyRowView {
                        id: company.id,
                        name: company.name.clone(),
                        liked: company.liked,
                        selected: self.selection.contains(company.id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let progress = match &self.batch {
            BatchPhase::Running(job) => Some(ProgressView::from_job(job)),
            BatchPhase::Resolving { .. } => Some(ProgressView::resolving()),
            BatchPhase::Idle => None,
        };

        let busy = self.is_busy();
        AppViewModel {
            collections: self.collections.clone(),
            collection_id: self.collection_id.clone(),
            collection_name: self.window.as_ref().map(|w| w.collection_name.clone()),
            offset: self.offset,
            page: self.offset / self.page_size,
            page_size: self.page_size,
            total: self.window.as_ref().map(|w| w.total),
            rows,
            selected_ids: self.selection.ids().to_vec(),
            like_selected_enabled: !busy && !self.selection.is_empty(),
            like_all_enabled: !self.batch.is_active(),
            like_all_label: if self.batch.is_active() {
                "Processing...".to_string()
            } else {
                "Add All to Liked Companies".to_string()
            },
            loading: self.in_flight_page.is_some() || self.batch.is_active(),
            progress,
            companies: self.companies.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn collection_id(&self) -> Option<&str> {
        self.collection_id.as_deref()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn window(&self) -> Option<&PageWindow> {
        self.window.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn batch(&self) -> &BatchPhase {
        &self.batch
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Any mutation in flight, batched or not.
    pub fn is_busy(&self) -> bool {
        self.batch.is_active() || self.pending_mutation.is_some()
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn current_request(&self) -> Option<PageRequest> {
        self.collection_id.as_ref().map(|id| PageRequest {
            collection_id: id.clone(),
            offset: self.offset,
            limit: self.page_size,
        })
    }

    pub(crate) fn set_collections(&mut self, collections: Vec<CollectionMeta>) {
        self.collections = collections;
        self.mark_dirty();
    }

    /// Picks the configured collection if it exists, otherwise the first one.
    pub(crate) fn default_collection(&self) -> Option<CollectionId> {
        let preferred = self.settings.initial_collection.as_ref().filter(|wanted| {
            self.collections
                .iter()
                .any(|collection| &collection.id == *wanted)
        });
        preferred
            .cloned()
            .or_else(|| self.collections.first().map(|c| c.id.clone()))
    }

    pub(crate) fn select_collection(&mut self, collection_id: CollectionId) {
        if self.collection_id.as_ref() != Some(&collection_id) {
            self.window = None;
        }
        self.collection_id = Some(collection_id);
        self.offset = 0;
        self.mark_dirty();
    }

    pub(crate) fn set_page(&mut self, page: usize, page_size: usize) {
        self.page_size = page_size;
        self.offset = page.saturating_mul(page_size);
        self.mark_dirty();
    }

    /// Fetch for the current triple, unless a batch run owns the screen; then
    /// the fetch waits for the run to finish.
    pub(crate) fn request_page(&mut self) -> Option<Effect> {
        let request = self.current_request()?;
        if self.batch.is_active() {
            self.refetch_deferred = true;
            return None;
        }
        self.refetch_deferred = false;
        self.in_flight_page = Some(request.clone());
        self.mark_dirty();
        Some(Effect::FetchPage(request))
    }

    /// Stores the page if it answers the current triple. Stale answers are dropped.
    /// An answer landing while a batch runs is dropped too and fetched again
    /// once the run ends.
    pub(crate) fn apply_page_loaded(
        &mut self,
        request: &PageRequest,
        result: Result<PageWindow, String>,
    ) -> bool {
        if self.in_flight_page.as_ref() == Some(request) {
            self.in_flight_page = None;
            self.mark_dirty();
        }
        if self.current_request().as_ref() != Some(request) {
            return false;
        }
        if self.batch.is_active() {
            self.refetch_deferred = true;
            return false;
        }
        match result {
            Ok(window) => self.window = Some(window),
            Err(reason) => self.set_notice(Notice::PageLoadFailed { reason }),
        }
        self.mark_dirty();
        true
    }

    pub(crate) fn replace_selection(&mut self, ids: Vec<CompanyId>) {
        self.selection.replace(ids);
        self.mark_dirty();
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
        self.mark_dirty();
    }

    pub(crate) fn begin_mutation(&mut self, mutation: MutationKind) {
        self.pending_mutation = Some(mutation);
        self.mark_dirty();
    }

    pub(crate) fn finish_mutation(&mut self) {
        self.pending_mutation = None;
        self.mark_dirty();
    }

    pub(crate) fn allocate_job_id(&mut self) -> JobId {
        let job_id = self.next_job_id;
        self.next_job_id += 1;
        job_id
    }

    pub(crate) fn set_batch(&mut self, phase: BatchPhase) {
        self.batch = phase;
        self.mark_dirty();
    }

    pub(crate) fn running_job_mut(&mut self, job_id: JobId) -> Option<&mut BatchJob> {
        match &mut self.batch {
            BatchPhase::Running(job) if job.job_id == job_id => {
                self.dirty = true;
                Some(job)
            }
            _ => None,
        }
    }

    /// Whether a page fetch was held back while the batch ran.
    pub(crate) fn take_refetch_deferred(&mut self) -> bool {
        std::mem::take(&mut self.refetch_deferred)
    }

    pub(crate) fn set_companies(&mut self, companies: Vec<Company>) {
        self.companies = companies;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }
}
