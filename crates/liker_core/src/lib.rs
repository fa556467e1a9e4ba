//! Company liker core: pure view-controller state machine, selection
//! resolution and batch-job bookkeeping. No I/O happens here; every side
//! effect leaves as an [`Effect`] and comes back as a [`Msg`].
mod batch;
mod effect;
mod model;
mod msg;
mod notice;
mod selection;
mod settings;
mod state;
mod update;
mod view_model;

pub use batch::{chunk_count, progress_percent, BatchJob, BatchPhase, DEFAULT_BATCH_SIZE};
pub use effect::Effect;
pub use model::{
    CollectionId, CollectionMeta, Company, CompanyId, JobId, PageRequest, PageWindow,
};
pub use msg::{BatchResultKind, MutationKind, Msg};
pub use notice::Notice;
pub use selection::{resolve_selection, Resolution, Selection};
pub use settings::{ClearSelection, ControllerSettings, DEFAULT_PAGE_SIZE};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, CompanyRowView, ProgressView};
