use std::fmt;

use crate::MutationKind;

/// Outcome of the last operation, shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Applied(MutationKind),
    MutationFailed {
        mutation: MutationKind,
        reason: String,
    },
    BatchCompleted {
        items_applied: usize,
    },
    BatchPartiallyApplied {
        items_applied: usize,
        items_not_applied: usize,
        failed_chunk: usize,
        reason: String,
    },
    BatchCancelled {
        items_applied: usize,
        items_not_applied: usize,
    },
    ResolutionFailed {
        reason: String,
    },
    Busy,
    NothingSelected,
    NoCollection,
    PageLoadFailed {
        reason: String,
    },
    CollectionsLoadFailed {
        reason: String,
    },
    CompaniesLoadFailed {
        reason: String,
    },
}

impl Notice {
    /// True when the operator should look at this: something did not apply.
    pub fn is_failure(&self) -> bool {
        match self {
            Notice::Applied(_) | Notice::BatchCompleted { .. } => false,
            Notice::BatchCancelled {
                items_not_applied, ..
            } => *items_not_applied > 0,
            _ => true,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::LikeOne(id) => write!(f, "like company {id}"),
            MutationKind::LikeMany { count } => write!(f, "like {count} selected companies"),
            MutationKind::ResetAllLiked => write!(f, "reset liked companies"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Applied(mutation) => write!(f, "done: {mutation}"),
            Notice::MutationFailed { mutation, reason } => {
                write!(f, "failed to {mutation}, nothing applied: {reason}")
            }
            Notice::BatchCompleted { items_applied } => {
                write!(f, "liked {items_applied} companies")
            }
            Notice::BatchPartiallyApplied {
                items_applied,
                items_not_applied,
                failed_chunk,
                reason,
            } => write!(
                f,
                "partially applied: {items_applied} liked, {items_not_applied} not applied \
                 (chunk {} failed: {reason})",
                failed_chunk + 1
            ),
            Notice::BatchCancelled {
                items_applied,
                items_not_applied,
            } => write!(
                f,
                "cancelled: {items_applied} liked, {items_not_applied} not applied"
            ),
            Notice::ResolutionFailed { reason } => {
                write!(f, "could not load collection ids, nothing applied: {reason}")
            }
            Notice::Busy => write!(f, "another like operation is still running"),
            Notice::NothingSelected => write!(f, "no companies selected"),
            Notice::NoCollection => write!(f, "no collection open"),
            Notice::PageLoadFailed { reason } => write!(f, "failed to load page: {reason}"),
            Notice::CollectionsLoadFailed { reason } => {
                write!(f, "failed to load collections: {reason}")
            }
            Notice::CompaniesLoadFailed { reason } => {
                write!(f, "failed to load companies: {reason}")
            }
        }
    }
}
