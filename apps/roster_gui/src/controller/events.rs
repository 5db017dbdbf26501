//! Events posted by the fetch worker back to the UI thread.

use directory_client::FetchError;
use shared::domain::{UserId, UserRecord};

use crate::ui::avatar::AvatarImage;

/// Whether a batch replaces the list on first mount or on a refresh. The
/// refresh indicator only clears for refresh-originated batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrigin {
    Initial,
    Refresh,
}

pub enum UiEvent {
    BatchLoaded {
        origin: BatchOrigin,
        users: Vec<UserRecord>,
    },
    BatchFailed {
        origin: BatchOrigin,
        failure: FetchFailure,
    },
    UserAdded(Box<UserRecord>),
    AddFailed(FetchFailure),
    AvatarImageLoaded {
        user_id: UserId,
        image: AvatarImage,
    },
    AvatarImageFailed {
        user_id: UserId,
        reason: String,
    },
    WorkerFailed(String),
}

/// A fetch failure flattened for display. Rate limiting gets its own alert
/// wording; every other failure shares the generic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub rate_limited: bool,
    pub detail: String,
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        Self {
            rate_limited: err.is_rate_limited(),
            detail: err.to_string(),
        }
    }
}
