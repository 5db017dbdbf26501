//! Backend commands queued from the UI to the fetch worker.

use shared::domain::UserId;

pub enum BackendCommand {
    /// First fetch after the screen mounts; replaces the list wholesale.
    LoadInitial,
    /// User-initiated refresh; replaces the list wholesale.
    Refresh,
    /// Fetch one extra profile and prepend it.
    AddOne,
    /// Download and decode a remote avatar image.
    FetchAvatarImage { user_id: UserId, url: String },
}
