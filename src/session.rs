//! Session identity plumbing.
//!
//! Authentication itself is an external collaborator; the collection only
//! needs to know who the current user is and when that changes. Hosts push
//! identity changes through a watch channel (or call
//! [`crate::collection::ImageCollection::set_user`] directly).

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The authenticated user as seen by this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
}

impl CurrentUser {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            email: None,
        }
    }
}

/// Channel pair for publishing sign-in/sign-out events.
///
/// The receiver half is handed to
/// [`crate::collection::ImageCollection::attach_session`]; the sender half
/// stays with whatever owns the auth lifecycle.
pub fn session_channel() -> (
    watch::Sender<Option<CurrentUser>>,
    watch::Receiver<Option<CurrentUser>>,
) {
    watch::channel(None)
}
