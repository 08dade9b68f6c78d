//! Session engine error types.

use thiserror::Error;

/// Errors returned by the session engine's public API.
///
/// Speech failures are deliberately absent: they never escape the controller
/// and surface as `SessionState::last_error` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A session needs at least one item.
    #[error("Cannot start a Listen-Mode session without items")]
    EmptyItemList,

    /// The controller task has shut down.
    #[error("Session controller is no longer running")]
    ControllerGone,
}
