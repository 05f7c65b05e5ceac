//! Session error type.

use crate::page::PageError;
use crate::reconcile::ReconcileError;
use crate::session::Stage;

/// Anything that ends a portal session.
///
/// Per-row conditions the session recovers from (a missing download link, a
/// name the policy rejects) never surface as a `SessionError`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Page(#[from] PageError),

    /// Only reachable with a hard poll deadline configured.
    #[error("element {field} did not appear ({xpath})")]
    ElementMissing { field: String, xpath: String },

    /// The listened-state icon carried a style we do not know how to read.
    #[error("call #{position}: unexpected listened-state marker {value:?}")]
    ListenedMarker { position: usize, value: String },

    #[error("could not read call count from {0:?}")]
    CallCount(String),

    #[error("call #{position}: could not read call date/time from {text:?}")]
    CallDateTime { position: usize, text: String },

    #[error("session cannot go from {from:?} back to {to:?}")]
    StageOrder { from: Stage, to: Stage },

    #[error("watching download directory: {0}")]
    Watch(#[source] std::io::Error),

    #[error("reading credentials: {0}")]
    Credentials(#[source] std::io::Error),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}
