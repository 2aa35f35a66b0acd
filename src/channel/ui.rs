//! Hand-off to the host's contact screens.
//!
//! The plugin never shows UI itself. A host installs a `ContactsUi`, and every
//! UI request gets its own `UiCompletion`, so a picker opened while an older
//! one is still up cannot steal the older request's answer.

use tokio::sync::oneshot;

/// Reply code: the user backed out of the screen.
pub const FORM_OPERATION_CANCELED: i64 = 1;
/// Reply code: the screen could not be shown.
pub const FORM_COULD_NOT_BE_OPEN: i64 = 2;

/// How a contact screen ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiOutcome {
    /// Finished; carries the identifier of the saved or picked contact when
    /// the screen reports one.
    Completed(Option<String>),
    Canceled,
    CouldNotOpen,
}

/// Single-shot handle the UI completes when its screen closes.
#[derive(Debug)]
pub struct UiCompletion {
    tx: oneshot::Sender<UiOutcome>,
}

impl UiCompletion {
    pub(crate) fn new() -> (Self, oneshot::Receiver<UiOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn complete(self, outcome: UiOutcome) {
        // The request may already have been abandoned.
        let _ = self.tx.send(outcome);
    }
}

/// Host-supplied contact screens.
pub trait ContactsUi: Send + Sync {
    fn open_contact_form(&self, done: UiCompletion);
    fn open_existing_contact(&self, identifier: &str, done: UiCompletion);
    fn pick_contact(&self, done: UiCompletion);
}
