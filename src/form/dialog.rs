use tokio::sync::oneshot;

use crate::domain::{Product, ProductSubmission};

/// What a product dialog hands back when it closes after a save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedProduct {
    /// What the form submitted.
    pub payload: ProductSubmission,
    /// What the server answered with.
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    Saved(SavedProduct),
    Cancelled,
}

impl DialogOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, DialogOutcome::Saved(_))
    }
}

/// The opener's side of a product dialog.
///
/// Resolves once the form saves or is cancelled. A form dropped without
/// either counts as cancelled.
#[derive(Debug)]
pub struct DialogHandle {
    receiver: oneshot::Receiver<DialogOutcome>,
}

/// The form's side: closes the dialog at most once.
#[derive(Debug)]
pub(crate) struct DialogCloser {
    sender: Option<oneshot::Sender<DialogOutcome>>,
}

pub(crate) fn dialog() -> (DialogCloser, DialogHandle) {
    let (sender, receiver) = oneshot::channel();
    (
        DialogCloser {
            sender: Some(sender),
        },
        DialogHandle { receiver },
    )
}

impl DialogHandle {
    pub async fn closed(self) -> DialogOutcome {
        self.receiver.await.unwrap_or(DialogOutcome::Cancelled)
    }
}

impl DialogCloser {
    pub(crate) fn is_open(&self) -> bool {
        self.sender.is_some()
    }

    pub(crate) fn close(&mut self, outcome: DialogOutcome) {
        if let Some(sender) = self.sender.take() {
            // The opener may have stopped waiting; nothing to do then.
            let _ = sender.send(outcome);
        }
    }
}
