use tokio::sync::{mpsc, watch};

use super::macros::client_method;
use crate::domain::{ListSnapshot, ProductId};
use crate::error::ListError;
use crate::form::DialogOutcome;
use crate::messages::ListRequest;

/// Handle to the product list service. Each method resolves once the
/// resulting state is in place and yields the snapshot the host should render.
#[derive(Debug, Clone)]
pub struct ListClient {
    sender: mpsc::Sender<ListRequest>,
}

impl ListClient {
    pub fn new(sender: mpsc::Sender<ListRequest>) -> Self {
        Self { sender }
    }

    /// Feeds a closed product dialog back into the list.
    pub async fn on_dialog_closed(&self, outcome: &DialogOutcome) -> Result<ListSnapshot, ListError> {
        self.on_edit_completed(outcome.is_saved()).await
    }
}

client_method!(ListClient => pub fn load_page(page: u32, size: u32) -> ListSnapshot as ListRequest::LoadPage, Error = ListError);
client_method!(ListClient => pub fn on_page_changed(page: u32, size: u32) -> ListSnapshot as ListRequest::PageChanged, Error = ListError);
client_method!(ListClient => pub fn on_search_input(query: String) -> ListSnapshot as ListRequest::SearchInput, Error = ListError);
client_method!(ListClient => pub fn on_delete_requested(id: ProductId) -> ListSnapshot as ListRequest::DeleteRequested, Error = ListError);
client_method!(ListClient => pub fn on_edit_completed(saved: bool) -> ListSnapshot as ListRequest::EditCompleted, Error = ListError);
client_method!(ListClient => pub fn snapshot() -> ListSnapshot as ListRequest::Snapshot, Error = ListError);
client_method!(ListClient => pub fn subscribe() -> watch::Receiver<ListSnapshot> as ListRequest::Subscribe, Error = ListError);
