use tokio::sync::{oneshot, watch};

use crate::domain::{ImagePayload, ListSnapshot, Product, ProductDraft, ProductId, ProductPage};
use crate::error::{GatewayError, ListError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the gateway service. Each variant maps to one REST call.
#[derive(Debug)]
pub enum GatewayRequest {
    List {
        page: u32,
        size: u32,
        respond_to: ServiceResponse<ProductPage, GatewayError>,
    },
    Search {
        query: String,
        respond_to: ServiceResponse<Vec<Product>, GatewayError>,
    },
    GetById {
        id: ProductId,
        respond_to: ServiceResponse<Product, GatewayError>,
    },
    Create {
        draft: ProductDraft,
        image: ImagePayload,
        respond_to: ServiceResponse<Product, GatewayError>,
    },
    Update {
        id: ProductId,
        draft: ProductDraft,
        image: Option<ImagePayload>,
        respond_to: ServiceResponse<Product, GatewayError>,
    },
    Delete {
        id: ProductId,
        respond_to: ServiceResponse<(), GatewayError>,
    },
}

/// Requests handled by the product list service.
#[derive(Debug)]
pub enum ListRequest {
    LoadPage {
        page: u32,
        size: u32,
        respond_to: ServiceResponse<ListSnapshot, ListError>,
    },
    PageChanged {
        page: u32,
        size: u32,
        respond_to: ServiceResponse<ListSnapshot, ListError>,
    },
    SearchInput {
        query: String,
        respond_to: ServiceResponse<ListSnapshot, ListError>,
    },
    DeleteRequested {
        id: ProductId,
        respond_to: ServiceResponse<ListSnapshot, ListError>,
    },
    EditCompleted {
        saved: bool,
        respond_to: ServiceResponse<ListSnapshot, ListError>,
    },
    Snapshot {
        respond_to: ServiceResponse<ListSnapshot, ListError>,
    },
    Subscribe {
        respond_to: ServiceResponse<watch::Receiver<ListSnapshot>, ListError>,
    },
}
