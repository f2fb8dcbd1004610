use tokio::sync::mpsc;

use super::macros::client_method;
use crate::domain::{ImagePayload, Product, ProductDraft, ProductId, ProductPage};
use crate::error::GatewayError;
use crate::messages::GatewayRequest;
use crate::notifier::Notifier;

/// Client for the gateway service.
///
/// Every call reports its outcome to the [`Notifier`] exactly once before the
/// result is handed back: failures always, successes for mutations only.
#[derive(Debug, Clone)]
pub struct ProductGateway {
    sender: mpsc::Sender<GatewayRequest>,
    notifier: Notifier,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    List,
    Search,
    GetById,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::List => "Failed to load products",
            Operation::Search => "Failed to search products",
            Operation::GetById => "Failed to load product",
            Operation::Create => "Failed to create product",
            Operation::Update => "Failed to update product",
            Operation::Delete => "Failed to delete product",
        }
    }

    fn success_message(self) -> Option<&'static str> {
        match self {
            Operation::List | Operation::Search | Operation::GetById => None,
            Operation::Create => Some("Product created successfully"),
            Operation::Update => Some("Product updated successfully"),
            Operation::Delete => Some("Product deleted successfully"),
        }
    }
}

impl ProductGateway {
    pub fn new(sender: mpsc::Sender<GatewayRequest>, notifier: Notifier) -> Self {
        Self { sender, notifier }
    }

    pub async fn list(&self, page: u32, size: u32) -> Result<ProductPage, GatewayError> {
        let result = self.send_list(page, size).await;
        self.report(Operation::List, result)
    }

    /// Blank queries are not special-cased here; callers wanting "all
    /// products" should use [`list`](Self::list).
    pub async fn search(&self, query: String) -> Result<Vec<Product>, GatewayError> {
        let result = self.send_search(query).await;
        self.report(Operation::Search, result)
    }

    pub async fn get_by_id(&self, id: ProductId) -> Result<Product, GatewayError> {
        let result = self.send_get_by_id(id).await;
        self.report(Operation::GetById, result)
    }

    pub async fn create(
        &self,
        draft: ProductDraft,
        image: ImagePayload,
    ) -> Result<Product, GatewayError> {
        let result = self.send_create(draft, image).await;
        self.report(Operation::Create, result)
    }

    pub async fn update(
        &self,
        id: ProductId,
        draft: ProductDraft,
        image: Option<ImagePayload>,
    ) -> Result<Product, GatewayError> {
        let result = self.send_update(id, draft, image).await;
        self.report(Operation::Update, result)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), GatewayError> {
        let result = self.send_delete(id).await;
        self.report(Operation::Delete, result)
    }

    fn report<T>(
        &self,
        operation: Operation,
        result: Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        match &result {
            Ok(_) => {
                if let Some(message) = operation.success_message() {
                    self.notifier.success(message);
                }
            }
            Err(e) => self
                .notifier
                .error(format!("{}: {}", operation.failure_message(), e)),
        }
        result
    }
}

client_method!(ProductGateway => fn send_list(page: u32, size: u32) -> ProductPage as GatewayRequest::List, Error = GatewayError);
client_method!(ProductGateway => fn send_search(query: String) -> Vec<Product> as GatewayRequest::Search, Error = GatewayError);
client_method!(ProductGateway => fn send_get_by_id(id: ProductId) -> Product as GatewayRequest::GetById, Error = GatewayError);
client_method!(ProductGateway => fn send_create(draft: ProductDraft, image: ImagePayload) -> Product as GatewayRequest::Create, Error = GatewayError);
client_method!(ProductGateway => fn send_update(id: ProductId, draft: ProductDraft, image: Option<ImagePayload>) -> Product as GatewayRequest::Update, Error = GatewayError);
client_method!(ProductGateway => fn send_delete(id: ProductId) -> () as GatewayRequest::Delete, Error = GatewayError);
