//! # Mock Framework
//!
//! Utilities for testing clients and services without a catalog server.
//!
//! Use [`create_mock_gateway`] to get a gateway, the receiver its requests
//! land on, and the feed its notifications land on. Then use helpers like
//! [`expect_list`] or [`expect_create`] to assert what was sent and to answer
//! it.

use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};

use crate::clients::ProductGateway;
use crate::domain::{ImagePayload, Product, ProductDraft, ProductId, ProductPage};
use crate::error::GatewayError;
use crate::messages::GatewayRequest;
use crate::notifier::{NotificationFeed, Notifier};

type Responder<T> = oneshot::Sender<Result<T, GatewayError>>;

/// Creates a gateway whose requests go to a channel the test controls.
///
/// Nothing answers on its own: the test plays the gateway service, which lets
/// it decide the order and timing of responses.
pub fn create_mock_gateway(
    buffer_size: usize,
) -> (ProductGateway, mpsc::Receiver<GatewayRequest>, NotificationFeed) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (notifier, feed) = Notifier::new();
    (ProductGateway::new(sender, notifier), receiver, feed)
}

/// Helper to verify that the next message is a List request
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(u32, u32, Responder<ProductPage>)> {
    match receiver.recv().await {
        Some(GatewayRequest::List { page, size, respond_to }) => Some((page, size, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Search request
pub async fn expect_search(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(String, Responder<Vec<Product>>)> {
    match receiver.recv().await {
        Some(GatewayRequest::Search { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetById request
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(ProductId, Responder<Product>)> {
    match receiver.recv().await {
        Some(GatewayRequest::GetById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(ProductDraft, ImagePayload, Responder<Product>)> {
    match receiver.recv().await {
        Some(GatewayRequest::Create { draft, image, respond_to }) => Some((draft, image, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(ProductId, ProductDraft, Option<ImagePayload>, Responder<Product>)> {
    match receiver.recv().await {
        Some(GatewayRequest::Update { id, draft, image, respond_to }) => {
            Some((id, draft, image, respond_to))
        }
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<GatewayRequest>,
) -> Option<(ProductId, Responder<()>)> {
    match receiver.recv().await {
        Some(GatewayRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// A product fixture; the same id always yields the same product.
pub fn product(id: ProductId) -> Product {
    Product::new(
        id,
        format!("Product {id}"),
        format!("Description of product {id}"),
        Decimal::new(id * 100 + 99, 2),
    )
    .with_image(format!("http://images.test/{id}.png"))
}

/// A page holding the [`product`] fixtures for `ids`.
pub fn product_page(ids: &[ProductId], total_count: u64) -> ProductPage {
    ProductPage {
        items: ids.iter().copied().map(product).collect(),
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway() {
        let (gateway, mut receiver, _feed) = create_mock_gateway(10);

        let get_task = tokio::spawn(async move { gateway.get_by_id(4).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected GetById request");
        assert_eq!(id, 4);
        responder.send(Ok(product(4))).unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result, Ok(product(4)));
    }

    #[tokio::test]
    async fn test_wrong_request_reads_as_none() {
        let (gateway, mut receiver, _feed) = create_mock_gateway(10);

        tokio::spawn(async move { gateway.delete(4).await });
        assert!(expect_list(&mut receiver).await.is_none());
    }
}
