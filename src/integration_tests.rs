#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use rust_decimal::Decimal;
    use serde_json::json;
    use tokio::sync::mpsc;

    use crate::actors::ListService;
    use crate::app_system::{CatalogConfig, CatalogSystem};
    use crate::clients::{ListClient, ProductGateway};
    use crate::domain::{ImageFile, ListSnapshot, ProductId};
    use crate::error::{FormError, GatewayError};
    use crate::form::{DialogOutcome, ProductForm};
    use crate::messages::GatewayRequest;
    use crate::mock_framework::{
        create_mock_gateway, expect_create, expect_get, expect_list, expect_update, product,
        product_page,
    };
    use crate::notifier::{NotificationFeed, NotificationLevel};

    async fn list_with_rows(
        ids: &[ProductId],
    ) -> (
        ProductGateway,
        ListClient,
        mpsc::Receiver<GatewayRequest>,
        NotificationFeed,
    ) {
        let (gateway, mut requests, feed) = create_mock_gateway(10);
        let (service, list_client) = ListService::new(10, gateway.clone(), 10);
        tokio::spawn(service.run());

        let (page, size, responder) = expect_list(&mut requests).await.expect("Expected initial List");
        assert_eq!((page, size), (0, 10));
        responder.send(Ok(product_page(ids, ids.len() as u64))).unwrap();

        let mut rows = list_client.subscribe().await.unwrap();
        rows.wait_for(|snapshot| snapshot.items.len() == ids.len())
            .await
            .unwrap();

        (gateway, list_client, requests, feed)
    }

    #[tokio::test]
    async fn test_failed_create_keeps_dialog_and_rows() {
        let (gateway, list_client, mut requests, mut feed) = list_with_rows(&[5, 7, 9]).await;
        let before = list_client.snapshot().await.unwrap();

        let (mut form, handle) = ProductForm::open_create(gateway);
        form.set_name("Desk lamp");
        form.set_description("Warm light");
        form.input_price("150000");
        form.select_image(ImageFile::new("lamp.jpg", vec![0xff, 0xd8]));

        let submit = tokio::spawn(async move {
            let result = form.submit().await;
            (form, result)
        });
        let (draft, _, responder) = expect_create(&mut requests).await.expect("Expected Create");
        assert_eq!(draft.price, Decimal::new(150000, 2));
        responder
            .send(Err(GatewayError::Server {
                status: 500,
                message: "Internal Server Error".into(),
            }))
            .unwrap();

        let (form, result) = submit.await.unwrap();
        assert!(matches!(result, Err(FormError::Gateway(_))));
        assert!(form.is_open());

        let after = list_client.snapshot().await.unwrap();
        assert_eq!(after, before);

        let notes = feed.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(
            notes[0].message,
            "Failed to create product: 500 - Internal Server Error"
        );

        // Cancelling afterwards leaves the list alone.
        form.cancel();
        let outcome = handle.closed().await;
        assert_eq!(outcome, DialogOutcome::Cancelled);
        let snapshot = list_client.on_dialog_closed(&outcome).await.unwrap();
        assert_eq!(snapshot, before);
        assert!(requests.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_edit_flow_reloads_first_page() {
        let (gateway, list_client, mut requests, mut feed) = list_with_rows(&[5, 7, 9]).await;

        // The form is filled from a fresh fetch, not the list row.
        let fetch = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.get_by_id(7).await }
        });
        let (id, responder) = expect_get(&mut requests).await.expect("Expected GetById");
        assert_eq!(id, 7);
        responder.send(Ok(product(7))).unwrap();
        let fresh = fetch.await.unwrap().unwrap();

        let (mut form, handle) = ProductForm::open_edit(gateway, fresh).unwrap();
        form.set_name("Renamed product");

        let submit = tokio::spawn(async move { form.submit().await });
        let (id, draft, image, responder) = expect_update(&mut requests).await.expect("Expected Update");
        assert_eq!(id, 7);
        assert_eq!(draft.name, "Renamed product");
        assert!(image.is_some());
        let mut updated = product(7);
        updated.name = draft.name;
        responder.send(Ok(updated.clone())).unwrap();
        submit.await.unwrap().unwrap();

        let outcome = handle.closed().await;
        assert!(outcome.is_saved());

        let reload = tokio::spawn(async move { list_client.on_dialog_closed(&outcome).await });
        let (page, size, responder) = expect_list(&mut requests).await.expect("Expected reload");
        assert_eq!((page, size), (0, 10));
        let mut refreshed = product_page(&[5, 7, 9], 3);
        refreshed.items[1] = updated.clone();
        responder.send(Ok(refreshed)).unwrap();

        let snapshot: ListSnapshot = reload.await.unwrap().unwrap();
        assert_eq!(snapshot.current_page, 0);
        assert_eq!(snapshot.items[1], updated);

        let notes = feed.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Product updated successfully");
    }

    #[tokio::test]
    async fn test_system_against_http_backend() {
        let app = Router::new()
            .route(
                "/api/products",
                get(|| async {
                    Json(json!({
                        "content": [
                            {"id": 5, "name": "Lamp", "description": "Desk lamp", "price": 19.9},
                            {"id": 7, "name": "Chair", "description": "Office chair", "price": 120}
                        ],
                        "totalElements": 2
                    }))
                }),
            )
            .route(
                "/api/products/{id}",
                delete(|Path(id): Path<i64>| async move {
                    if id == 7 {
                        StatusCode::NO_CONTENT
                    } else {
                        StatusCode::NOT_FOUND
                    }
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = CatalogConfig::default().with_api_url(format!("http://{addr}/api"));
        let mut system = CatalogSystem::new(&config);

        let mut rows = system.list_client.subscribe().await.unwrap();
        rows.wait_for(|snapshot| snapshot.total_count == 2).await.unwrap();

        let snapshot = system.list_client.on_delete_requested(7).await.unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].id, Some(5));
        assert_eq!(snapshot.total_count, 2);

        let notes = system.notifications.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Success);

        drop(rows);
        system.shutdown().await.unwrap();
    }
}
