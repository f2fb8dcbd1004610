use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, Instrument};

use crate::api::HttpProductApi;
use crate::clients::ProductGateway;
use crate::domain::{ImagePayload, Product, ProductDraft, ProductId, ProductPage};
use crate::error::GatewayError;
use crate::messages::{GatewayRequest, ServiceResponse};
use crate::notifier::Notifier;

/// Sole owner of network I/O for product data.
///
/// Requests are taken off the mailbox in order, but each HTTP call runs on its
/// own task which owns the response channel, so a slow call never holds up
/// the ones behind it.
pub struct GatewayService {
    receiver: mpsc::Receiver<GatewayRequest>,
    api: HttpProductApi,
}

impl GatewayService {
    pub fn new(buffer_size: usize, api: HttpProductApi, notifier: Notifier) -> (Self, ProductGateway) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self { receiver, api };
        (service, ProductGateway::new(sender, notifier))
    }

    #[instrument(name = "gateway_service", skip(self), fields(base_url = %self.api.base_url()))]
    pub async fn run(mut self) {
        info!("GatewayService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                GatewayRequest::List { page, size, respond_to } => {
                    self.handle_list(page, size, respond_to);
                }
                GatewayRequest::Search { query, respond_to } => {
                    self.handle_search(query, respond_to);
                }
                GatewayRequest::GetById { id, respond_to } => {
                    self.handle_get_by_id(id, respond_to);
                }
                GatewayRequest::Create { draft, image, respond_to } => {
                    self.handle_create(draft, image, respond_to);
                }
                GatewayRequest::Update { id, draft, image, respond_to } => {
                    self.handle_update(id, draft, image, respond_to);
                }
                GatewayRequest::Delete { id, respond_to } => {
                    self.handle_delete(id, respond_to);
                }
            }
        }
        info!("GatewayService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list(&self, page: u32, size: u32, respond_to: ServiceResponse<ProductPage, GatewayError>) {
        debug!("Processing list request");
        let api = self.api.clone();
        respond_in_background(respond_to, async move { api.list(page, size).await });
    }

    #[instrument(skip(self, respond_to))]
    fn handle_search(&self, query: String, respond_to: ServiceResponse<Vec<Product>, GatewayError>) {
        debug!("Processing search request");
        let api = self.api.clone();
        respond_in_background(respond_to, async move { api.search(&query).await });
    }

    #[instrument(skip(self, respond_to))]
    fn handle_get_by_id(&self, id: ProductId, respond_to: ServiceResponse<Product, GatewayError>) {
        debug!("Processing get request");
        let api = self.api.clone();
        respond_in_background(respond_to, async move { api.get_by_id(id).await });
    }

    #[instrument(fields(product_name = %draft.name), skip(self, draft, image, respond_to))]
    fn handle_create(&self, draft: ProductDraft, image: ImagePayload, respond_to: ServiceResponse<Product, GatewayError>) {
        debug!("Processing create request");
        let api = self.api.clone();
        respond_in_background(respond_to, async move { api.create(&draft, image).await });
    }

    #[instrument(fields(product_id = %id, new_image = image.is_some()), skip(self, draft, image, respond_to))]
    fn handle_update(
        &self,
        id: ProductId,
        draft: ProductDraft,
        image: Option<ImagePayload>,
        respond_to: ServiceResponse<Product, GatewayError>,
    ) {
        debug!("Processing update request");
        let api = self.api.clone();
        respond_in_background(respond_to, async move { api.update(id, &draft, image).await });
    }

    #[instrument(skip(self, respond_to))]
    fn handle_delete(&self, id: ProductId, respond_to: ServiceResponse<(), GatewayError>) {
        debug!("Processing delete request");
        let api = self.api.clone();
        respond_in_background(respond_to, async move { api.delete(id).await });
    }
}

/// Spawns `call` and sends its result once done. The task owns the response
/// channel; a caller that stopped waiting is not an error.
fn respond_in_background<T, F>(respond_to: ServiceResponse<T, GatewayError>, call: F)
where
    T: Send + 'static,
    F: Future<Output = Result<T, GatewayError>> + Send + 'static,
{
    tokio::spawn(
        async move {
            let result = call.await;
            match &result {
                Ok(_) => debug!("Request completed"),
                Err(e) => info!(error = %e, "Request failed"),
            }
            if respond_to.send(result).is_err() {
                debug!("Caller went away before the response arrived");
            }
        }
        .in_current_span(),
    );
}
