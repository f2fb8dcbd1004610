use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::CatalogConfig;
use crate::actors::{GatewayService, ListService};
use crate::api::HttpProductApi;
use crate::clients::{ListClient, ProductGateway};
use crate::domain::ProductId;
use crate::error::FormError;
use crate::form::{DialogHandle, ProductForm};
use crate::notifier::{NotificationFeed, Notifier};

/// The running catalog: gateway and list services plus their clients.
///
/// Responsible for starting up the services, wiring them together, and
/// handling shutdown.
pub struct CatalogSystem {
    pub gateway: ProductGateway,
    pub list_client: ListClient,
    pub notifications: NotificationFeed,
    handles: Vec<JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts both services. The list service immediately loads page 0.
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_api(config, HttpProductApi::new(config.api_url.clone()))
    }

    pub fn with_api(config: &CatalogConfig, api: HttpProductApi) -> Self {
        let (notifier, notifications) = Notifier::new();

        let (gateway_service, gateway) = GatewayService::new(config.channel_capacity, api, notifier);
        let gateway_handle = tokio::spawn(gateway_service.run());

        let (list_service, list_client) =
            ListService::new(config.channel_capacity, gateway.clone(), config.page_size);
        let list_handle = tokio::spawn(list_service.run());

        info!(api_url = %config.api_url, page_size = config.page_size, "Catalog system started");
        Self {
            gateway,
            list_client,
            notifications,
            // The list service holds a gateway client, so it has to stop first.
            handles: vec![list_handle, gateway_handle],
        }
    }

    /// Opens an empty product dialog.
    pub fn open_create(&self) -> (ProductForm, DialogHandle) {
        ProductForm::open_create(self.gateway.clone())
    }

    /// Fetches the product fresh from the server and opens it for editing.
    #[instrument(skip(self))]
    pub async fn open_edit(&self, id: ProductId) -> Result<(ProductForm, DialogHandle), FormError> {
        let product = self.gateway.get_by_id(id).await?;
        ProductForm::open_edit(self.gateway.clone(), product)
    }

    /// Drops the clients and waits for the services to drain.
    ///
    /// Forms opened from this system hold gateway clients; drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog system...");
        drop(self.list_client);
        drop(self.gateway);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(format!("Service task failed: {:?}", e));
            }
        }

        info!("Catalog system shutdown complete.");
        Ok(())
    }
}
