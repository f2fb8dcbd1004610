use std::collections::BTreeMap;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{ImagePayload, Product, ProductDraft, ProductId, ProductPage};
use crate::error::GatewayError;

/// REST client for the catalog backend.
///
/// Every method performs exactly one HTTP call and folds transport failures,
/// non-2xx statuses and undecodable bodies into [`GatewayError`].
#[derive(Debug, Clone)]
pub struct HttpProductApi {
    base_url: String,
    http: Client,
}

impl HttpProductApi {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /products?page={page}&size={size}`
    pub async fn list(&self, page: u32, size: u32) -> Result<ProductPage, GatewayError> {
        let response = self
            .http
            .get(self.url("/products"))
            .query(&[("page", page), ("size", size)])
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    /// `GET /products/search?query={query}`
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, GatewayError> {
        let response = self
            .http
            .get(self.url("/products/search"))
            .query(&[("query", query)])
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    /// `GET /products/{id}`
    pub async fn get_by_id(&self, id: ProductId) -> Result<Product, GatewayError> {
        let response = self
            .http
            .get(self.url(&format!("/products/{id}")))
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    /// `POST /products` as multipart form data.
    pub async fn create(
        &self,
        draft: &ProductDraft,
        image: ImagePayload,
    ) -> Result<Product, GatewayError> {
        let form = product_form(draft, Some(image))?;
        let response = self
            .http
            .post(self.url("/products"))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        read_json::<SavedBody>(response).await.map(SavedBody::into_product)
    }

    /// `PUT /products/{id}` as multipart form data carrying the id as well.
    ///
    /// Without an image part the server keeps the one it has.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        image: Option<ImagePayload>,
    ) -> Result<Product, GatewayError> {
        let form = product_form(draft, image)?.text("id", id.to_string());
        let response = self
            .http
            .put(self.url(&format!("/products/{id}")))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        read_json::<SavedBody>(response).await.map(SavedBody::into_product)
    }

    /// `DELETE /products/{id}`; the body is ignored.
    pub async fn delete(&self, id: ProductId) -> Result<(), GatewayError> {
        let response = self
            .http
            .delete(self.url(&format!("/products/{id}")))
            .send()
            .await
            .map_err(network)?;
        check_status(response).await.map(|_| ())
    }
}

fn network(err: reqwest::Error) -> GatewayError {
    GatewayError::Network(err.to_string())
}

fn product_form(draft: &ProductDraft, image: Option<ImagePayload>) -> Result<Form, GatewayError> {
    let form = Form::new()
        .text("name", draft.name.clone())
        .text("description", draft.description.clone())
        .text("price", draft.price.to_string());

    let form = match image {
        Some(ImagePayload::File(file)) => {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(network)?;
            form.part("image", part)
        }
        Some(ImagePayload::Reference(reference)) => form.text("image", reference),
        None => form,
    };
    Ok(form)
}

async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "Request rejected");
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    Err(GatewayError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

/// Error body as produced by the backend's exception handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetails {
    message: Option<String>,
}

/// Pulls a human readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(ErrorDetails {
        message: Some(message),
    }) = serde_json::from_str::<ErrorDetails>(body)
    {
        return Some(message);
    }
    // Bean validation failures come back as a field -> message map.
    if let Ok(fields) = serde_json::from_str::<BTreeMap<String, String>>(body) {
        if !fields.is_empty() {
            let joined = fields
                .iter()
                .map(|(field, message)| format!("{field}: {message}"))
                .collect::<Vec<_>>()
                .join("; ");
            return Some(joined);
        }
    }
    let text = body.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Save endpoints answer either with the product or with a
/// `{product, message}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SavedBody {
    Envelope { product: Product },
    Bare(Product),
}

impl SavedBody {
    fn into_product(self) -> Product {
        match self {
            SavedBody::Envelope { product } | SavedBody::Bare(product) => product,
        }
    }
}
