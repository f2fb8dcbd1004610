use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-assigned product identifier.
pub type ProductId = i64;

/// Represents a product in the catalog.
///
/// Rows shown in the list are projections of this struct as last fetched from
/// the server; the server holds the authoritative record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Creates a product as returned by the server.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the server
    /// * `name` - Display name
    /// * `description` - Free-form description
    /// * `price` - Price in currency units
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description: description.into(),
            price,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Fields submitted when creating or updating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProductPage {
    #[serde(rename = "content")]
    pub items: Vec<Product>,
    #[serde(rename = "totalElements")]
    pub total_count: u64,
}

/// An image file selected for upload.
#[derive(Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Wraps raw bytes, deriving the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Reads an image from disk.
    pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

// Payloads can be large; keep them out of logs and span fields.
impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// The image part of a submission: a fresh upload or the reference the
/// server already holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagePayload {
    File(ImageFile),
    Reference(String),
}

/// Everything a product form hands to the gateway on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSubmission {
    /// Present in edit mode only, copied from the product being edited.
    pub id: Option<ProductId>,
    pub draft: ProductDraft,
    pub image: ImagePayload,
}
