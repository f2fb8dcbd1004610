//! The create/edit product dialog.
//!
//! A [`ProductForm`] is opened in one of two modes and stays in it for its
//! whole life. The opener keeps the [`DialogHandle`] and learns through it
//! whether the dialog saved or was cancelled.

mod dialog;

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::clients::ProductGateway;
use crate::domain::{
    ImageFile, ImagePayload, PriceInput, Product, ProductDraft, ProductId, ProductSubmission,
};
use crate::error::{Field, FieldError, FormError, ValidationErrors};

pub use dialog::{DialogHandle, DialogOutcome, SavedProduct};
use dialog::{dialog, DialogCloser};

pub const NAME_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    /// New product; an image upload is required.
    Create,
    /// Existing product; its image is kept unless a new one is selected.
    Edit {
        id: ProductId,
        existing_image: Option<String>,
    },
}

/// Editable state of a product dialog.
#[derive(Debug)]
pub struct ProductForm {
    mode: FormMode,
    name: String,
    description: String,
    price: PriceInput,
    pending_image: Option<ImageFile>,
    preview: Option<String>,
    gateway: ProductGateway,
    closer: DialogCloser,
}

impl ProductForm {
    /// Opens an empty form for a new product.
    pub fn open_create(gateway: ProductGateway) -> (Self, DialogHandle) {
        let (closer, handle) = dialog();
        let form = Self {
            mode: FormMode::Create,
            name: String::new(),
            description: String::new(),
            price: PriceInput::default(),
            pending_image: None,
            preview: None,
            gateway,
            closer,
        };
        (form, handle)
    }

    /// Opens a form pre-filled from `product`, which should be the record just
    /// fetched from the server rather than a possibly stale list row.
    pub fn open_edit(gateway: ProductGateway, product: Product) -> Result<(Self, DialogHandle), FormError> {
        let id = product.id.ok_or(FormError::MissingId)?;
        // A blank reference is no image at all.
        let existing_image = product.image.filter(|image| !image.trim().is_empty());
        let (closer, handle) = dialog();
        let form = Self {
            mode: FormMode::Edit {
                id,
                existing_image: existing_image.clone(),
            },
            name: product.name,
            description: product.description,
            price: PriceInput::from_value(product.price),
            pending_image: None,
            preview: existing_image,
            gateway,
            closer,
        };
        Ok((form, handle))
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.closer.is_open()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn price(&self) -> &PriceInput {
        &self.price
    }

    /// Feeds the raw text of the price field and returns what it should now
    /// display.
    pub fn input_price(&mut self, raw: &str) -> &str {
        self.price = PriceInput::from_keystrokes(raw);
        self.price.display()
    }

    /// Stores `file` as the pending upload and derives its preview.
    pub fn select_image(&mut self, file: ImageFile) {
        debug!(file_name = %file.file_name, bytes = file.bytes.len(), "Image selected");
        self.preview = Some(format!(
            "data:{};base64,{}",
            file.content_type,
            BASE64.encode(&file.bytes)
        ));
        self.pending_image = Some(file);
    }

    pub async fn select_image_path(&mut self, path: impl AsRef<Path>) -> Result<(), FormError> {
        let file = ImageFile::read(path)
            .await
            .map_err(|e| FormError::ImageRead(e.to_string()))?;
        self.select_image(file);
        Ok(())
    }

    /// A data URI for a freshly selected file, or the existing image reference.
    pub fn image_preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Runs every field rule.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name_length = self.name.trim().chars().count();
        if name_length == 0 {
            errors.insert(Field::Name, FieldError::Required);
        } else if name_length < NAME_MIN_LENGTH {
            errors.insert(
                Field::Name,
                FieldError::MinLength {
                    min: NAME_MIN_LENGTH,
                    actual: name_length,
                },
            );
        }

        if self.description.trim().is_empty() {
            errors.insert(Field::Description, FieldError::Required);
        }

        if self.price.value() <= Decimal::ZERO {
            errors.insert(Field::Price, FieldError::MinValue);
        }

        if self.image_payload().is_none() {
            errors.insert(Field::Image, FieldError::Required);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn image_payload(&self) -> Option<ImagePayload> {
        match (&self.pending_image, &self.mode) {
            (Some(file), _) => Some(ImagePayload::File(file.clone())),
            (None, FormMode::Edit { existing_image: Some(reference), .. }) => {
                Some(ImagePayload::Reference(reference.clone()))
            }
            (None, _) => None,
        }
    }

    /// Builds what a submit would send, or the reasons it cannot.
    pub fn submission(&self) -> Result<ProductSubmission, FormError> {
        self.validate().map_err(FormError::Validation)?;
        let image = self.image_payload().ok_or_else(|| {
            let mut errors = ValidationErrors::default();
            errors.insert(Field::Image, FieldError::Required);
            FormError::Validation(errors)
        })?;
        let id = match &self.mode {
            FormMode::Create => None,
            FormMode::Edit { id, .. } => Some(*id),
        };
        Ok(ProductSubmission {
            id,
            draft: ProductDraft {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                price: self.price.value(),
            },
            image,
        })
    }

    /// Validates and saves the product.
    ///
    /// An invalid form is rejected before anything is sent. On success the
    /// dialog closes with the saved product; on a gateway failure it stays
    /// open so the user can retry or cancel.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&mut self) -> Result<SavedProduct, FormError> {
        if !self.closer.is_open() {
            return Err(FormError::Closed);
        }
        let payload = self.submission()?;

        let product = match payload.id {
            Some(id) => {
                self.gateway
                    .update(id, payload.draft.clone(), Some(payload.image.clone()))
                    .await?
            }
            None => {
                self.gateway
                    .create(payload.draft.clone(), payload.image.clone())
                    .await?
            }
        };

        info!(product_id = ?product.id, "Product saved, closing dialog");
        let saved = SavedProduct { payload, product };
        self.closer.close(DialogOutcome::Saved(saved.clone()));
        Ok(saved)
    }

    /// Closes the dialog without saving.
    pub fn cancel(mut self) {
        debug!("Dialog cancelled");
        self.closer.close(DialogOutcome::Cancelled);
    }
}
