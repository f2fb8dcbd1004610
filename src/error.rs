use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Failures of a single gateway call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// The request never got a response.
    #[error("network error - {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("{status} - {message}")]
    Server { status: u16, message: String },
    /// A 2xx response whose body could not be decoded.
    #[error("invalid response - {0}")]
    InvalidResponse(String),
    #[error("gateway unavailable - {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Request superseded by a newer one")]
    Superseded,
    #[error("Paging is disabled while search results are shown")]
    SearchActive,
    #[error("Page size must be positive")]
    InvalidPageSize,
    #[error("Actor communication error: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    #[error("Form is invalid: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Product to edit has no id")]
    MissingId,
    #[error("Dialog already closed")]
    Closed,
    #[error("Could not read image: {0}")]
    ImageRead(String),
}

/// Form fields subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Description,
    Price,
    Image,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Description => write!(f, "description"),
            Field::Price => write!(f, "price"),
            Field::Image => write!(f, "image"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("is required")]
    Required,
    #[error("must have at least {min} characters (has {actual})")]
    MinLength { min: usize, actual: usize },
    #[error("must be greater than zero")]
    MinValue,
}

/// Per-field validation failures. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field} {error}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_reads_status_then_message() {
        let err = GatewayError::Server {
            status: 500,
            message: "Failed to create product".into(),
        };
        assert_eq!(err.to_string(), "500 - Failed to create product");
    }

    #[test]
    fn validation_errors_render_in_field_order() {
        let mut errors = ValidationErrors::default();
        errors.insert(Field::Image, FieldError::Required);
        errors.insert(Field::Name, FieldError::MinLength { min: 3, actual: 2 });
        assert_eq!(
            errors.to_string(),
            "name must have at least 3 characters (has 2); image is required"
        );
    }
}
