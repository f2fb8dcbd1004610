//! HTTP access to the catalog backend.

mod http;

pub use http::*;
