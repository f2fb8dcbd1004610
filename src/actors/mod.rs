//! The long-running services behind the catalog clients.

pub mod gateway_service;
pub mod list_service;

pub use gateway_service::*;
pub use list_service::*;
