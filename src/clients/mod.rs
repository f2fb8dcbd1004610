//! Client handles for the catalog services.
//!
//! Clients are thin wrappers over a service mailbox: each method sends one
//! request with a oneshot reply channel and awaits the answer.

mod macros;

pub mod gateway_client;
pub mod list_client;

pub use gateway_client::*;
pub use list_client::*;
