//! # Catalog Console
//!
//! A headless client for a product catalog REST service: a gateway that owns
//! all network calls, a list service that keeps the paginated/searchable
//! table, and a create/edit form with validation and price formatting.
//!
//! The services follow the actor pattern: each one owns its state, receives
//! requests over a bounded `mpsc` mailbox and answers through a `oneshot`
//! channel. Callers only ever hold cheap, cloneable client handles.
//!
//! - [`actors`] - the gateway and list services
//! - [`clients`] - handles used to talk to them
//! - [`form`] - the product dialog controller
//! - [`notifier`] - user-facing success/error messages
//! - [`app_system`] - configuration, tracing and the [`CatalogSystem`](app_system::CatalogSystem) coordinator

pub mod actors;
pub mod api;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod error;
pub mod form;
pub mod messages;
pub mod notifier;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
