//! Form intake and notification service for the Insurio marketing site.
//!
//! Two endpoints receive form-encoded submissions (client inquiries and
//! partner applications), append a timestamped row to an append-only CSV
//! sheet, and email the operator. The [`client`] module is the matching
//! submitter used by the CLI and by anything else that posts to an intake
//! endpoint.

pub mod client;
pub mod config;
pub mod error;
pub mod intake;
pub mod notify;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod templates;
