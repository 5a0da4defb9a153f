//! AWS-oriented adapters and the Lambda handler for the certificate lookup
//! custom resource.
//!
//! Contract types, matching and the error taxonomy live in `cert_lookup_core`;
//! this crate owns the inventory and callback adapters, runtime configuration
//! and log setup shared by the `cert_lookup` and `local_invoke` binaries.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod observability;
