//! Pure contract and matching primitives for the certificate lookup custom resource.
//!
//! Nothing here talks to AWS or the network; adapters live in `cert_lookup_lambda`.

pub mod contract;
pub mod error;
pub mod matching;
