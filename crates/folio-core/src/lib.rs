//! # Folio Core
//!
//! Normalization, aggregation and signal scoring for the Folio dashboards.
//!
//! Three independent pipelines share one shape: raw upstream payloads are
//! normalized, aggregated, ranked and finally assembled into an immutable
//! snapshot. Everything in this crate is a pure function of its input; the
//! HTTP fetch lives in `folio-feeds`.

pub mod aggregate;
pub mod crypto;
pub mod defi;
pub mod farcaster;
pub mod keywords;
pub mod layout;
pub mod models;
pub mod numeric;
pub mod ranking;
pub mod raw;

pub use crypto::assemble_crypto_dashboard;
pub use defi::assemble_defi_analytics;
pub use farcaster::assemble_farcaster_widget;
pub use models::*;
