//! Blocking client for the catalog provider's user and product lookups.
//!
//! # Overview
//! `Consumer` turns `get_user` / `get_product` calls into one HTTP GET each
//! and parses the JSON body into a `User` or `Product`. A 404 yields
//! `Ok(None)`; transport and body failures surface as `ApiError`.
//!
//! # Design
//! - `Consumer` holds only the base URI and a `Transport`.
//! - Each lookup is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and testable.
//! - Records are defined here, independently from the mock provider; the
//!   contract test catches schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{Consumer, PRODUCT_API_TOKEN};
pub use config::ConsumerConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Product, User};
