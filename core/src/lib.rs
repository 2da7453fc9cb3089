//! Synchronous client core for the Pingdom REST API.
//!
//! # Overview
//! Builds `HttpRequest` values against a base URL, sends them through an
//! injectable `Transport`, turns non-2xx responses into a structured
//! `ApiError` and decodes JSON bodies into caller-chosen types.
//!
//! # Design
//! - `Client` is immutable after construction and holds only the token, the
//!   base URL and a shared transport handle.
//! - Requests and responses are plain data, so the validator and the decoder
//!   can be exercised without a network.
//! - The token comes from `ClientConfig` first and `PINGDOM_API_TOKEN`
//!   second; the environment lookup is injectable (`Client::with_env`).
//! - The default transport is a blocking `ureq` agent; tests point the client
//!   at a local mock server through the base URL.

pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod validate;

pub use checks::Checks;
pub use client::Client;
pub use config::{ClientConfig, API_TOKEN_ENV, DEFAULT_BASE_URL};
pub use error::{ApiError, BoxError, ClientError};
pub use self::http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport, MAX_BODY_BYTES};
pub use validate::validate_response;
