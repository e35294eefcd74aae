//! Transport layer for upstream requests.

pub mod http;

pub use http::{Auth, HttpTransport};
