//! Host APIs.
//!
//! - [`http`] - reqwest transport for the GitHub REST API

pub mod http;
