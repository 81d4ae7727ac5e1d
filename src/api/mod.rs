//! # API Module
//!
//! HTTP endpoints served by the local redirect listener while the OAuth
//! authorization-code flow is in progress.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the browser redirect from Spotify's authorization
//!   server and forwards the `code` query parameter to the waiting session.
//!
//! The listener is mounted as a fallback, so the first request is captured no
//! matter which path the browser hits. The handler always answers
//! `200 text/plain` with [`SUCCESS_MESSAGE`].
//!
//! ## Related Modules
//!
//! - [`crate::server`] - Runs the one-shot listener around this handler
//! - [`crate::session`] - Consumes the captured code

mod callback;

pub use callback::{CodeSender, SUCCESS_MESSAGE, callback};
