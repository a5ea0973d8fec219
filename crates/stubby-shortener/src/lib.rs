//! URL shortener service implementation.
//!
//! This crate provides [`ShortenerService`], which turns a repository and a
//! code generator into the `shorten` / `resolve` operations. Core types are
//! re-exported from `stubby_core`.

pub mod service;

pub use service::{ShortenerService, ShortenerSettings, DEFAULT_MAX_RETRIES};
pub use stubby_core::{Shortener, ShortenerError, UrlMapping};
