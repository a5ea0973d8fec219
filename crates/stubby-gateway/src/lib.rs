//! HTTP front door for the shortener.
//!
//! Validates incoming URLs, composes public short URLs and maps core
//! outcomes onto HTTP status codes. All shortening logic lives in
//! `stubby_shortener`.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
