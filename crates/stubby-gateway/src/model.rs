mod url;

pub use self::url::{HealthResponse, ShortenRequest, ShortenResponse, MAX_URL_LENGTH};
