mod health;
mod url;

pub use health::health_handler;
pub use self::url::{redirect_handler, shorten_handler};
