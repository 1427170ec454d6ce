mod fallback;
mod health;

pub use fallback::{default_fallback, not_found_handler, root_handler};
pub use health::health_handler;
