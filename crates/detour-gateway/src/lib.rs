//! HTTP front end for the Detour redirect engine.
//!
//! [`App::router`] answers mapped paths with `303 See Other` and hands every
//! other request, untouched, to an explicitly supplied fallback service.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod redirect;
pub mod startup;

pub use app::App;
pub use error::{GatewayError, Result};
pub use redirect::RedirectService;
