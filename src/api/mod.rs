//! HTTP API surface
//!
//! Every user action of the browser original maps to one route here.

pub mod handlers;
pub mod server;
pub mod types;

pub use server::{build_router, start_server};
