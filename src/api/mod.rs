//! HTTP API layer.

pub mod handlers;
pub mod router;

pub use router::{ApiDoc, create_router};
