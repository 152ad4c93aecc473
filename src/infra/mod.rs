//! Infrastructure layer: HTTP plumbing, webhook signatures, and the
//! provider adapters built on top of them.

pub mod http;
pub mod providers;
pub mod webhook;

pub use http::{HttpResponse, PROVIDER_ERROR, ProviderHttpClient, ProviderSettings};
pub use providers::{AtlasPayAdapter, BridgeWireAdapter};
