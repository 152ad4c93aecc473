//! Application layer containing orchestration logic and shared state.

pub mod prober;
pub mod registry;
pub mod selector;
pub mod service;
pub mod state;

pub use prober::HealthProber;
pub use registry::ProviderRegistry;
pub use selector::FailoverSelector;
pub use service::PayoutService;
pub use state::AppState;
