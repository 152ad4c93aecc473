//! Shared test support. Compiled for tests and behind the `test-utils`
//! feature so integration tests can use the mocks too.

pub mod mocks;

pub use mocks::{
    MockProvider, MockProviderConfig, sample_customer, sample_payout, sample_quote,
    sample_verification,
};
