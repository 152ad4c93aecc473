//! Stablecoin payout gateway.
//!
//! A unification layer over stablecoin-to-fiat payout providers: one API for
//! customer onboarding, KYC/KYB, quoting, and payout execution, with
//! health-based provider selection and failover behind it.

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
