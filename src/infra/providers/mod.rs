//! Provider adapters. Each module owns one provider's wire format, endpoint
//! layout, and status vocabulary.

pub mod atlaspay;
pub mod bridgewire;

pub use atlaspay::AtlasPayAdapter;
pub use bridgewire::BridgeWireAdapter;
