// handlers/mod.rs - HTTP handlers
//
// Public service endpoints (/, /health) plus the message resource.

pub mod health;
pub mod messages;
pub mod root;

pub use health::health;
pub use root::root;
