//! Realtime transport: WebSocket sessions and per-player delivery.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::WsRegistry;
pub use protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};
