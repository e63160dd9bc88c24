//! Services bridging the pure domain with the realtime transport.

pub mod rooms;

#[cfg(test)]
mod tests_rooms;

pub use rooms::{Caller, Outbox, RoomService, RoomServiceConfig};
