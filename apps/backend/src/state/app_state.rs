use std::sync::Arc;

use crate::config::server::ServerConfig;
use crate::services::rooms::{Outbox, RoomService};
use crate::ws::hub::WsRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Configuration the process was started with
    pub config: ServerConfig,
    /// Room registry and game engine entry point
    pub rooms: Arc<RoomService>,
    /// Live WebSocket connections, also the outbox of `rooms`
    pub registry: Arc<WsRegistry>,
}

impl AppState {
    /// Create a new AppState wiring the room service to the WebSocket registry
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(WsRegistry::new());
        let outbox: Arc<dyn Outbox> = registry.clone();
        let rooms = RoomService::new(outbox, config.room_service_config());
        Self {
            config,
            rooms,
            registry,
        }
    }

    /// Create a test AppState with default configuration
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(ServerConfig::default())
    }
}
