use std::env;
use std::time::Duration;

use crate::domain::DealOptions;
use crate::error::AppError;
use crate::services::rooms::RoomServiceConfig;

/// Process-level configuration read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub next_hand_delay: Duration,
    pub admin_token: Option<String>,
    /// Player name that receives piezas on every deal. Off unless set.
    pub favored_player: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            next_hand_delay: Duration::from_millis(2000),
            admin_token: None,
            favored_player: None,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (environment, tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => defaults.port,
        };

        let next_hand_delay = match var("TRUCO_NEXT_HAND_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_millis).map_err(|_| {
                AppError::config(format!(
                    "TRUCO_NEXT_HAND_DELAY_MS must be a non-negative integer, got '{raw}'"
                ))
            })?,
            None => defaults.next_hand_delay,
        };

        Ok(Self {
            host: var("BACKEND_HOST").unwrap_or(defaults.host),
            port,
            next_hand_delay,
            admin_token: var("TRUCO_ADMIN_TOKEN"),
            favored_player: var("TRUCO_FAVORED_PLAYER"),
        })
    }

    pub fn room_service_config(&self) -> RoomServiceConfig {
        RoomServiceConfig {
            next_hand_delay: self.next_hand_delay,
            deal_options: DealOptions {
                favored_name: self.favored_player.clone(),
            },
            admin_token: self.admin_token.clone(),
        }
    }
}
