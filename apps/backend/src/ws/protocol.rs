use serde::{Deserialize, Serialize};

use crate::domain::{Response, RoomId, RoomSummary, RoomView, Team};
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
        #[serde(default)]
        admin_token: Option<String>,
    },
    CreateRoom {
        host_name: String,
        max_players: u8,
    },
    JoinRoom {
        room_id: RoomId,
        player_name: String,
    },
    StartGame {
        room_id: RoomId,
    },
    PlayCard {
        room_id: RoomId,
        card: String,
    },
    MakeCall {
        room_id: RoomId,
        call: String,
    },
    RespondCall {
        room_id: RoomId,
        response: Response,
    },
    LeaveHand {
        room_id: RoomId,
    },
    LeaveRoom {
        room_id: RoomId,
    },
    GetRoomState {
        room_id: RoomId,
    },
    GetRooms,
    AdminGameState {
        room_id: RoomId,
    },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
        player_id: uuid::Uuid,
        admin: bool,
    },

    GameUpdate {
        version: u64,
        room: RoomView,
    },

    RoomState {
        room: RoomView,
    },

    RoomsList {
        rooms: Vec<RoomSummary>,
    },

    RoomCreated {
        room_id: RoomId,
    },

    PlayerJoined {
        room: RoomView,
    },

    RoomReady {
        room: RoomView,
    },

    GameFinished {
        winner: Team,
        winner_label: String,
        room: RoomView,
    },

    PlayerLeft {
        room: RoomView,
    },

    AdminGameState {
        room: RoomView,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }

    /// Wire name of the message, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::HelloAck { .. } => "hello_ack",
            ServerMsg::GameUpdate { .. } => "game_update",
            ServerMsg::RoomState { .. } => "room_state",
            ServerMsg::RoomsList { .. } => "rooms_list",
            ServerMsg::RoomCreated { .. } => "room_created",
            ServerMsg::PlayerJoined { .. } => "player_joined",
            ServerMsg::RoomReady { .. } => "room_ready",
            ServerMsg::GameFinished { .. } => "game_finished",
            ServerMsg::PlayerLeft { .. } => "player_left",
            ServerMsg::AdminGameState { .. } => "admin_game_state",
            ServerMsg::Error { .. } => "error",
        }
    }
}
