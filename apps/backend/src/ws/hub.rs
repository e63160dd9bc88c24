use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::PlayerId;
use crate::services::rooms::Outbox;
use crate::ws::protocol::ServerMsg;

/// One outbound event for a single connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerMsg);

/// Live connections keyed by the player id minted for each socket.
#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<PlayerId, Recipient<Deliver>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn register_connection(&self, player_id: PlayerId, recipient: Recipient<Deliver>) {
        self.connections.insert(player_id, recipient);
    }

    pub fn unregister_connection(&self, player_id: PlayerId) {
        self.connections.remove(&player_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Outbox for WsRegistry {
    fn deliver(&self, to: PlayerId, msg: ServerMsg) {
        // No shard lock is held while sending.
        let recipient = self.connections.get(&to).map(|r| r.value().clone());
        match recipient {
            Some(recipient) => recipient.do_send(Deliver(msg)),
            None => debug!(player_id = %to, kind = msg.kind(), "[WS HUB] no live connection"),
        }
    }

    fn deliver_all(&self, msg: ServerMsg) {
        let recipients: Vec<Recipient<Deliver>> =
            self.connections.iter().map(|r| r.value().clone()).collect();
        debug!(kind = msg.kind(), connections = recipients.len(), "[WS HUB] broadcast");
        for recipient in recipients {
            recipient.do_send(Deliver(msg.clone()));
        }
    }
}
