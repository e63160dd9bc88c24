//! Room registry and command dispatch - bridges the pure room aggregate with
//! the realtime transport.
//!
//! Each command locks exactly one room, runs to completion and publishes the
//! result per player through the [`Outbox`]. Rooms never block each other.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::calls::{CallOutcome, Response};
use crate::domain::game_transition::{derive_room_transitions, RoomLifecycleView, RoomTransition};
use crate::domain::player_view::{project, project_unmasked, summary, RoomSummary, RoomView};
use crate::domain::tricks::PlayOutcome;
use crate::domain::{Call, Card, DealOptions, HandOutcome, PlayerId, Room, RoomId};
use crate::errors::domain::{DomainError, IllegalStateKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::utils::join_code::{generate_room_code, normalize_room_code};
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Outbound event delivery.
pub trait Outbox: Send + Sync {
    /// One event to one player.
    fn deliver(&self, to: PlayerId, msg: ServerMsg);
    /// One event to every live connection, seated or not.
    fn deliver_all(&self, msg: ServerMsg);
}

#[derive(Debug, Clone)]
pub struct RoomServiceConfig {
    /// Pause between a resolved hand and the next deal.
    pub next_hand_delay: Duration,
    pub deal_options: DealOptions,
    /// Token that grants the admin capability. `None` disables it.
    pub admin_token: Option<String>,
}

impl Default for RoomServiceConfig {
    fn default() -> Self {
        Self {
            next_hand_delay: Duration::from_millis(2000),
            deal_options: DealOptions::default(),
            admin_token: None,
        }
    }
}

/// The connection a command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub player_id: PlayerId,
    pub is_admin: bool,
}

impl Caller {
    pub fn player(player_id: PlayerId) -> Self {
        Self {
            player_id,
            is_admin: false,
        }
    }
}

type SharedRoom = Arc<Mutex<Room>>;

pub struct RoomService {
    rooms: DashMap<RoomId, SharedRoom>,
    /// A player sits in at most one room.
    membership: DashMap<PlayerId, RoomId>,
    outbox: Arc<dyn Outbox>,
    config: RoomServiceConfig,
}

impl RoomService {
    pub fn new(outbox: Arc<dyn Outbox>, config: RoomServiceConfig) -> Arc<Self> {
        Arc::new(Self {
            rooms: DashMap::new(),
            membership: DashMap::new(),
            outbox,
            config,
        })
    }

    pub fn grants_admin(&self, token: Option<&str>) -> bool {
        match (self.config.admin_token.as_deref(), token) {
            (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
            _ => false,
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_of(&self, player: PlayerId) -> Option<RoomId> {
        self.membership.get(&player).map(|r| r.value().clone())
    }

    /// Public summaries, ordered by room id.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let shared: Vec<SharedRoom> = self.rooms.iter().map(|r| Arc::clone(r.value())).collect();
        let mut rooms: Vec<RoomSummary> = shared.iter().map(|r| summary(&r.lock())).collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    pub fn room_summary(&self, room_id: &str) -> Result<RoomSummary, DomainError> {
        let shared = self.room(&normalize_room_code(room_id))?;
        let room = shared.lock();
        Ok(summary(&room))
    }

    /// Entry point for one decoded inbound command.
    ///
    /// A panic inside a handler is contained here and reported to the caller.
    pub fn dispatch(self: &Arc<Self>, caller: Caller, msg: ClientMsg) {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.handle(caller, msg)));
        if outcome.is_err() {
            error!(player_id = %caller.player_id, "Command handler panicked");
            self.outbox.deliver(
                caller.player_id,
                ServerMsg::error(ErrorCode::Internal, "Internal error"),
            );
        }
    }

    fn handle(self: &Arc<Self>, caller: Caller, msg: ClientMsg) {
        let player = caller.player_id;
        match msg {
            // Answered by the connection itself.
            ClientMsg::Hello { .. } => {}

            ClientMsg::CreateRoom {
                host_name,
                max_players,
            } => {
                let result = self.create_room(player, &host_name, max_players);
                self.reply_on_error(player, "create_room", result);
            }
            ClientMsg::JoinRoom {
                room_id,
                player_name,
            } => {
                let result = self.join_room(player, &room_id, &player_name);
                self.reply_on_error(player, "join_room", result);
            }
            ClientMsg::StartGame { room_id } => {
                let result = self.start_game(player, &room_id);
                self.reply_on_error(player, "start_game", result);
            }
            ClientMsg::LeaveRoom { room_id } => {
                let result = self.leave_room(player, &room_id);
                self.reply_on_error(player, "leave_room", result);
            }
            ClientMsg::GetRoomState { room_id } => {
                let result = self
                    .room_state(player, &room_id)
                    .map(|room| self.outbox.deliver(player, ServerMsg::RoomState { room }));
                self.reply_on_error(player, "get_room_state", result);
            }
            ClientMsg::GetRooms => {
                self.outbox.deliver(
                    player,
                    ServerMsg::RoomsList {
                        rooms: self.list_rooms(),
                    },
                );
            }
            ClientMsg::AdminGameState { room_id } => {
                let result = self
                    .admin_game_state(caller, &room_id)
                    .map(|room| self.outbox.deliver(player, ServerMsg::AdminGameState { room }));
                self.reply_on_error(player, "admin_game_state", result);
            }

            ClientMsg::PlayCard { room_id, card } => {
                let result = card
                    .parse::<Card>()
                    .and_then(|card| self.play_card(player, &room_id, card));
                Self::ignore_in_hand(player, &room_id, "play_card", result);
            }
            ClientMsg::MakeCall { room_id, call } => {
                let result = call
                    .parse::<Call>()
                    .and_then(|call| self.make_call(player, &room_id, call));
                Self::ignore_in_hand(player, &room_id, "make_call", result);
            }
            ClientMsg::RespondCall { room_id, response } => {
                let result = self.respond_call(player, &room_id, response);
                Self::ignore_in_hand(player, &room_id, "respond_call", result);
            }
            ClientMsg::LeaveHand { room_id } => {
                let result = self.leave_hand(player, &room_id);
                Self::ignore_in_hand(player, &room_id, "leave_hand", result);
            }
        }
    }

    fn reply_on_error<T>(&self, player: PlayerId, command: &str, result: Result<T, DomainError>) {
        if let Err(err) = result {
            info!(
                player_id = %player,
                command,
                code = %err.code(),
                "Lobby command rejected"
            );
            self.outbox
                .deliver(player, ServerMsg::error(err.code(), err.detail()));
        }
    }

    fn ignore_in_hand<T>(
        player: PlayerId,
        room_id: &str,
        command: &str,
        result: Result<T, DomainError>,
    ) {
        if let Err(err) = result {
            debug!(
                player_id = %player,
                room_id,
                command,
                code = %err.code(),
                detail = err.detail(),
                "In-hand command ignored"
            );
        }
    }

    // ---- lobby ----

    pub fn create_room(
        self: &Arc<Self>,
        host: PlayerId,
        host_name: &str,
        max_players: u8,
    ) -> Result<RoomId, DomainError> {
        self.ensure_unseated(host)?;
        let seed: u64 = rand::random();

        let (room_id, shared) = loop {
            let code = generate_room_code();
            match self.rooms.entry(code.clone()) {
                Entry::Occupied(_) => debug!(room_id = %code, "Room code collision, regenerating"),
                Entry::Vacant(slot) => {
                    let room = Room::new(
                        code.clone(),
                        host,
                        host_name,
                        max_players,
                        seed,
                        self.config.deal_options.clone(),
                    )?;
                    let shared = Arc::new(Mutex::new(room));
                    slot.insert(Arc::clone(&shared));
                    break (code, shared);
                }
            }
        };
        self.membership.insert(host, room_id.clone());
        info!(room_id = %room_id, player_id = %host, max_players, "Room created");

        let room = shared.lock();
        self.outbox.deliver(
            host,
            ServerMsg::RoomCreated {
                room_id: room_id.clone(),
            },
        );
        self.outbox.deliver(
            host,
            ServerMsg::GameUpdate {
                version: room.version,
                room: project(&room, host),
            },
        );
        drop(room);
        self.publish_rooms_list();
        Ok(room_id)
    }

    /// Seat a player; the game starts as soon as the roster is complete.
    pub fn join_room(
        self: &Arc<Self>,
        player: PlayerId,
        room_id: &str,
        player_name: &str,
    ) -> Result<(), DomainError> {
        self.ensure_unseated(player)?;
        let room_id = normalize_room_code(room_id);
        let shared = self.room(&room_id)?;
        {
            let mut room = shared.lock();
            // An empty room is being torn down.
            if room.players.is_empty() {
                return Err(Self::room_not_found(&room_id));
            }

            let before = RoomLifecycleView::of(&room);
            let seat = room.join(player, player_name)?;
            self.membership.insert(player, room_id.clone());
            info!(room_id = %room_id, player_id = %player, seat, "Player joined room");

            if room.is_full() {
                self.start_locked(&mut room)?;
            }
            self.publish(&room, &before);
        }
        self.publish_rooms_list();
        Ok(())
    }

    /// Retry the first deal of a full room.
    pub fn start_game(self: &Arc<Self>, player: PlayerId, room_id: &str) -> Result<(), DomainError> {
        let shared = self.member_room(player, room_id)?;
        let mut room = shared.lock();
        let before = RoomLifecycleView::of(&room);
        self.start_locked(&mut room)?;
        self.publish(&room, &before);
        Ok(())
    }

    /// Deal the first hand. A failed deal is reported to the whole room and
    /// leaves it waiting.
    fn start_locked(&self, room: &mut Room) -> Result<(), DomainError> {
        match room.start() {
            Ok(()) => Ok(()),
            Err(err @ DomainError::FatalDeal(_)) => {
                error!(room_id = %room.id, detail = err.detail(), "First deal failed");
                self.broadcast_error(room, &err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn leave_room(self: &Arc<Self>, player: PlayerId, room_id: &str) -> Result<(), DomainError> {
        let shared = self.member_room(player, room_id)?;
        self.depart(player, &shared)
    }

    /// Connection closed: leave whatever room the player sat in.
    pub fn disconnect(self: &Arc<Self>, player: PlayerId) {
        let Some(room_id) = self.room_of(player) else {
            return;
        };
        match self.room(&room_id) {
            Ok(shared) => {
                if let Err(err) = self.depart(player, &shared) {
                    warn!(room_id = %room_id, player_id = %player, code = %err.code(), "Departure on disconnect failed");
                    self.membership.remove(&player);
                }
            }
            Err(_) => {
                self.membership.remove(&player);
            }
        }
    }

    fn depart(self: &Arc<Self>, player: PlayerId, shared: &SharedRoom) -> Result<(), DomainError> {
        {
            let mut room = shared.lock();
            let before = RoomLifecycleView::of(&room);
            let departure = room.remove_player(player)?;
            self.membership.remove(&player);
            info!(
                room_id = %room.id,
                player_id = %player,
                seat = departure.seat,
                forfeit_to = ?departure.forfeit_to,
                "Player left room"
            );

            if departure.now_empty {
                self.rooms.remove(&room.id);
                info!(room_id = %room.id, "Room closed");
            } else {
                self.publish(&room, &before);
            }
        }
        self.publish_rooms_list();
        Ok(())
    }

    pub fn room_state(&self, viewer: PlayerId, room_id: &str) -> Result<RoomView, DomainError> {
        let room_id = normalize_room_code(room_id);
        let shared = self.room(&room_id)?;
        let room = shared.lock();
        Ok(project(&room, viewer))
    }

    pub fn admin_game_state(&self, caller: Caller, room_id: &str) -> Result<RoomView, DomainError> {
        if !caller.is_admin {
            return Err(DomainError::illegal(
                IllegalStateKind::Forbidden,
                "Admin capability required",
            ));
        }
        let room_id = normalize_room_code(room_id);
        let shared = self.room(&room_id)?;
        let room = shared.lock();
        info!(room_id = %room_id, player_id = %caller.player_id, "Admin read of unmasked state");
        Ok(project_unmasked(&room))
    }

    // ---- in hand ----

    pub fn play_card(
        self: &Arc<Self>,
        player: PlayerId,
        room_id: &str,
        card: Card,
    ) -> Result<PlayOutcome, DomainError> {
        self.mutate(player, room_id, |room| room.play_card(player, card))
    }

    pub fn make_call(
        self: &Arc<Self>,
        player: PlayerId,
        room_id: &str,
        call: Call,
    ) -> Result<CallOutcome, DomainError> {
        self.mutate(player, room_id, |room| room.make_call(player, call))
    }

    pub fn respond_call(
        self: &Arc<Self>,
        player: PlayerId,
        room_id: &str,
        response: Response,
    ) -> Result<CallOutcome, DomainError> {
        self.mutate(player, room_id, |room| room.respond_call(player, response))
    }

    pub fn leave_hand(
        self: &Arc<Self>,
        player: PlayerId,
        room_id: &str,
    ) -> Result<HandOutcome, DomainError> {
        self.mutate(player, room_id, |room| room.leave_hand(player))
    }

    fn mutate<T>(
        self: &Arc<Self>,
        player: PlayerId,
        room_id: &str,
        apply: impl FnOnce(&mut Room) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let shared = self.member_room(player, room_id)?;
        let mut room = shared.lock();
        let before = RoomLifecycleView::of(&room);
        let out = apply(&mut room)?;
        self.publish(&room, &before);
        Ok(out)
    }

    // ---- scheduling ----

    fn schedule_deal(self: &Arc<Self>, room_id: RoomId, hand_no: u32) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(room_id = %room_id, hand_no, "No runtime available, next hand not scheduled");
            return;
        };
        let service = Arc::clone(self);
        let delay = self.config.next_hand_delay;
        debug!(room_id = %room_id, hand_no, delay_ms = delay.as_millis() as u64, "Next deal scheduled");
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            service.deal_scheduled(&room_id, hand_no);
        });
    }

    /// Deal the hand after `hand_no`. A deleted room, a finished game or a
    /// hand that moved on makes this a no-op; returns whether a deal happened.
    pub fn deal_scheduled(self: &Arc<Self>, room_id: &str, hand_no: u32) -> bool {
        let Ok(shared) = self.room(room_id) else {
            debug!(room_id, hand_no, "Scheduled deal for a closed room");
            return false;
        };
        let mut room = shared.lock();
        let before = RoomLifecycleView::of(&room);
        match room.deal_next_hand(hand_no) {
            Ok(true) => {
                self.publish(&room, &before);
                true
            }
            Ok(false) => {
                debug!(room_id, hand_no, "Stale scheduled deal ignored");
                false
            }
            Err(err) => {
                error!(room_id, hand_no, detail = err.detail(), "Scheduled deal failed");
                self.broadcast_error(&room, &err);
                false
            }
        }
    }

    // ---- publishing ----

    fn publish(self: &Arc<Self>, room: &Room, before: &RoomLifecycleView) {
        let after = RoomLifecycleView::of(room);
        for transition in derive_room_transitions(before, &after) {
            match transition {
                RoomTransition::PlayerJoined => {
                    self.broadcast(room, |room| ServerMsg::PlayerJoined { room })
                }
                RoomTransition::PlayerLeft => {
                    self.broadcast(room, |room| ServerMsg::PlayerLeft { room })
                }
                RoomTransition::GameStarted => {
                    info!(room_id = %room.id, players = room.players.len(), "Game started");
                    self.broadcast(room, |room| ServerMsg::RoomReady { room });
                }
                RoomTransition::HandStarted { hand_no } => {
                    info!(room_id = %room.id, hand_no, "Hand dealt");
                }
                RoomTransition::HandEnded { hand_no } => {
                    info!(room_id = %room.id, hand_no, "Hand resolved");
                    self.schedule_deal(room.id.clone(), hand_no);
                }
                RoomTransition::TurnBecame { player_id } => {
                    debug!(room_id = %room.id, player_id = %player_id, "Turn passed");
                }
                RoomTransition::GameFinished { winner } => {
                    info!(room_id = %room.id, winner = winner.number(), "Game finished");
                    self.broadcast(room, |room| ServerMsg::GameFinished {
                        winner,
                        winner_label: winner.label(),
                        room,
                    });
                }
            }
        }

        if after.version != before.version {
            self.broadcast(room, |view| ServerMsg::GameUpdate {
                version: room.version,
                room: view,
            });
        }
    }

    /// Pushes the public listing to every connection. Must not be called
    /// while a room lock is held: the listing locks each room in turn.
    fn publish_rooms_list(&self) {
        self.outbox.deliver_all(ServerMsg::RoomsList {
            rooms: self.list_rooms(),
        });
    }

    fn broadcast(&self, room: &Room, build: impl Fn(RoomView) -> ServerMsg) {
        for player in &room.players {
            self.outbox
                .deliver(player.id, build(project(room, player.id)));
        }
    }

    fn broadcast_error(&self, room: &Room, err: &DomainError) {
        for player in &room.players {
            self.outbox
                .deliver(player.id, ServerMsg::error(err.code(), err.detail()));
        }
    }

    // ---- lookup ----

    fn ensure_unseated(&self, player: PlayerId) -> Result<(), DomainError> {
        match self.room_of(player) {
            Some(room_id) => Err(DomainError::illegal(
                IllegalStateKind::AlreadyInRoom,
                format!("Already seated in room {room_id}"),
            )),
            None => Ok(()),
        }
    }

    fn room(&self, room_id: &str) -> Result<SharedRoom, DomainError> {
        self.rooms
            .get(room_id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| Self::room_not_found(room_id))
    }

    /// The caller's own room; `room_id` must match their membership.
    fn member_room(&self, player: PlayerId, room_id: &str) -> Result<SharedRoom, DomainError> {
        let room_id = normalize_room_code(room_id);
        match self.room_of(player) {
            Some(joined) if joined == room_id => self.room(&joined),
            _ => Err(DomainError::not_found(
                NotFoundKind::Player,
                format!("Not seated in room {room_id}"),
            )),
        }
    }

    fn room_not_found(room_id: &str) -> DomainError {
        DomainError::not_found(NotFoundKind::Room, format!("Room {room_id} not found"))
    }
}
