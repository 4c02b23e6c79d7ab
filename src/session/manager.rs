//! 세션 매니저
//!
//! 모든 이벤트는 하나의 뮤텍스를 잡은 채로 상태 변경과 알림 전송까지 끝낸다.
//! 그래서 두 `find_partner`가 동시에 대기열 크기 1을 보고 둘 다 대기하는 일이나
//! 같은 연결의 `disconnect`와 `find_partner`가 엇갈리는 일이 없다.

use super::state::Sessions;
use super::{Room, RoomId};
use crate::protocol::{ServerMessage, SignalKind};
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 상태 스냅샷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub online_users: usize,
    pub waiting_users: usize,
    pub active_rooms: usize,
}

/// 세션 라이프사이클 매니저
pub struct SessionManager {
    sessions: Mutex<Sessions>,
    transport: Arc<dyn Transport>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            transport,
        }
    }

    /// 새 연결 등록 후 접속자 수 브로드캐스트
    pub async fn connect(&self, conn_id: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.connections.insert(conn_id.to_string());
        let count = sessions.connections.len();

        tracing::info!(conn_id = %conn_id, online = count, "User connected");
        self.transport
            .broadcast(ServerMessage::UserCountUpdate { count });
    }

    /// 연결 해제
    ///
    /// 대기열에서 빼고, 방에 있었다면 상대에게 알린 뒤 방을 없앤다.
    /// 상대는 대기열로 돌아가지 않으며 다시 매칭을 요청해야 한다.
    pub async fn disconnect(&self, conn_id: &str) {
        let mut sessions = self.sessions.lock().await;

        sessions.connections.remove(conn_id);
        let count = sessions.connections.len();
        tracing::info!(conn_id = %conn_id, online = count, "User disconnected");
        self.transport
            .broadcast(ServerMessage::UserCountUpdate { count });

        if sessions.remove_waiting(conn_id) {
            tracing::info!(conn_id = %conn_id, "Removed from waiting queue");
        }

        if let Some(room_id) = sessions.room_of.get(conn_id).cloned() {
            if let Some(room) = sessions.close_room(&room_id) {
                match room.other(conn_id) {
                    Some(partner) => {
                        self.transport
                            .send(partner, ServerMessage::UserDisconnected {});
                        tracing::info!(
                            partner = %partner,
                            room_id = %room_id,
                            "Notified partner of disconnection"
                        );
                    }
                    None => {
                        tracing::warn!(room_id = %room_id, "Room without a distinct partner");
                    }
                }
                tracing::info!(
                    room_id = %room_id,
                    duration_ms = room.created_at.elapsed().as_millis() as u64,
                    "Room closed"
                );
            }
            sessions.room_of.remove(conn_id);
        }
    }

    /// 매칭 요청
    ///
    /// 대기열에 넣은 뒤 두 명 이상 있는 동안 가장 오래 기다린 두 명씩 방을 만든다.
    /// 요청자가 짝을 못 찾았으면 `waiting_for_match`를 보낸다.
    pub async fn find_partner(&self, conn_id: &str) {
        let mut sessions = self.sessions.lock().await;

        if !sessions.connections.contains(conn_id) {
            tracing::debug!(conn_id = %conn_id, "Find request from unknown connection ignored");
            return;
        }
        if sessions.room_of.contains_key(conn_id) {
            tracing::warn!(conn_id = %conn_id, "Find request while already in a room");
            return;
        }

        sessions.enqueue(conn_id);
        tracing::info!(conn_id = %conn_id, waiting = sessions.waiting.len(), "Looking for a stranger");

        let mut matched = false;
        while let Some((first, second)) = sessions.dequeue_pair() {
            matched |= first == conn_id || second == conn_id;

            let room_id = self.fresh_room_id(&sessions);
            let room = Room::new(room_id.clone(), first, second);
            self.transport.room_send(
                &room,
                ServerMessage::MatchFound {
                    room_id: room_id.clone(),
                },
                None,
            );

            let [a, b] = room.members();
            tracing::info!(room_id = %room_id, first = %a, second = %b, "Match found");
            sessions.open_room(room);
        }

        if !matched && sessions.is_waiting(conn_id) {
            self.transport
                .send(conn_id, ServerMessage::WaitingForMatch {});
            tracing::info!(conn_id = %conn_id, "Waiting for match");
        }
    }

    /// 대화 종료: 양쪽 모두에게 `chat_ended`, 자동 재대기 없음
    pub async fn end_session(&self, conn_id: &str) {
        let mut sessions = self.sessions.lock().await;

        let Some(room_id) = sessions.room_of.get(conn_id).cloned() else {
            tracing::debug!(conn_id = %conn_id, "End request outside a room ignored");
            return;
        };

        match sessions.close_room(&room_id) {
            Some(room) => {
                self.transport
                    .room_send(&room, ServerMessage::ChatEnded {}, None);
                tracing::info!(
                    conn_id = %conn_id,
                    room_id = %room_id,
                    duration_ms = room.created_at.elapsed().as_millis() as u64,
                    "Chat ended"
                );
            }
            None => {
                sessions.room_of.remove(conn_id);
                tracing::warn!(conn_id = %conn_id, room_id = %room_id, "Dropped dangling room entry");
            }
        }
    }

    /// 시그널링 메시지를 방의 상대에게만 그대로 전달
    pub async fn relay(&self, conn_id: &str, kind: SignalKind, payload: Value) {
        let sessions = self.sessions.lock().await;

        let Some(room) = sessions.room_for(conn_id) else {
            tracing::debug!(conn_id = %conn_id, event = kind.as_str(), "Relay outside a room dropped");
            return;
        };

        if let Some(partner) = room.other(conn_id) {
            self.transport.send(partner, kind.into_message(payload));
            tracing::debug!(
                from = %conn_id,
                to = %partner,
                room_id = %room.id,
                event = kind.as_str(),
                "Relayed signal"
            );
        }
    }

    pub async fn stats(&self) -> SessionStats {
        let sessions = self.sessions.lock().await;
        SessionStats {
            online_users: sessions.connections.len(),
            waiting_users: sessions.waiting.len(),
            active_rooms: sessions.rooms.len(),
        }
    }

    fn fresh_room_id(&self, sessions: &Sessions) -> RoomId {
        loop {
            let room_id = self.transport.generate_id();
            if !sessions.rooms.contains_key(&room_id) {
                return room_id;
            }
            tracing::warn!(room_id = %room_id, "Room id collision, regenerating");
        }
    }
}
