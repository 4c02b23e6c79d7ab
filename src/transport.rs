//! 전송 계층 경계
//!
//! 세션 매니저는 이 트레이트만 보고 메시지를 내보낸다. 실제 WebSocket 송신 큐는
//! [`ChannelTransport`]가 관리한다.

use crate::error::TransportError;
use crate::protocol::ServerMessage;
use crate::session::{ConnectionId, Room, RoomId};
use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// 세션 매니저가 사용하는 송신 프리미티브
pub trait Transport: Send + Sync {
    /// 단일 연결로 전송
    fn send(&self, conn_id: &str, message: ServerMessage);

    /// 살아있는 모든 연결로 전송
    fn broadcast(&self, message: ServerMessage);

    /// 방의 모든 멤버에게 전송 (`exclude` 제외)
    fn room_send(&self, room: &Room, message: ServerMessage, exclude: Option<&str>) {
        for member in room.members() {
            if exclude != Some(member.as_str()) {
                self.send(member, message.clone());
            }
        }
    }

    /// 충돌 없는 방 토큰 생성
    fn generate_id(&self) -> RoomId;
}

/// 연결별 mpsc 송신 큐 기반 전송 계층
#[derive(Default)]
pub struct ChannelTransport {
    /// 송신 큐 (conn_id -> sender)
    peers: DashMap<ConnectionId, UnboundedSender<ServerMessage>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, conn_id: ConnectionId, sender: UnboundedSender<ServerMessage>) {
        self.peers.insert(conn_id, sender);
    }

    pub fn unregister(&self, conn_id: &str) -> bool {
        self.peers.remove(conn_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn try_send(&self, conn_id: &str, message: ServerMessage) -> Result<(), TransportError> {
        let sender = self
            .peers
            .get(conn_id)
            .ok_or_else(|| TransportError::UnknownConnection(conn_id.to_string()))?;
        sender
            .send(message)
            .map_err(|_| TransportError::ConnectionClosed(conn_id.to_string()))
    }
}

impl Transport for ChannelTransport {
    fn send(&self, conn_id: &str, message: ServerMessage) {
        if let Err(e) = self.try_send(conn_id, message) {
            tracing::warn!(conn_id = %conn_id, error = %e, "Send failed");
        }
    }

    fn broadcast(&self, message: ServerMessage) {
        for peer in self.peers.iter() {
            if peer.value().send(message.clone()).is_err() {
                tracing::warn!(conn_id = %peer.key(), "Broadcast send failed");
            }
        }
    }

    fn generate_id(&self) -> RoomId {
        Uuid::new_v4().to_string()
    }
}
