//! 2인 방

use super::{ConnectionId, RoomId};
use std::time::Instant;

/// 정확히 두 명으로 구성된 방
///
/// 두 멤버는 대칭이다. 한 명이 나가면 방 자체가 사라진다.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    members: [ConnectionId; 2],
    pub created_at: Instant,
}

impl Room {
    pub fn new(id: RoomId, first: ConnectionId, second: ConnectionId) -> Self {
        Self {
            id,
            members: [first, second],
            created_at: Instant::now(),
        }
    }

    pub fn members(&self) -> &[ConnectionId; 2] {
        &self.members
    }

    pub fn contains(&self, conn_id: &str) -> bool {
        self.members.iter().any(|m| m == conn_id)
    }

    /// `conn_id`가 아닌 나머지 멤버
    ///
    /// `conn_id`가 멤버가 아니거나 두 자리가 같은 연결로 채워진 경우 `None`.
    pub fn other(&self, conn_id: &str) -> Option<&ConnectionId> {
        if !self.contains(conn_id) {
            return None;
        }
        self.members.iter().find(|m| m.as_str() != conn_id)
    }
}
