//! 세션 컬렉션
//!
//! 연결 레지스트리, 대기열, 방 테이블, 역인덱스(연결 -> 방)를 한 곳에 둔다.
//! 매니저의 뮤텍스 안에서만 접근한다.

use super::{ConnectionId, Room, RoomId};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Default)]
pub(crate) struct Sessions {
    /// 살아있는 연결
    pub connections: HashSet<ConnectionId>,
    /// 매칭 대기열 (도착 순서)
    pub waiting: VecDeque<ConnectionId>,
    /// 방 테이블 (room_id -> Room)
    pub rooms: HashMap<RoomId, Room>,
    /// 역인덱스 (conn_id -> room_id)
    pub room_of: HashMap<ConnectionId, RoomId>,
}

impl Sessions {
    pub fn is_waiting(&self, conn_id: &str) -> bool {
        self.waiting.iter().any(|c| c == conn_id)
    }

    /// 대기열 끝에 추가. 이미 있으면 `false`
    pub fn enqueue(&mut self, conn_id: &str) -> bool {
        if self.is_waiting(conn_id) {
            return false;
        }
        self.waiting.push_back(conn_id.to_string());
        true
    }

    pub fn remove_waiting(&mut self, conn_id: &str) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|c| c != conn_id);
        self.waiting.len() != before
    }

    /// 가장 오래 기다린 두 연결을 꺼낸다
    pub fn dequeue_pair(&mut self) -> Option<(ConnectionId, ConnectionId)> {
        if self.waiting.len() < 2 {
            return None;
        }
        let first = self.waiting.pop_front()?;
        let second = self.waiting.pop_front()?;
        Some((first, second))
    }

    pub fn room_for(&self, conn_id: &str) -> Option<&Room> {
        self.room_of
            .get(conn_id)
            .and_then(|room_id| self.rooms.get(room_id))
    }

    /// 방을 등록하고 두 멤버의 역인덱스를 설정
    pub fn open_room(&mut self, room: Room) {
        for member in room.members() {
            self.room_of.insert(member.clone(), room.id.clone());
        }
        self.rooms.insert(room.id.clone(), room);
    }

    /// 방을 삭제하고 그 방을 가리키는 멤버 역인덱스를 정리
    pub fn close_room(&mut self, room_id: &str) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for member in room.members() {
            if self.room_of.get(member).map(String::as_str) == Some(room_id) {
                self.room_of.remove(member);
            }
        }
        Some(room)
    }

    /// 컬렉션 간 불변식 검사
    #[cfg(test)]
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for conn_id in &self.waiting {
            if !seen.insert(conn_id) {
                return Err(format!("{conn_id} queued twice"));
            }
            if self.room_of.contains_key(conn_id) {
                return Err(format!("{conn_id} is both waiting and paired"));
            }
            if !self.connections.contains(conn_id) {
                return Err(format!("{conn_id} waiting but not connected"));
            }
        }

        for (room_id, room) in &self.rooms {
            if &room.id != room_id {
                return Err(format!("room {room_id} stored under wrong key"));
            }
            let [first, second] = room.members();
            if first == second {
                return Err(format!("room {room_id} has a single member"));
            }
            for member in room.members() {
                if self.room_of.get(member) != Some(room_id) {
                    return Err(format!("{member} in room {room_id} lacks reverse entry"));
                }
                if !self.connections.contains(member) {
                    return Err(format!("{member} in room {room_id} but not connected"));
                }
            }
        }

        for (conn_id, room_id) in &self.room_of {
            match self.rooms.get(room_id) {
                Some(room) if room.contains(conn_id) => {}
                _ => return Err(format!("{conn_id} points at foreign room {room_id}")),
            }
        }

        Ok(())
    }
}
