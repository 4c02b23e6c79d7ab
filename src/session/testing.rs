use super::RoomId;
use crate::protocol::ServerMessage;
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 보낸 메시지를 연결별로 기록하는 전송 계층
#[derive(Default)]
pub(crate) struct RecordingTransport {
    sent: Mutex<HashMap<String, Vec<ServerMessage>>>,
    broadcasts: Mutex<Vec<ServerMessage>>,
    next_id: AtomicUsize,
}

impl RecordingTransport {
    /// `conn_id`가 받은 메시지를 꺼내고 기록을 비운다
    pub fn take(&self, conn_id: &str) -> Vec<ServerMessage> {
        self.sent
            .lock()
            .unwrap()
            .remove(conn_id)
            .unwrap_or_default()
    }

    pub fn take_broadcasts(&self) -> Vec<ServerMessage> {
        std::mem::take(&mut *self.broadcasts.lock().unwrap())
    }
}

impl Transport for RecordingTransport {
    fn send(&self, conn_id: &str, message: ServerMessage) {
        self.sent
            .lock()
            .unwrap()
            .entry(conn_id.to_string())
            .or_default()
            .push(message);
    }

    fn broadcast(&self, message: ServerMessage) {
        self.broadcasts.lock().unwrap().push(message);
    }

    fn generate_id(&self) -> RoomId {
        format!("room-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
