//! 세션 라이프사이클 관리
//!
//! 익명 연결을 대기열(FIFO)에서 두 명씩 짝지어 방을 만들고, 방이 살아있는 동안
//! 두 참가자 사이의 WebRTC 시그널링 메시지를 중계한다.

mod manager;
mod room;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use manager::{SessionManager, SessionStats};
pub use room::Room;

/// 전송 계층이 부여하는 연결 식별자
pub type ConnectionId = String;

/// 방 토큰
pub type RoomId = String;
