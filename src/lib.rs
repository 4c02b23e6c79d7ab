//! 낯선 상대 랜덤 매칭 + WebRTC 시그널링 중계 서버
//!
//! 접속한 익명 클라이언트를 도착 순서대로 두 명씩 짝지어 방을 만들고,
//! 방이 끝날 때까지 offer / answer / ICE candidate 메시지를 상대에게 전달한다.

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod session;
pub mod state;
pub mod transport;
