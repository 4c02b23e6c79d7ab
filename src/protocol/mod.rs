//! 클라이언트-서버 메시지 프로토콜

mod messages;

pub use messages::*;
