//! 에러 타입

use thiserror::Error;

/// 전송 계층 에러
///
/// 코어 세션 로직은 실패하지 않는다. 송신 실패는 전송 계층이 로그로 남기고,
/// 끊어진 소켓의 수신 루프가 암묵적인 연결 해제를 전달한다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection {0} is not registered")]
    UnknownConnection(String),

    #[error("connection {0} is closed")]
    ConnectionClosed(String),
}
