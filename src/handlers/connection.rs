//! 연결 핸들러

use crate::protocol::ServerMessage;
use crate::session::ConnectionId;
use crate::state::AppState;
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// 새 연결 처리
pub async fn handle_connection(
    state: Arc<AppState>,
    sender: UnboundedSender<ServerMessage>,
) -> ConnectionId {
    let conn_id = Uuid::new_v4().to_string();

    state.transport.register(conn_id.clone(), sender);
    state.transport.send(
        &conn_id,
        ServerMessage::Connected {
            socket_id: conn_id.clone(),
        },
    );
    state.sessions.connect(&conn_id).await;

    tracing::info!(conn_id = %conn_id, "New connection established");
    conn_id
}

/// 연결 해제 처리
///
/// 송신 큐를 먼저 해제해야 접속자 수 브로드캐스트가 남은 연결에만 간다.
pub async fn handle_disconnect(state: Arc<AppState>, conn_id: &str) {
    state.transport.unregister(conn_id);
    state.sessions.disconnect(conn_id).await;
    tracing::info!(conn_id = %conn_id, "Connection closed");
}

/// Heartbeat 처리
pub fn handle_heartbeat(sender: &UnboundedSender<ServerMessage>) {
    let _ = sender.send(ServerMessage::HeartbeatAck);
}
