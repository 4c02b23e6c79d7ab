//! WebRTC 시그널링 핸들러

use crate::protocol::SignalKind;
use crate::state::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Offer / Answer / ICE Candidate 중계
///
/// 내용은 검사하지 않는다. 방 밖에서 온 메시지는 매니저가 버린다.
pub async fn handle_signal(state: Arc<AppState>, from_conn_id: &str, kind: SignalKind, payload: Value) {
    state.sessions.relay(from_conn_id, kind, payload).await;
}
