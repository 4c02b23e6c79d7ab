//! 매칭 핸들러

use crate::state::AppState;
use std::sync::Arc;

/// 낯선 상대 찾기 요청 처리
pub async fn handle_find_stranger(state: Arc<AppState>, conn_id: &str) {
    state.sessions.find_partner(conn_id).await;
}

/// 대화 종료 요청 처리
pub async fn handle_end_chat(state: Arc<AppState>, conn_id: &str) {
    state.sessions.end_session(conn_id).await;
}
