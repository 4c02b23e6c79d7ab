//! 애플리케이션 상태 관리

use crate::config::Config;
use crate::session::SessionManager;
use crate::transport::ChannelTransport;
use std::sync::Arc;

/// 전역 애플리케이션 상태
pub struct AppState {
    /// 매칭/방 상태
    pub sessions: SessionManager,
    /// 연결별 송신 큐
    pub transport: Arc<ChannelTransport>,
    /// 설정
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let transport = Arc::new(ChannelTransport::new());
        Self {
            sessions: SessionManager::new(transport.clone()),
            transport,
            config: Arc::new(config),
        }
    }
}
