//! 클라이언트-서버 메시지 프로토콜 정의
//!
//! 모든 메시지는 `{"type": "...", "payload": ...}` 형태의 JSON 텍스트 프레임이다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 클라이언트 → 서버 메시지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    // Connection
    Heartbeat,

    // Matching
    FindStranger,
    EndChat,

    // WebRTC Signaling (payload는 그대로 전달)
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),

    // ICE
    RequestIceServers,
}

/// 서버 → 클라이언트 메시지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    // Connection
    Connected { socket_id: String },
    HeartbeatAck,
    UserCountUpdate { count: usize },

    // Matching
    WaitingForMatch {},
    MatchFound { room_id: String },
    UserDisconnected {},
    ChatEnded {},

    // WebRTC Signaling
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),

    // ICE
    IceServers {
        ice_servers: Vec<IceServer>,
        ttl: Option<u64>,
    },
}

/// 중계 대상 시그널링 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice_candidate",
        }
    }

    /// 원본 payload를 수정 없이 담은 서버 메시지로 변환
    pub fn into_message(self, payload: Value) -> ServerMessage {
        match self {
            SignalKind::Offer => ServerMessage::Offer(payload),
            SignalKind::Answer => ServerMessage::Answer(payload),
            SignalKind::IceCandidate => ServerMessage::IceCandidate(payload),
        }
    }
}

/// ICE 서버 설정 (RTCIceServer 형태)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServer {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
}

impl IceServer {
    /// 인증이 필요 없는 STUN 서버
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
            credential_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_matching_requests() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"find_stranger"}"#).unwrap();
        assert_eq!(msg, ClientMessage::FindStranger);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"end_chat"}"#).unwrap();
        assert_eq!(msg, ClientMessage::EndChat);
    }

    #[test]
    fn signaling_payload_is_kept_verbatim() {
        let raw = r#"{"type":"ice_candidate","payload":{"candidate":{"candidate":"candidate:1 1 udp 2122260223 10.0.0.2 54321 typ host","sdpMid":"0"}}}"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        let ClientMessage::IceCandidate(payload) = msg else {
            panic!("expected ice_candidate");
        };

        let out = serde_json::to_value(SignalKind::IceCandidate.into_message(payload)).unwrap();
        let expected: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn server_events_use_snake_case_names() {
        assert_eq!(
            serde_json::to_value(ServerMessage::UserCountUpdate { count: 3 }).unwrap(),
            json!({"type": "user_count_update", "payload": {"count": 3}})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::WaitingForMatch {}).unwrap(),
            json!({"type": "waiting_for_match", "payload": {}})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::MatchFound {
                room_id: "r1".into()
            })
            .unwrap(),
            json!({"type": "match_found", "payload": {"room_id": "r1"}})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::ChatEnded {}).unwrap(),
            json!({"type": "chat_ended", "payload": {}})
        );
    }

    #[test]
    fn ice_server_omits_missing_credentials() {
        let value = serde_json::to_value(IceServer::stun("stun:stun.l.google.com:19302")).unwrap();
        assert_eq!(value, json!({"urls": ["stun:stun.l.google.com:19302"]}));
    }

    #[test]
    fn rejects_unknown_event() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"join_room"}"#).is_err());
    }
}
