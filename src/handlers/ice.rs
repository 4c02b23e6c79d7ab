//! ICE 서버 목록 핸들러
//!
//! TURN이 설정되어 있으면 시간 제한 자격증명(TURN REST, HMAC-SHA1)을 발급하고,
//! 정적 STUN 목록은 항상 뒤에 붙인다.

use crate::config::{IceConfig, TurnConfig};
use crate::protocol::{IceServer, ServerMessage};
use crate::state::AppState;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc::UnboundedSender;

type HmacSha1 = Hmac<Sha1>;

/// WebSocket `request_ice_servers` 처리
pub fn handle_ice_servers_request(state: Arc<AppState>, sender: &UnboundedSender<ServerMessage>) {
    let (ice_servers, ttl) = ice_servers(&state.config.ice);
    let _ = sender.send(ServerMessage::IceServers { ice_servers, ttl });
}

/// 현재 설정으로 ICE 서버 목록 생성
///
/// TURN 자격증명이 포함되면 유효 시간(초)도 함께 돌려준다.
pub fn ice_servers(config: &IceConfig) -> (Vec<IceServer>, Option<u64>) {
    let mut servers = Vec::new();
    let mut ttl = None;

    if config.turn.is_configured() {
        servers.extend(generate_credentials(&config.turn, unix_now()));
        ttl = Some(config.turn.credential_ttl);
    }

    servers.extend(config.stun_servers.iter().map(IceServer::stun));

    tracing::debug!(count = servers.len(), with_turn = ttl.is_some(), "ICE servers issued");
    (servers, ttl)
}

/// TURN 자격증명 생성 (RFC 5766 HMAC-SHA1)
fn generate_credentials(config: &TurnConfig, now: u64) -> Vec<IceServer> {
    let expiry_time = now + config.credential_ttl;

    let random: u64 = rand::random();
    let base_username = format!("user_{}_{:x}", now, random);
    let credential_username = format!("{}:{}", base_username, expiry_time);

    let password = generate_hmac_hash(&credential_username, &config.secret);

    build_turn_servers(config, &credential_username, &password)
}

fn generate_hmac_hash(username: &str, secret: &str) -> String {
    // HMAC은 임의 길이의 키를 받는다
    let Ok(mut mac) = HmacSha1::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(username.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

fn build_turn_servers(config: &TurnConfig, username: &str, password: &str) -> Vec<IceServer> {
    let mut turn_urls = Vec::new();

    if config.enable_udp {
        turn_urls.push(format!("turn:{}:{}", config.url, config.ports.udp));
    }
    if config.enable_tcp {
        turn_urls.push(format!(
            "turn:{}:{}?transport=tcp",
            config.url, config.ports.tcp
        ));
    }
    if config.enable_tls {
        turn_urls.push(format!(
            "turns:{}:{}?transport=tcp",
            config.url, config.ports.tls
        ));
    }

    let mut servers: Vec<IceServer> = turn_urls
        .into_iter()
        .map(|url| IceServer {
            urls: vec![url],
            username: Some(username.to_string()),
            credential: Some(password.to_string()),
            credential_type: Some("password".to_string()),
        })
        .collect();

    if config.enable_udp {
        servers.push(IceServer::stun(format!(
            "stun:{}:{}",
            config.url, config.ports.udp
        )));
    }

    servers
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn turn_config() -> IceConfig {
        Config::from_lookup(|key| match key {
            "TURN_SERVER_URL" => Some("turn.example.com".to_string()),
            "TURN_SECRET" => Some("s3cret".to_string()),
            "TURN_ENABLE_TLS" => Some("true".to_string()),
            "STUN_SERVERS" => Some("stun:fallback.example.com:3478".to_string()),
            _ => None,
        })
        .ice
    }

    #[test]
    fn falls_back_to_static_stun_list() {
        let config = Config::from_lookup(|_| None).ice;
        let (servers, ttl) = ice_servers(&config);

        assert!(ttl.is_none());
        assert_eq!(
            servers,
            vec![
                IceServer::stun("stun:stun.l.google.com:19302"),
                IceServer::stun("stun:stun1.l.google.com:19302"),
            ]
        );
    }

    #[test]
    fn turn_entries_come_first() {
        let (servers, ttl) = ice_servers(&turn_config());

        assert_eq!(ttl, Some(3600));
        let urls: Vec<&str> = servers.iter().map(|s| s.urls[0].as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "turn:turn.example.com:3478",
                "turn:turn.example.com:3478?transport=tcp",
                "turns:turn.example.com:443?transport=tcp",
                "stun:turn.example.com:3478",
                "stun:fallback.example.com:3478",
            ]
        );
        assert!(servers[..3].iter().all(|s| s.credential.is_some()));
        assert!(servers[3..].iter().all(|s| s.username.is_none()));
    }

    #[test]
    fn credential_is_hmac_of_username() {
        let config = turn_config();
        let servers = generate_credentials(&config.turn, 1_700_000_000);
        let username = servers[0].username.clone().unwrap();

        assert!(username.ends_with(":1700003600"));
        assert_eq!(
            servers[0].credential.as_deref(),
            Some(generate_hmac_hash(&username, "s3cret").as_str())
        );
        // base64(20바이트 SHA1 다이제스트)
        assert_eq!(servers[0].credential.as_ref().unwrap().len(), 28);
    }
}
