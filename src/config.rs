//! 환경 변수 기반 설정 관리

use std::env;
use std::str::FromStr;

/// 기본 STUN 서버 목록
pub const DEFAULT_STUN_SERVERS: &str = "stun:stun.l.google.com:19302,stun:stun1.l.google.com:19302";

/// 서버 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    /// 비어 있으면 모든 origin 허용
    pub cors_origins: Vec<String>,
    pub ice: IceConfig,
    pub log_level: String,
}

/// ICE 서버 설정
#[derive(Debug, Clone)]
pub struct IceConfig {
    pub turn: TurnConfig,
    /// TURN이 없을 때도 항상 내려주는 정적 STUN 목록
    pub stun_servers: Vec<String>,
}

/// TURN 서버 설정
#[derive(Debug, Clone)]
pub struct TurnConfig {
    pub url: String,
    pub secret: String,
    pub enable_tls: bool,
    pub enable_udp: bool,
    pub enable_tcp: bool,
    pub ports: TurnPorts,
    pub credential_ttl: u64,
}

/// TURN 포트 설정
#[derive(Debug, Clone)]
pub struct TurnPorts {
    pub udp: u16,
    pub tcp: u16,
    pub tls: u16,
}

impl TurnConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.secret.is_empty()
    }
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수로 설정 구성 (잘못된 값은 기본값 사용)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };

        Self {
            port: parse_or(&lookup, "PORT", 5001),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default()
                .into_iter()
                .filter(|origin| origin != "*")
                .collect(),
            ice: IceConfig {
                turn: TurnConfig {
                    url: lookup("TURN_SERVER_URL").unwrap_or_default(),
                    secret: lookup("TURN_SECRET").unwrap_or_default(),
                    enable_tls: flag("TURN_ENABLE_TLS", false),
                    enable_udp: lookup("TURN_ENABLE_UDP")
                        .map(|v| v != "false")
                        .unwrap_or(true),
                    enable_tcp: lookup("TURN_ENABLE_TCP")
                        .map(|v| v != "false")
                        .unwrap_or(true),
                    ports: TurnPorts {
                        udp: parse_or(&lookup, "TURN_PORT_UDP", 3478),
                        tcp: parse_or(&lookup, "TURN_PORT_TCP", 3478),
                        tls: parse_or(&lookup, "TURN_PORT_TLS", 443),
                    },
                    credential_ttl: parse_or(&lookup, "TURN_CREDENTIAL_TTL", 3600),
                },
                stun_servers: split_list(
                    &lookup("STUN_SERVERS").unwrap_or_else(|| DEFAULT_STUN_SERVERS.to_string()),
                ),
            },
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
