//! HTTP / WebSocket 서버

use crate::config::Config;
use crate::handlers;
use crate::protocol::{ClientMessage, IceServer, ServerMessage, SignalKind};
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 라우터 구성
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/get-ice-servers", get(ice_servers_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// 이미 바인딩된 리스너로 서버 실행
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn index_handler() -> Html<&'static str> {
    Html("<h1>Stranger Signaling Server</h1><p>WebSocket endpoint: /ws</p>")
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.sessions.stats().await;
    Json(serde_json::json!({
        "status": "ok",
        "server": "stranger-signaling-rs",
        "timestamp": SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
        "online_users": stats.online_users,
        "waiting_users": stats.waiting_users,
        "active_rooms": stats.active_rooms,
    }))
}

async fn ice_servers_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (servers, _) = handlers::ice_servers(&state.config.ice);
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json::<Vec<IceServer>>(servers),
    )
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // 연결 처리
    let conn_id = handlers::handle_connection(state.clone(), tx.clone()).await;

    // 송신 태스크
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to encode server message"),
            }
        }
    });

    // 수신 처리
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => handle_client_message(&state, &conn_id, &tx, msg).await,
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Dropped malformed message");
                }
            },
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // 연결 해제
    handlers::handle_disconnect(state, &conn_id).await;
    send_task.abort();
}

async fn handle_client_message(
    state: &Arc<AppState>,
    conn_id: &str,
    sender: &mpsc::UnboundedSender<ServerMessage>,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::Heartbeat => {
            handlers::handle_heartbeat(sender);
        }
        ClientMessage::FindStranger => {
            handlers::handle_find_stranger(state.clone(), conn_id).await;
        }
        ClientMessage::EndChat => {
            handlers::handle_end_chat(state.clone(), conn_id).await;
        }
        ClientMessage::Offer(payload) => {
            handlers::handle_signal(state.clone(), conn_id, SignalKind::Offer, payload).await;
        }
        ClientMessage::Answer(payload) => {
            handlers::handle_signal(state.clone(), conn_id, SignalKind::Answer, payload).await;
        }
        ClientMessage::IceCandidate(payload) => {
            handlers::handle_signal(state.clone(), conn_id, SignalKind::IceCandidate, payload)
                .await;
        }
        ClientMessage::RequestIceServers => {
            handlers::handle_ice_servers_request(state.clone(), sender);
        }
    }
}
