use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::OperatorClient;
use crate::AppState;

/// Profiler types the backend accepts, with their display labels.
pub const PROFILE_TYPES: [(&str, &str); 5] = [
    ("cpu", "CPU"),
    ("mem", "Memory"),
    ("block", "Block"),
    ("mutex", "Mutex"),
    ("goroutines", "Goroutines"),
];

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(default)]
    pub types: String,
}

/// Known types from a comma-separated list, in order, without repeats.
pub fn parse_profile_types(raw: &str) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for t in raw.split(',').map(str::trim) {
        if PROFILE_TYPES.iter().any(|(known, _)| *known == t) && !types.iter().any(|s| s == t) {
            types.push(t.to_string());
        }
    }
    types
}

/// Profiling session: the browser sends "ok" to start, receives the zip
/// archive as one binary message, and the socket is closed.
pub async fn handle_profile_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Response {
    let types = parse_profile_types(&query.types);
    let client = state.client.clone();
    ws.on_upgrade(move |socket| profile_session(socket, client, types))
}

async fn profile_session(mut socket: WebSocket, client: Arc<OperatorClient>, types: Vec<String>) {
    if types.is_empty() {
        let _ = socket
            .send(Message::Text("no valid profiling types requested".into()))
            .await;
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    // Wait for the start signal
    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) if text.as_str() == "ok" => break,
            Some(Ok(Message::Close(_))) | None => return,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!("profile socket error: {}", e);
                return;
            }
        }
    }

    info!("collecting profile for {}", types.join(","));
    match client.profile(&types).await {
        Ok(archive) => {
            info!("sending profile archive ({} bytes)", archive.len());
            if let Err(e) = socket.send(Message::Binary(archive.into())).await {
                warn!("sending profile archive: {}", e);
            }
        }
        Err(e) => {
            warn!("profiling failed: {}", e);
            let _ = socket.send(Message::Text(e.user_message().into())).await;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_types() {
        assert_eq!(parse_profile_types("cpu,mem"), vec!["cpu", "mem"]);
        assert_eq!(parse_profile_types(" mutex , cpu,mutex"), vec!["mutex", "cpu"]);
        assert_eq!(parse_profile_types("heap,,threads"), Vec::<String>::new());
        assert!(parse_profile_types("").is_empty());
    }
}
