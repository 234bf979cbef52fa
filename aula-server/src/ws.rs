use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Extension, Query, WebSocketUpgrade};
use axum::response::IntoResponse;
use aula_core::{Error, User, WsCommand, WsEvent};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::{store, AppState};

/// Handler per GET /ws
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ws: WebSocketUpgrade,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    let token = params.get("token").cloned();
    ws.on_upgrade(move |socket| handle_socket(socket, state, token))
}

async fn send_error(socket: &mut WebSocket, code: &str, message: String) {
    let event = WsEvent::Error(Error::new(code, message));
    if let Ok(text) = serde_json::to_string(&event) {
        let _ = socket.send(Message::Text(text)).await;
    }
}

async fn authenticate_token(
    socket: &mut WebSocket,
    state: &AppState,
    token: &str,
) -> Option<User> {
    match store::users::find_by_token(&state.pool, token).await {
        Ok(found) => found, // None = token non valido
        Err(e) => {
            send_error(socket, "internal_error", format!("auth lookup: {}", e)).await;
            None
        }
    }
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, token_q: Option<String>) {
    // Try authenticate via query param first
    let mut user_opt: Option<User> = None;

    if let Some(token) = token_q {
        user_opt = authenticate_token(&mut socket, &state, &token).await;
    }

    // If not authenticated via query, wait for first authenticate frame
    if user_opt.is_none() {
        match socket.next().await {
            Some(Ok(Message::Text(txt))) => match serde_json::from_str::<WsCommand>(&txt) {
                Ok(WsCommand::Authenticate(auth)) => {
                    user_opt = authenticate_token(&mut socket, &state, &auth.token).await;
                }
                Err(_) => {
                    send_error(
                        &mut socket,
                        "auth_required",
                        "expected authenticate frame".to_string(),
                    )
                    .await;
                    return;
                }
            },
            Some(Ok(_)) => {
                // non-text first message
                send_error(
                    &mut socket,
                    "auth_required",
                    "expected text authenticate frame".to_string(),
                )
                .await;
                return;
            }
            // connection closed or error
            _ => return,
        }
    }

    // if still none -> auth failed
    let user = match user_opt {
        Some(u) => u,
        None => {
            send_error(&mut socket, "unauthorized", "invalid token".to_string()).await;
            return;
        }
    };

    // Registra il canale di questa sessione: `tx` è l'UnboundedSender che il
    // notifier usa per spingere eventi a questo client (server -> client).
    // Una connessione precedente dello stesso utente viene soppiantata.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    state.registry.bind(&user.user_id, tx.clone());
    tracing::info!(user_id = %user.user_id, "ws session bound");

    // Conferma di autenticazione
    if let Ok(text) = serde_json::to_string(&WsEvent::AuthOk(user.clone())) {
        let _ = socket.send(Message::Text(text)).await;
    }

    // Split socket into sink/stream
    let (mut sender, mut receiver) = socket.split();

    // Task: forward events from rx -> websocket
    let forward_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Il socket è push-only lato applicativo: i send passano dalla POST HTTP.
    // Qui consumiamo i frame in arrivo solo per accorgerci della chiusura.
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Cleanup su ogni percorso di uscita: mai lasciare un handle stantio nel
    // registry. unbind_if_current evita che una sessione soppiantata
    // rimuova il binding della sua sostituta.
    state.registry.unbind_if_current(&user.user_id, &tx);
    tracing::info!(user_id = %user.user_id, "ws session unbound");
    // rilascia il sender locale: il forward task vede il canale chiuso e termina
    drop(tx);
    let _ = forward_task.await;
}
